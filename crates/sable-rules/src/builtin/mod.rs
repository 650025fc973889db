//! Builtin rules
//!
//! Each rule module exposes its `RULE_ID`, a `descriptor()` and, for
//! structural rules, a `check` function with the [`CheckFn`] signature.

pub mod catch_rethrow;
pub mod class_not_instantiable;
pub mod comment_regex;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use sable_core::{Diagnostic, Result, RuleDescriptor, SyntaxNode};

/// A structural check run over the root of a tree
pub type CheckFn = fn(&SyntaxNode, &RuleDescriptor) -> Vec<Diagnostic>;

static STRUCTURAL_CHECKS: Lazy<IndexMap<&'static str, CheckFn>> = Lazy::new(|| {
    let mut checks: IndexMap<&'static str, CheckFn> = IndexMap::new();
    checks.insert(catch_rethrow::RULE_ID, catch_rethrow::check);
    checks.insert(class_not_instantiable::RULE_ID, class_not_instantiable::check);
    checks
});

/// The check implementing structural rule `rule_id`
pub fn structural_check(rule_id: &str) -> Option<CheckFn> {
    STRUCTURAL_CHECKS.get(rule_id).copied()
}

/// Descriptors for every builtin rule, in registration order
pub fn descriptors() -> Result<Vec<RuleDescriptor>> {
    Ok(vec![
        comment_regex::descriptor(comment_regex::RULE_ID, comment_regex::DEFAULT_PATTERN)?,
        catch_rethrow::descriptor(),
        catch_rethrow::fix_descriptor(),
        class_not_instantiable::descriptor(),
    ])
}
