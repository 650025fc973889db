//! Catch clauses that only rethrow
//!
//! A handler whose whole body is `throw;` adds nothing: the exception would
//! propagate the same way without it. Such a handler is only reported when
//! every later handler of the same `try` also just rethrows, because
//! removing it would otherwise let a later handler catch the exception.
//!
//! ```csharp
//! try { Run(); }
//! catch (IOException) { throw; }   // Noncompliant
//! ```
//!
//! Filtered handlers (`catch (E) when (...)`) are never reported: the filter
//! itself may have side effects.

use sable_core::syntax::ast::{AstNode, CatchClause};
use sable_core::{Diagnostic, RuleCategory, RuleDescriptor, Severity, SyntaxNode};

/// Rule ID for redundant catch detection
pub const RULE_ID: &str = "S2737";

/// Rule ID of the companion fix
pub const FIX_RULE_ID: &str = "S2737-fix";

pub const TITLE: &str = "\"catch\" clauses should do more than rethrow";

pub const MESSAGE: &str =
    "Add logic to this catch clause or eliminate it and rethrow the exception automatically.";

pub const FIX_TITLE: &str = "Remove redundant catch";

pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor::structural(RULE_ID, TITLE)
        .with_message(MESSAGE)
        .with_category(RuleCategory::Redundancy)
        .with_severity(Severity::Minor)
}

pub fn fix_descriptor() -> RuleDescriptor {
    RuleDescriptor::fix(FIX_RULE_ID, FIX_TITLE, RULE_ID).with_category(RuleCategory::Redundancy)
}

/// Unfiltered handler whose body is exactly `throw;`
pub fn is_redundant_handler(clause: &CatchClause) -> bool {
    !clause.is_filtered() && clause.only_rethrows()
}

/// Report redundant handlers in source order
pub fn check(root: &SyntaxNode, rule: &RuleDescriptor) -> Vec<Diagnostic> {
    root.descendants()
        .filter_map(CatchClause::cast)
        .filter(|clause| is_redundant_handler(clause) && later_handlers_redundant(clause))
        .map(|clause| {
            Diagnostic::new(
                &rule.id,
                rule.render_message(&[]),
                clause.syntax().text_range(),
                rule.severity,
            )
        })
        .collect()
}

fn later_handlers_redundant(clause: &CatchClause) -> bool {
    clause
        .syntax()
        .siblings(rowan::Direction::Next)
        .skip(1)
        .filter_map(CatchClause::cast)
        .all(|later| is_redundant_handler(&later))
}
