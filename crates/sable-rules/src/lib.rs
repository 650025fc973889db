//! Sable Rules
//!
//! Rule registry, comment pattern runner, builtin rules and fix engine.
//! The [`Analyzer`] ties them together into the two operations a host needs:
//! analyze a tree, and fix some of what was found.

pub mod analyzer;
pub mod builtin;
pub mod fix;
pub mod registry;
pub mod runner;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use builtin::{CheckFn, structural_check};
pub use fix::{
    CatchRethrowFix, FixEdit, FixEngine, FixOperation, FixOutcome, FixProvider, FixUnavailable,
    NodeTarget, apply_edits,
};
pub use registry::{RegistrySnapshot, RuleRegistry};
pub use runner::{CancellationFlag, CommentRuleRunner};

/// Registry populated with the builtin rules and the configured catalog
pub fn init_registry(catalog: &[sable_core::RuleConfig]) -> sable_core::Result<RuleRegistry> {
    let registry = RuleRegistry::with_builtin_rules()?;
    registry.register_catalog(catalog)?;
    tracing::debug!("Initialized rule registry with {} rules", registry.len());
    Ok(registry)
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
