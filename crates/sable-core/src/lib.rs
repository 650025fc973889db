//! Sable Core
//!
//! Syntax tree model, diagnostics, rule descriptors and configuration for
//! the sable rule engine. The engine works on already-parsed C-family syntax
//! trees; see [`syntax`] for the tree model a parser has to produce.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod result;
pub mod rules;
pub mod syntax; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod text_edit;

// Re-export commonly used types
pub use config::{
    ConfigLoader, LinterConfiguration, RuleConfig, RuleOverride, SableConfiguration,
};
pub use diagnostics::{Diagnostic, Severity, Span};
pub use error::{ErrorKind, SableError};
pub use result::{Result, ResultExt};
pub use rules::{CommentPattern, RuleCategory, RuleDescriptor, RuleKind, render_message};
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxToken, SyntaxTree, SyntaxTreeBuilder};
pub use text_edit::{TextEdit, apply_text_edits, derive_text_edits};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sable=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
