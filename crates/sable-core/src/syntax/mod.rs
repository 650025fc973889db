//! Concrete Syntax Tree (CST) for C-family sources
//!
//! The engine works on a lossless syntax tree built with the Rowan library.
//! The producing parser is external; anything that emits [`SyntaxKind`]s
//! through a [`SyntaxTreeBuilder`] can feed the engine.
//!
//! ## Architecture
//!
//! - **Green Tree**: immutable, position-independent storage. Cheap to clone
//!   and `Send + Sync`, so it is what [`SyntaxTree`] holds.
//! - **Red Tree**: on-demand view with parent pointers, created per call for
//!   traversal.
//!
//! ## Trivia Handling
//!
//! Trivia tokens are siblings of the tokens and nodes they separate; nodes
//! start and end with non-trivia. See [`trivia`] for how a run of trivia is
//! split between its neighbours.

mod language;
mod nodes;
mod syntax_kind;

pub mod ast;
pub mod trivia;

pub use language::CLanguage;
pub use nodes::*;
pub use syntax_kind::SyntaxKind;
pub use trivia::{
    Trivia, TriviaCollector, TriviaKind, collect_comments, leading_trivia, range_with_trivia,
    trailing_trivia,
};

/// Re-exported rowan text primitives
pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};
