//! # Sable Test Utilities
//!
//! Shared test infrastructure for the sable crates: a fixture parser that
//! turns a small C# subset into a `SyntaxTree`, inline range markers for
//! expected spans, and tree assertions.
//!
//! ```ignore
//! use sable_test_utils::{extract_ranges, parse_fixture};
//!
//! let (source, expected) = extract_ranges("x(); [|// TODO: remove|]");
//! let tree = parse_fixture(&source);
//! ```

// Test utilities are less strict than production code
#![allow(clippy::missing_panics_doc)]

pub mod assertions;
pub mod lexer;
pub mod markers;
pub mod parser;

pub use assertions::{assert_lossless, assert_nodes_trimmed, debug_tree, first_node, nodes_of_kind};
pub use lexer::{FixtureToken, lex};
pub use markers::extract_ranges;
pub use parser::parse_fixture;
