//! Trivia classification for the CST
//!
//! Trivia tokens (whitespace, newlines, comments) sit as siblings inside the
//! enclosing node, between the non-trivia tokens and nodes they separate.
//! This module classifies them and decides which trivia "belongs" to a node:
//!
//! - **Trailing trivia**: everything after a node up to and including the
//!   first newline
//! - **Leading trivia**: everything before a node after the previous
//!   sibling's trailing trivia
//!
//! # Example
//!
//! ```rust,ignore
//! use sable_core::syntax::trivia::TriviaCollector;
//!
//! let comments: Vec<_> = TriviaCollector::comments().collect(tree.root()).collect();
//! assert_eq!(comments[0].text, "// TODO: remove");
//! ```

use rowan::{NodeOrToken, TextRange};

use super::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Classification of a trivia token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    /// `///` and `/** */` comments
    DocComment,
}

impl TriviaKind {
    /// Classify a syntax kind, returning `None` for non-trivia
    pub fn from_syntax_kind(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::Whitespace => Some(Self::Whitespace),
            SyntaxKind::Newline => Some(Self::Newline),
            SyntaxKind::LineComment => Some(Self::LineComment),
            SyntaxKind::BlockComment => Some(Self::BlockComment),
            SyntaxKind::DocLineComment | SyntaxKind::DocBlockComment => Some(Self::DocComment),
            _ => None,
        }
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::DocComment
        )
    }
}

/// A single trivia token lifted out of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    /// The kind of trivia
    pub kind: TriviaKind,
    /// Raw text, delimiters included
    pub text: String,
    /// Position in the source
    pub range: TextRange,
}

impl Trivia {
    /// Lift a token, returning `None` if it is not trivia
    pub fn from_token(token: &SyntaxToken) -> Option<Self> {
        let kind = TriviaKind::from_syntax_kind(token.kind())?;
        Some(Self {
            kind,
            text: token.text().to_string(),
            range: token.text_range(),
        })
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    /// Get the comment content without its delimiters
    pub fn comment_content(&self) -> Option<&str> {
        match self.kind {
            TriviaKind::LineComment | TriviaKind::DocComment if self.text.starts_with("//") => {
                Some(self.text.trim_start_matches('/').trim())
            }
            TriviaKind::BlockComment | TriviaKind::DocComment => Some(
                self.text
                    .trim_start_matches("/*")
                    .trim_start_matches('*')
                    .trim_end_matches("*/")
                    .trim(),
            ),
            _ => None,
        }
    }
}

/// Collects trivia from a subtree in source order
#[derive(Debug, Clone, Copy)]
pub struct TriviaCollector {
    comments_only: bool,
}

impl TriviaCollector {
    /// Collect every trivia token
    pub fn all() -> Self {
        Self {
            comments_only: false,
        }
    }

    /// Collect only comment trivia
    pub fn comments() -> Self {
        Self {
            comments_only: true,
        }
    }

    /// Depth-first, source-ordered trivia of `node`
    pub fn collect(self, node: SyntaxNode) -> impl Iterator<Item = Trivia> {
        node.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter_map(|token| Trivia::from_token(&token))
            .filter(move |trivia| !self.comments_only || trivia.is_comment())
    }

    /// Trivia of a single element (a token, or every token under a node)
    pub fn collect_element(self, element: &SyntaxElement) -> Vec<Trivia> {
        match element {
            NodeOrToken::Token(token) => Trivia::from_token(token)
                .filter(|trivia| !self.comments_only || trivia.is_comment())
                .into_iter()
                .collect(),
            NodeOrToken::Node(node) => self.collect(node.clone()).collect(),
        }
    }
}

/// Comment trivia under `node` in source order
pub fn collect_comments(node: SyntaxNode) -> impl Iterator<Item = Trivia> {
    TriviaCollector::comments().collect(node)
}

fn as_trivia_token(element: &SyntaxElement) -> Option<SyntaxToken> {
    element
        .as_token()
        .filter(|token| token.kind().is_trivia())
        .cloned()
}

/// Trivia owned by `node` that precedes it among its siblings
///
/// When a non-trivia sibling precedes the run, the part of the run up to and
/// including the first newline is that sibling's trailing trivia and is not
/// returned. With no newline in the run the node has no leading trivia.
pub fn leading_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let mut run = Vec::new();
    let mut current = node.prev_sibling_or_token();
    let mut preceded = false;

    while let Some(element) = current {
        match as_trivia_token(&element) {
            Some(token) => {
                current = token.prev_sibling_or_token();
                run.push(token);
            }
            None => {
                preceded = true;
                break;
            }
        }
    }
    run.reverse();

    if !preceded {
        return run;
    }

    match run.iter().position(|t| t.kind() == SyntaxKind::Newline) {
        Some(newline) => run.split_off(newline + 1),
        None => Vec::new(),
    }
}

/// Trivia owned by `node` that follows it: up to and including the first newline
pub fn trailing_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let mut run = Vec::new();
    let mut current = node.next_sibling_or_token();

    while let Some(element) = current {
        let Some(token) = as_trivia_token(&element) else {
            break;
        };
        current = token.next_sibling_or_token();
        let is_newline = token.kind() == SyntaxKind::Newline;
        run.push(token);
        if is_newline {
            break;
        }
    }

    run
}

/// Range of `node` widened by its leading and trailing trivia
pub fn range_with_trivia(node: &SyntaxNode) -> TextRange {
    let range = node.text_range();
    let start = leading_trivia(node)
        .first()
        .map(|t| t.text_range().start())
        .unwrap_or(range.start());
    let end = trailing_trivia(node)
        .last()
        .map(|t| t.text_range().end())
        .unwrap_or(range.end());
    TextRange::new(start, end)
}
