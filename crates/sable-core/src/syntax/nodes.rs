//! Type aliases and the owned tree handle
//!
//! Red-tree types are rowan's generic types parameterized with `CLanguage`.
//! They are cheap, but not `Send`, so anything that crosses a thread boundary
//! holds a [`SyntaxTree`] (the green root) and creates red views on demand.

use rowan::{GreenNode, GreenNodeBuilder, NodeOrToken, TextRange, TextSize};

use super::{CLanguage, SyntaxKind};

/// A node in the concrete syntax tree
pub type SyntaxNode = rowan::SyntaxNode<CLanguage>;
/// A token in the concrete syntax tree (including trivia tokens)
pub type SyntaxToken = rowan::SyntaxToken<CLanguage>;
/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<CLanguage>;
/// Iterator over the direct children of a node, tokens included
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<CLanguage>;

/// An immutable, thread-safe syntax tree
///
/// Wraps the green root produced by the external parser. Cloning is an
/// `Arc` bump; untouched subtrees are shared between a tree and any tree
/// rewritten from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    green: GreenNode,
}

impl SyntaxTree {
    /// Wrap a green root node
    pub fn new(green: GreenNode) -> Self {
        Self { green }
    }

    /// A compilation unit with no children
    pub fn empty() -> Self {
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.finish_node();
        builder.finish()
    }

    /// Red root view of this tree
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The green root
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Length of the source text covered by the tree
    pub fn text_len(&self) -> TextSize {
        self.green.text_len()
    }

    /// Reconstruct the (lossless) source text
    pub fn text(&self) -> String {
        self.root().text().to_string()
    }

    /// True if the root has no children at all
    pub fn is_empty(&self) -> bool {
        self.green.children().next().is_none()
    }

    /// Check that a range lies within this tree's bounds
    pub fn contains_range(&self, range: TextRange) -> bool {
        TextRange::up_to(self.text_len()).contains_range(range)
    }
}

impl From<GreenNode> for SyntaxTree {
    fn from(green: GreenNode) -> Self {
        Self::new(green)
    }
}

/// Builder for syntax trees, used by parsers and tests
///
/// Thin wrapper over `rowan::GreenNodeBuilder` taking `SyntaxKind` directly.
pub struct SyntaxTreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    /// Remember the current position so a node can be wrapped around it later
    pub fn checkpoint(&self) -> rowan::Checkpoint {
        self.inner.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree::new(self.inner.finish())
    }
}

impl Default for SyntaxTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the outermost node whose range is exactly `range`
///
/// Returns `None` when the range falls outside the tree or no node spans it
/// exactly, which is how stale locations are detected.
pub fn find_node_at_range(root: &SyntaxNode, range: TextRange) -> Option<SyntaxNode> {
    if !root.text_range().contains_range(range) {
        return None;
    }

    let start = match root.covering_element(range) {
        NodeOrToken::Node(node) => node,
        NodeOrToken::Token(token) => token.parent()?,
    };

    start
        .ancestors()
        .take_while(|node| node.text_range() == range)
        .last()
}
