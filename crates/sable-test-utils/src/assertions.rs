//! Tree inspection helpers for tests

use sable_core::syntax::{NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxTree};

use crate::parse_fixture;

/// Parse `source` and assert the tree reproduces it byte for byte
pub fn assert_lossless(source: &str) -> SyntaxTree {
    let tree = parse_fixture(source);
    assert_eq!(tree.text(), source, "fixture parse is not lossless");
    tree
}

/// All nodes of `kind` in preorder
pub fn nodes_of_kind(tree: &SyntaxTree, kind: SyntaxKind) -> Vec<SyntaxNode> {
    tree.root()
        .descendants()
        .filter(|node| node.kind() == kind)
        .collect()
}

/// First node of `kind` in preorder
///
/// # Panics
///
/// Panics if the tree has no such node.
pub fn first_node(tree: &SyntaxTree, kind: SyntaxKind) -> SyntaxNode {
    nodes_of_kind(tree, kind)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {kind} node in:\n{}", tree.text()))
}

/// Assert that no node starts or ends with a trivia token
pub fn assert_nodes_trimmed(tree: &SyntaxTree) {
    for node in tree.root().descendants().skip(1) {
        let first = node.first_child_or_token();
        let last = node.last_child_or_token();
        for element in [first, last].into_iter().flatten() {
            if let NodeOrToken::Token(token) = element {
                assert!(
                    !token.kind().is_trivia(),
                    "{:?} at {:?} has boundary trivia {:?}",
                    node.kind(),
                    node.text_range(),
                    token.text()
                );
            }
        }
    }
}

/// Indented dump of node kinds with non-trivia token text, for snapshots
pub fn debug_tree(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    write_element(&mut out, &NodeOrToken::Node(tree.root()), 0);
    out
}

fn write_element(out: &mut String, element: &SyntaxElement, depth: usize) {
    match element {
        NodeOrToken::Node(node) => {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{:?}\n", node.kind()));
            for child in node.children_with_tokens() {
                write_element(out, &child, depth + 1);
            }
        }
        NodeOrToken::Token(token) if !token.kind().is_trivia() => {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{:?} {:?}\n", token.kind(), token.text()));
        }
        NodeOrToken::Token(_) => {}
    }
}
