//! Fix computation and application
//!
//! A fix is computed in two steps. A [`FixProvider`] turns one diagnostic into
//! a [`FixEdit`] against the tree the diagnostic was reported on; the engine
//! then folds one or more edits into a new tree in a single pass.
//!
//! Rewriting never touches the input tree. Each edit splices the children of
//! the target's parent and rebuilds only the path from there to the root, so
//! every untouched subtree of the result is the same allocation as in the
//! input.
//!
//! Batches are all or nothing: if any two edits overlap, or any edit no
//! longer resolves, no tree is produced.

pub mod catch_rethrow;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};
use sable_core::syntax::find_node_at_range;
use sable_core::{Diagnostic, SableError, SyntaxKind, SyntaxNode, SyntaxTree};
use tracing::{debug, warn};

pub use catch_rethrow::CatchRethrowFix;

/// An owned green node or token, as spliced into a parent
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Identity of a node in the tree an edit was computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeTarget {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl NodeTarget {
    pub fn of(node: &SyntaxNode) -> Self {
        Self {
            kind: node.kind(),
            range: node.text_range(),
        }
    }

    /// Find the node with this kind and range under `root`
    pub fn resolve(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        let outermost = find_node_at_range(root, self.range)?;
        if outermost.kind() == self.kind {
            return Some(outermost);
        }
        outermost
            .descendants()
            .take_while(|node| node.text_range() == self.range)
            .find(|node| node.kind() == self.kind)
    }
}

/// What happens to the removed range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOperation {
    /// Drop the elements in the removed range
    Remove,
    /// Put these elements where the removed range was
    Replace(Vec<GreenElement>),
}

/// One tree-level change
///
/// `removed_range` covers the target and any trivia that goes with it. It
/// always spans whole children of the target's parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixEdit {
    pub target: NodeTarget,
    pub removed_range: TextRange,
    pub op: FixOperation,
}

impl FixEdit {
    pub fn remove(target: NodeTarget, removed_range: TextRange) -> Self {
        Self {
            target,
            removed_range,
            op: FixOperation::Remove,
        }
    }

    pub fn replace(target: NodeTarget, replacement: Vec<GreenElement>) -> Self {
        Self {
            target,
            removed_range: target.range,
            op: FixOperation::Replace(replacement),
        }
    }

    /// Strict overlap; edits that only touch at an offset do not overlap
    pub fn overlaps(&self, other: &FixEdit) -> bool {
        self.removed_range.start() < other.removed_range.end()
            && other.removed_range.start() < self.removed_range.end()
    }

    fn inserted_len(&self) -> TextSize {
        match &self.op {
            FixOperation::Remove => TextSize::from(0),
            FixOperation::Replace(elements) => elements
                .iter()
                .fold(TextSize::from(0), |len, element| len + green_len(element)),
        }
    }
}

fn green_len(element: &GreenElement) -> TextSize {
    match element {
        NodeOrToken::Node(node) => node.text_len(),
        NodeOrToken::Token(token) => token.text_len(),
    }
}

/// Why no fix is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixUnavailable {
    /// The diagnostic is not inside anything the fix knows how to change
    NotApplicable,
    /// The diagnostic's span no longer resolves to a node
    TargetNotFound,
    /// Two edits of a batch overlap
    ConflictingEdits,
    /// The construct is recognized but deliberately left alone
    NotFixable,
}

impl fmt::Display for FixUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotApplicable => "no applicable construct at the diagnostic",
            Self::TargetNotFound => "diagnostic does not resolve to a node",
            Self::ConflictingEdits => "edits overlap",
            Self::NotFixable => "construct is not fixed automatically",
        };
        f.write_str(reason)
    }
}

/// Result of a fix request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied {
        tree: SyntaxTree,
        /// Ranges in the new tree whose contents need re-formatting
        reformat: Vec<TextRange>,
    },
    Unavailable(FixUnavailable),
}

impl FixOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn tree(&self) -> Option<&SyntaxTree> {
        match self {
            Self::Applied { tree, .. } => Some(tree),
            Self::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<FixUnavailable> {
        match self {
            Self::Applied { .. } => None,
            Self::Unavailable(reason) => Some(*reason),
        }
    }

    /// The fixed tree, or the reason there is none as a recoverable error
    pub fn into_result(self) -> sable_core::Result<SyntaxTree> {
        match self {
            Self::Applied { tree, .. } => Ok(tree),
            Self::Unavailable(FixUnavailable::ConflictingEdits) => Err(
                SableError::conflicting_edits(FixUnavailable::ConflictingEdits.to_string()),
            ),
            Self::Unavailable(reason) => Err(SableError::fix_unavailable(reason.to_string())),
        }
    }
}

impl From<FixUnavailable> for FixOutcome {
    fn from(reason: FixUnavailable) -> Self {
        Self::Unavailable(reason)
    }
}

/// Computes edits for the diagnostics of particular rules
pub trait FixProvider: Send + Sync {
    /// Rule IDs whose diagnostics this provider can fix
    fn fixable_rule_ids(&self) -> &[&'static str];

    /// Title shown to the user for the fix
    fn title(&self) -> &str;

    /// Edit fixing `diagnostic`, computed against `root`
    fn compute_edit(
        &self,
        root: &SyntaxNode,
        diagnostic: &Diagnostic,
    ) -> Result<FixEdit, FixUnavailable>;

    /// Merge edits of one batch that are only valid together
    fn reconcile(
        &self,
        _root: &SyntaxNode,
        edits: Vec<FixEdit>,
    ) -> Result<Vec<FixEdit>, FixUnavailable> {
        Ok(edits)
    }
}

/// Applies provider edits to trees
#[derive(Clone, Default)]
pub struct FixEngine {
    providers: IndexMap<&'static str, Arc<dyn FixProvider>>,
}

impl fmt::Debug for FixEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixEngine")
            .field("rules", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FixEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the builtin fix providers
    pub fn with_builtin_providers() -> Self {
        let mut engine = Self::new();
        engine.add_provider(Arc::new(CatchRethrowFix));
        engine
    }

    pub fn add_provider(&mut self, provider: Arc<dyn FixProvider>) {
        for &rule_id in provider.fixable_rule_ids() {
            if self.providers.insert(rule_id, provider.clone()).is_some() {
                warn!("Fix provider for rule {} replaced", rule_id);
            }
        }
    }

    pub fn provider_for(&self, rule_id: &str) -> Option<&Arc<dyn FixProvider>> {
        self.providers.get(rule_id)
    }

    pub fn can_fix(&self, rule_id: &str) -> bool {
        self.providers.contains_key(rule_id)
    }

    /// Fix a single diagnostic
    pub fn fix(&self, tree: &SyntaxTree, diagnostic: &Diagnostic) -> FixOutcome {
        self.fix_all(tree, std::slice::from_ref(diagnostic))
    }

    /// Fix every diagnostic together, or none of them
    pub fn fix_all(&self, tree: &SyntaxTree, diagnostics: &[Diagnostic]) -> FixOutcome {
        match self.batch_edits(tree, diagnostics) {
            Ok(edits) => match apply_edits(tree, edits) {
                Ok((tree, reformat)) => FixOutcome::Applied { tree, reformat },
                Err(reason) => FixOutcome::Unavailable(reason),
            },
            Err(reason) => FixOutcome::Unavailable(reason),
        }
    }

    fn batch_edits(
        &self,
        tree: &SyntaxTree,
        diagnostics: &[Diagnostic],
    ) -> Result<Vec<FixEdit>, FixUnavailable> {
        if diagnostics.is_empty() {
            return Err(FixUnavailable::NotApplicable);
        }

        let root = tree.root();
        let mut by_rule: IndexMap<&'static str, (Arc<dyn FixProvider>, Vec<FixEdit>)> =
            IndexMap::new();

        for diagnostic in diagnostics {
            if !tree.contains_range(diagnostic.range()) {
                return Err(FixUnavailable::TargetNotFound);
            }
            let Some((&rule_id, provider)) = self.providers.get_key_value(diagnostic.rule_id.as_str())
            else {
                return Err(FixUnavailable::NotApplicable);
            };
            let edit = provider.compute_edit(&root, diagnostic)?;
            by_rule
                .entry(rule_id)
                .or_insert_with(|| (provider.clone(), Vec::new()))
                .1
                .push(edit);
        }

        let mut edits = Vec::new();
        for (_, (provider, mut rule_edits)) in by_rule {
            // The same diagnostic reported twice is one change, not a conflict
            dedup_edits(&mut rule_edits);
            edits.extend(provider.reconcile(&root, rule_edits)?);
        }
        Ok(edits)
    }
}

fn dedup_edits(edits: &mut Vec<FixEdit>) {
    let mut seen = Vec::with_capacity(edits.len());
    edits.retain(|edit| {
        if seen.contains(edit) {
            false
        } else {
            seen.push(edit.clone());
            true
        }
    });
}

/// Fold `edits` into a new tree in one pass
///
/// Edits are applied from the last position to the first, so ranges recorded
/// against the input stay valid for every edit still pending. Returns the new
/// tree and the ranges of replaced content in it.
pub fn apply_edits(
    tree: &SyntaxTree,
    mut edits: Vec<FixEdit>,
) -> Result<(SyntaxTree, Vec<TextRange>), FixUnavailable> {
    edits.sort_by_key(|edit| (edit.removed_range.start(), edit.removed_range.end()));
    for pair in edits.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            debug!(
                "Conflicting edits at {:?} and {:?}",
                pair[0].removed_range, pair[1].removed_range
            );
            return Err(FixUnavailable::ConflictingEdits);
        }
    }

    let mut green = tree.green().clone();
    let mut reformat: Vec<TextRange> = Vec::new();

    for edit in edits.iter().rev() {
        green = apply_edit(green, edit)?;

        let removed = edit.removed_range.len();
        let inserted = edit.inserted_len();
        for range in &mut reformat {
            *range = if inserted >= removed {
                *range + (inserted - removed)
            } else {
                *range - (removed - inserted)
            };
        }
        if let FixOperation::Replace(elements) = &edit.op {
            if !elements.is_empty() {
                reformat.push(TextRange::at(edit.removed_range.start(), inserted));
            }
        }
    }

    reformat.reverse();
    Ok((SyntaxTree::new(green), reformat))
}

fn apply_edit(green: GreenNode, edit: &FixEdit) -> Result<GreenNode, FixUnavailable> {
    let root = SyntaxNode::new_root(green);
    let target = edit
        .target
        .resolve(&root)
        .ok_or(FixUnavailable::TargetNotFound)?;
    let parent = target.parent().ok_or(FixUnavailable::TargetNotFound)?;

    let covered: Vec<usize> = parent
        .children_with_tokens()
        .enumerate()
        .filter(|(_, child)| edit.removed_range.contains_range(child.text_range()))
        .map(|(index, _)| index)
        .collect();
    let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
        return Err(FixUnavailable::TargetNotFound);
    };

    let replacement = match &edit.op {
        FixOperation::Remove => Vec::new(),
        FixOperation::Replace(elements) => elements.clone(),
    };
    let new_parent = parent.green().splice_children(first..=last, replacement);
    Ok(parent.replace_with(new_parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::syntax::SyntaxTreeBuilder;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    /// `a;` SP `b;` SP `c;`
    fn statements() -> SyntaxTree {
        let mut b = SyntaxTreeBuilder::new();
        b.start_node(SyntaxKind::CompilationUnit);
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            if i > 0 {
                b.token(SyntaxKind::Whitespace, " ");
            }
            b.start_node(SyntaxKind::ExpressionStatement);
            b.token(SyntaxKind::Ident, name);
            b.token(SyntaxKind::Semicolon, ";");
            b.finish_node();
        }
        b.finish_node();
        b.finish()
    }

    fn statement_target(start: u32) -> NodeTarget {
        NodeTarget {
            kind: SyntaxKind::ExpressionStatement,
            range: range(start, start + 2),
        }
    }

    #[test]
    fn test_remove_with_trivia() {
        let tree = statements();
        let edit = FixEdit::remove(statement_target(3), range(3, 6));
        let (fixed, reformat) = apply_edits(&tree, vec![edit]).unwrap();
        assert_eq!(fixed.text(), "a; c;");
        assert!(reformat.is_empty());
        assert_eq!(tree.text(), "a; b; c;");
    }

    #[test]
    fn test_edits_apply_back_to_front() {
        let tree = statements();
        let first = FixEdit::remove(statement_target(0), range(0, 3));
        let last = FixEdit::remove(statement_target(6), range(5, 8));
        let (fixed, _) = apply_edits(&tree, vec![first, last]).unwrap();
        assert_eq!(fixed.text(), "b;");
    }

    #[test]
    fn test_overlapping_edits_conflict() {
        let tree = statements();
        let first = FixEdit::remove(statement_target(0), range(0, 3));
        let second = FixEdit::remove(statement_target(3), range(2, 6));
        assert_eq!(
            apply_edits(&tree, vec![first, second]),
            Err(FixUnavailable::ConflictingEdits)
        );
    }

    #[test]
    fn test_touching_edits_do_not_conflict() {
        let a = FixEdit::remove(statement_target(0), range(0, 3));
        let b = FixEdit::remove(statement_target(3), range(3, 6));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_replace_reports_shifted_reformat_ranges() {
        let tree = statements();
        let x = GreenNode::new(
            SyntaxKind::ExpressionStatement.into(),
            vec![
                NodeOrToken::Token(GreenToken::new(SyntaxKind::Ident.into(), "xyz")),
                NodeOrToken::Token(GreenToken::new(SyntaxKind::Semicolon.into(), ";")),
            ],
        );
        let first = FixEdit::remove(statement_target(0), range(0, 3));
        let last = FixEdit::replace(statement_target(6), vec![NodeOrToken::Node(x)]);
        let (fixed, reformat) = apply_edits(&tree, vec![first, last]).unwrap();
        assert_eq!(fixed.text(), "b; xyz;");
        assert_eq!(reformat, vec![range(3, 7)]);
    }

    #[test]
    fn test_stale_target_is_not_found() {
        let tree = statements();
        let stale = FixEdit::remove(
            NodeTarget {
                kind: SyntaxKind::TryStatement,
                range: range(0, 2),
            },
            range(0, 2),
        );
        assert_eq!(
            apply_edits(&tree, vec![stale]),
            Err(FixUnavailable::TargetNotFound)
        );
    }

    #[test]
    fn test_empty_engine_offers_nothing() {
        let engine = FixEngine::new();
        let diagnostic = Diagnostic::new(
            "S2737",
            "redundant",
            range(0, 2),
            sable_core::Severity::Minor,
        );
        let outcome = engine.fix(&statements(), &diagnostic);
        assert_eq!(
            outcome.unavailable_reason(),
            Some(FixUnavailable::NotApplicable)
        );
    }

    #[test]
    fn test_unavailable_outcome_is_recoverable_error() {
        let conflict = FixOutcome::from(FixUnavailable::ConflictingEdits).into_result();
        let err = conflict.unwrap_err();
        assert_eq!(err.kind(), sable_core::ErrorKind::Fix);
        assert!(err.is_recoverable());

        let applied = FixOutcome::Applied {
            tree: statements(),
            reformat: Vec::new(),
        };
        assert_eq!(applied.into_result().unwrap().text(), "a; b; c;");
    }
}
