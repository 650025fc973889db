//! Remove redundant catch clauses
//!
//! A `try` whose only handler is redundant and which has no `finally` is
//! flattened: the statements of its body take its place. Otherwise just the
//! handler goes, along with the trivia it owns. Filtered handlers are never
//! touched.

use indexmap::IndexMap;
use rowan::{Direction, NodeOrToken, TextRange, TextSize};
use sable_core::syntax::ast::{AstNode, CatchClause, TryStatement};
use sable_core::syntax::{SyntaxElement, find_node_at_range, leading_trivia, range_with_trivia};
use sable_core::{Diagnostic, SyntaxKind, SyntaxNode};

use super::{FixEdit, FixProvider, FixUnavailable, GreenElement, NodeTarget};
use crate::builtin::catch_rethrow::{FIX_TITLE, RULE_ID};

/// Fix provider for redundant catch diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchRethrowFix;

impl FixProvider for CatchRethrowFix {
    fn fixable_rule_ids(&self) -> &[&'static str] {
        &[RULE_ID]
    }

    fn title(&self) -> &str {
        FIX_TITLE
    }

    fn compute_edit(
        &self,
        root: &SyntaxNode,
        diagnostic: &Diagnostic,
    ) -> Result<FixEdit, FixUnavailable> {
        let node =
            find_node_at_range(root, diagnostic.range()).ok_or(FixUnavailable::TargetNotFound)?;
        let clause = node
            .ancestors()
            .filter_map(CatchClause::cast)
            .find(|clause| clause.try_statement().is_some())
            .ok_or(FixUnavailable::NotApplicable)?;
        if clause.is_filtered() {
            return Err(FixUnavailable::NotFixable);
        }
        let try_stmt = clause
            .try_statement()
            .ok_or(FixUnavailable::NotApplicable)?;

        if try_stmt.catch_clauses().count() == 1 && try_stmt.finally_clause().is_none() {
            flatten(&try_stmt)
        } else {
            Ok(remove_clause(&clause))
        }
    }

    /// Turn removals of every handler of a `try` without `finally` into one
    /// flatten, and merge removals of neighbouring handlers that share layout.
    fn reconcile(
        &self,
        root: &SyntaxNode,
        edits: Vec<FixEdit>,
    ) -> Result<Vec<FixEdit>, FixUnavailable> {
        let mut by_try: IndexMap<NodeTarget, Vec<FixEdit>> = IndexMap::new();
        let mut reconciled = Vec::with_capacity(edits.len());

        for edit in edits {
            let owner = (edit.target.kind == SyntaxKind::CatchClause)
                .then(|| edit.target.resolve(root))
                .flatten()
                .and_then(CatchClause::cast)
                .and_then(|clause| clause.try_statement());
            match owner {
                Some(try_stmt) => by_try
                    .entry(NodeTarget::of(try_stmt.syntax()))
                    .or_default()
                    .push(edit),
                None => reconciled.push(edit),
            }
        }

        for (target, removals) in by_try {
            let try_stmt = target
                .resolve(root)
                .and_then(TryStatement::cast)
                .ok_or(FixUnavailable::TargetNotFound)?;
            let removes_every_handler = try_stmt.finally_clause().is_none()
                && try_stmt.catch_clauses().count() == removals.len();
            if removes_every_handler {
                reconciled.push(flatten(&try_stmt)?);
            } else {
                reconciled.extend(merge_removals(&try_stmt, removals));
            }
        }

        Ok(reconciled)
    }
}

/// Replace the whole `try` with the contents of its body
fn flatten(try_stmt: &TryStatement) -> Result<FixEdit, FixUnavailable> {
    let block = try_stmt.block().ok_or(FixUnavailable::NotApplicable)?;
    let inner: Vec<SyntaxElement> = block
        .syntax()
        .children_with_tokens()
        .skip_while(|element| element.kind() != SyntaxKind::LBrace)
        .skip(1)
        .take_while(|element| element.kind() != SyntaxKind::RBrace)
        .collect();

    let is_layout = |element: &SyntaxElement| {
        matches!(element.kind(), SyntaxKind::Whitespace | SyntaxKind::Newline)
    };
    let replacement = match (
        inner.iter().position(|e| !is_layout(e)),
        inner.iter().rposition(|e| !is_layout(e)),
    ) {
        (Some(first), Some(last)) => inner[first..=last].iter().map(to_green).collect(),
        _ => Vec::new(),
    };

    Ok(FixEdit::replace(NodeTarget::of(try_stmt.syntax()), replacement))
}

/// Remove one handler together with the trivia it owns
///
/// The last handler also takes the layout separating it from the previous
/// clause, so no blank line or dangling indentation is left behind.
fn remove_clause(clause: &CatchClause) -> FixEdit {
    let node = clause.syntax();
    let mut range = range_with_trivia(node);

    let is_last = node
        .siblings_with_tokens(Direction::Next)
        .skip(1)
        .all(|element| element.kind().is_trivia());
    if is_last {
        if let Some(start) = preceding_layout_start(node) {
            range = TextRange::new(start, range.end());
        }
    }

    FixEdit::remove(NodeTarget::of(node), range)
}

/// Fold removals of one `try` whose ranges overlap into single edits
///
/// A handler's trailing layout is also the layout the next handler claims
/// when it is the last one, so removing both needs one edit. A run that
/// reaches the last handler starts at the layout before its first handler.
fn merge_removals(try_stmt: &TryStatement, mut removals: Vec<FixEdit>) -> Vec<FixEdit> {
    removals.sort_by_key(|edit| (edit.removed_range.start(), edit.removed_range.end()));

    let mut merged: Vec<FixEdit> = Vec::with_capacity(removals.len());
    for edit in removals {
        match merged.last_mut() {
            Some(run) if run.overlaps(&edit) => {
                run.removed_range = run.removed_range.cover(edit.removed_range);
            }
            _ => merged.push(edit),
        }
    }

    let last_handler = try_stmt
        .finally_clause()
        .is_none()
        .then(|| try_stmt.catch_clauses().last())
        .flatten();
    let Some(last_handler) = last_handler else {
        return merged;
    };
    let last_range = last_handler.syntax().text_range();

    for run in &mut merged {
        if !run.removed_range.contains_range(last_range) {
            continue;
        }
        let first = try_stmt
            .catch_clauses()
            .find(|clause| NodeTarget::of(clause.syntax()) == run.target);
        if let Some(start) = first.and_then(|clause| preceding_layout_start(clause.syntax())) {
            let start = start.min(run.removed_range.start());
            run.removed_range = TextRange::new(start, run.removed_range.end());
        }
    }
    merged
}

/// Start of the whitespace and newlines before `node`'s leading trivia
fn preceding_layout_start(node: &SyntaxNode) -> Option<TextSize> {
    node.siblings_with_tokens(Direction::Prev)
        .skip(1 + leading_trivia(node).len())
        .take_while(|e| matches!(e.kind(), SyntaxKind::Whitespace | SyntaxKind::Newline))
        .last()
        .map(|layout| layout.text_range().start())
}

fn to_green(element: &SyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::{Severity, SyntaxTree};
    use sable_test_utils::{extract_ranges, parse_fixture};

    use crate::fix::{FixEngine, FixOutcome, apply_edits};

    fn diagnostic(range: TextRange) -> Diagnostic {
        Diagnostic::new(RULE_ID, "redundant", range, Severity::Minor)
    }

    /// Parse `marked` and fix every marked range
    fn fix_marked(marked: &str) -> (SyntaxTree, FixOutcome) {
        let (source, ranges) = extract_ranges(marked);
        let tree = parse_fixture(&source);
        let diagnostics: Vec<_> = ranges.into_iter().map(diagnostic).collect();
        let outcome = FixEngine::with_builtin_providers().fix_all(&tree, &diagnostics);
        (tree, outcome)
    }

    fn fixed_text(marked: &str) -> String {
        let (_, outcome) = fix_marked(marked);
        outcome.tree().expect("fix applies").text()
    }

    #[test]
    fn test_single_handler_is_flattened() {
        let fixed = fixed_text("try { A(); B(); } [|catch { throw; }|]\nC();");
        assert_eq!(fixed, "A(); B();\nC();");
    }

    #[test]
    fn test_flatten_keeps_inner_comments() {
        let fixed = fixed_text("try {\n  // first\n  A();\n} [|catch (Exception) { throw; }|]");
        assert_eq!(fixed, "// first\n  A();");
    }

    #[test]
    fn test_flatten_reports_reformat_range() {
        let (_, outcome) = fix_marked("x; try { A(); } [|catch { throw; }|]");
        let FixOutcome::Applied { tree, reformat } = outcome else {
            panic!("fix applies");
        };
        assert_eq!(tree.text(), "x; A();");
        assert_eq!(reformat.len(), 1);
        assert_eq!(&tree.text()[reformat[0]], "A();");
    }

    #[test]
    fn test_empty_body_removes_statement() {
        let fixed = fixed_text("a; try { } [|catch { throw; }|] b;");
        assert_eq!(fixed, "a;  b;");
    }

    #[test]
    fn test_first_of_two_handlers_removed() {
        let fixed = fixed_text(
            "try { A(); } [|catch (IOException) { throw; }|] catch (Exception e) { Log(e); }",
        );
        assert_eq!(fixed, "try { A(); } catch (Exception e) { Log(e); }");
    }

    #[test]
    fn test_last_handler_takes_preceding_layout() {
        let fixed = fixed_text(
            "try\n{\n  A();\n}\ncatch (IOException)\n{\n  Log();\n}\n[|catch\n{\n  throw;\n}|]\nB();",
        );
        assert_eq!(fixed, "try\n{\n  A();\n}\ncatch (IOException)\n{\n  Log();\n}\nB();");
    }

    #[test]
    fn test_handler_before_finally_removed() {
        let fixed = fixed_text("try { A(); } [|catch { throw; }|] finally { B(); }");
        assert_eq!(fixed, "try { A(); } finally { B(); }");
    }

    #[test]
    fn test_filtered_handler_not_fixed() {
        let (_, outcome) =
            fix_marked("try { A(); } [|catch (IOException e) when (e.Retry) { throw; }|]");
        assert_eq!(
            outcome.unavailable_reason(),
            Some(FixUnavailable::NotFixable)
        );
    }

    #[test]
    fn test_outside_any_handler_not_applicable() {
        let (_, outcome) = fix_marked("[|A();|] try { B(); } catch { throw; }");
        assert_eq!(
            outcome.unavailable_reason(),
            Some(FixUnavailable::NotApplicable)
        );
    }

    #[test]
    fn test_stale_span_not_found() {
        let (source, _) = extract_ranges("try { A(); } catch { throw; }");
        let tree = parse_fixture(&source);
        let stale = diagnostic(TextRange::new(TextSize::from(2), TextSize::from(9)));
        let outcome = FixEngine::with_builtin_providers().fix(&tree, &stale);
        assert_eq!(
            outcome.unavailable_reason(),
            Some(FixUnavailable::TargetNotFound)
        );
    }

    #[test]
    fn test_removing_every_handler_flattens() {
        let fixed = fixed_text(
            "try { A(); } [|catch (IOException) { throw; }|] [|catch (Exception) { throw; }|]",
        );
        assert_eq!(fixed, "A();");
    }

    #[test]
    fn test_reconcile_keeps_partial_removals() {
        let (source, ranges) = extract_ranges(
            "try { A(); } [|catch (IOException) { throw; }|] catch { Log(); } [|catch (Exception) { throw; }|]",
        );
        let tree = parse_fixture(&source);
        let root = tree.root();
        let edits: Vec<_> = ranges
            .into_iter()
            .map(|range| CatchRethrowFix.compute_edit(&root, &diagnostic(range)).unwrap())
            .collect();
        let reconciled = CatchRethrowFix.reconcile(&root, edits.clone()).unwrap();
        assert_eq!(reconciled, edits);

        let (fixed, _) = apply_edits(&tree, reconciled).unwrap();
        assert_eq!(fixed.text(), "try { A(); } catch { Log(); }");
    }

    #[test]
    fn test_adjacent_trailing_removals_merge() {
        let fixed = fixed_text(
            "try { A(); } catch (E e) { Log(e); } [|catch (IOException) { throw; }|] [|catch { throw; }|]",
        );
        assert_eq!(fixed, "try { A(); } catch (E e) { Log(e); }");
    }

    #[test]
    fn test_adjacent_trailing_removals_merge_across_lines() {
        let fixed = fixed_text(
            "try\n{\n  A();\n}\ncatch (E e)\n{\n  Log(e);\n}\n[|catch (IOException)\n{\n  throw;\n}|]\n[|catch\n{\n  throw;\n}|]\nB();",
        );
        assert_eq!(fixed, "try\n{\n  A();\n}\ncatch (E e)\n{\n  Log(e);\n}\nB();");
    }

    #[test]
    fn test_adjacent_removals_before_finally() {
        let fixed = fixed_text(
            "try { A(); } [|catch (IOException) { throw; }|] [|catch { throw; }|] finally { B(); }",
        );
        assert_eq!(fixed, "try { A(); } finally { B(); }");
    }

    #[test]
    fn test_nested_flattens_conflict() {
        let (tree, outcome) = fix_marked(
            "try { try { A(); } [|catch { throw; }|] } [|catch { throw; }|]",
        );
        assert_eq!(
            outcome.unavailable_reason(),
            Some(FixUnavailable::ConflictingEdits)
        );
        assert_eq!(tree.text(), "try { try { A(); } catch { throw; } } catch { throw; }");
    }
}
