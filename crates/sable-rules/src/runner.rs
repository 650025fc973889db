//! Comment pattern runner
//!
//! Walks a tree once, depth first, and tests every comment against every
//! pattern rule in registry order. A comment matched by several rules yields
//! one diagnostic per rule. Patterns are compiled when rules are registered,
//! so running never fails on configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sable_core::syntax::{TriviaCollector, collect_comments};
use sable_core::{Diagnostic, Result, RuleDescriptor, SableError, SyntaxTree};
use tracing::debug;

/// Cooperative cancellation signal shared with the host
///
/// Checked between the top-level elements of a traversal, never per token.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Runs comment pattern rules over syntax trees
#[derive(Debug, Clone, Default)]
pub struct CommentRuleRunner {
    rules: Vec<Arc<RuleDescriptor>>,
}

impl CommentRuleRunner {
    /// Create a runner over `rules`, keeping only pattern rules
    pub fn new(rules: impl IntoIterator<Item = Arc<RuleDescriptor>>) -> Self {
        Self {
            rules: rules.into_iter().filter(|rule| rule.is_pattern()).collect(),
        }
    }

    pub fn rules(&self) -> &[Arc<RuleDescriptor>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Lazily yield diagnostics in comment source order, then rule order
    pub fn run<'a>(&'a self, tree: &SyntaxTree) -> impl Iterator<Item = Diagnostic> + 'a {
        collect_comments(tree.root()).flat_map(move |comment| {
            self.rules.iter().filter_map(move |rule| {
                let pattern = rule.comment_pattern()?;
                pattern.is_match(&comment.text).then(|| {
                    Diagnostic::new(
                        &rule.id,
                        rule.render_message(&[comment.text.as_str()]),
                        comment.range,
                        rule.severity,
                    )
                })
            })
        })
    }

    /// Like [`run`](Self::run), but stops with `Cancelled` once `flag` is set
    pub fn run_cancellable(
        &self,
        tree: &SyntaxTree,
        flag: &CancellationFlag,
    ) -> Result<Vec<Diagnostic>> {
        let collector = TriviaCollector::comments();
        let mut diagnostics = Vec::new();

        for element in tree.root().children_with_tokens() {
            if flag.is_cancelled() {
                debug!("Comment run cancelled after {} diagnostics", diagnostics.len());
                return Err(SableError::Cancelled);
            }
            for comment in collector.collect_element(&element) {
                for rule in &self.rules {
                    let Some(pattern) = rule.comment_pattern() else {
                        continue;
                    };
                    if pattern.is_match(&comment.text) {
                        diagnostics.push(Diagnostic::new(
                            &rule.id,
                            rule.render_message(&[comment.text.as_str()]),
                            comment.range,
                            rule.severity,
                        ));
                    }
                }
            }
        }

        Ok(diagnostics)
    }
}
