//! Diagnostic and fix coordinator
//!
//! The host-facing surface: `analyze` a tree, then ask for a fix of one or
//! many of the reported diagnostics. The analyzer itself is immutable once
//! built, so one instance can serve concurrent requests on any thread.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use sable_core::{
    Diagnostic, LinterConfiguration, Result, ResultExt, RuleDescriptor, SableError, SyntaxTree,
    TextEdit, derive_text_edits,
};
use tracing::{Level, debug, info, span, warn};

use crate::builtin::{self, CheckFn};
use crate::fix::{FixEngine, FixOutcome, FixUnavailable};
use crate::registry::RegistrySnapshot;
use crate::runner::{CancellationFlag, CommentRuleRunner};

/// Runs the enabled rules of a registry snapshot and computes their fixes
#[derive(Debug, Clone)]
pub struct Analyzer {
    snapshot: Arc<RegistrySnapshot>,
    runner: CommentRuleRunner,
    checks: Vec<(Arc<RuleDescriptor>, CheckFn)>,
    fixes: FixEngine,
}

impl Analyzer {
    /// Build an analyzer for the rules `config` enables
    ///
    /// Severity overrides are applied here, so every diagnostic comes out
    /// with its effective severity.
    pub fn new(snapshot: Arc<RegistrySnapshot>, config: &LinterConfiguration) -> Self {
        let enabled: Vec<Arc<RuleDescriptor>> = snapshot
            .iter()
            .filter(|rule| config.is_rule_enabled(&rule.id, rule.default_enabled))
            .map(|rule| effective_rule(rule, config))
            .collect();

        let runner = CommentRuleRunner::new(enabled.iter().cloned());

        let mut checks = Vec::new();
        for rule in enabled.iter().filter(|rule| !rule.is_pattern() && !rule.is_fix()) {
            match builtin::structural_check(&rule.id) {
                Some(check) => checks.push((rule.clone(), check)),
                None => warn!("No check implements structural rule {}", rule.id),
            }
        }

        let builtin_fixes = FixEngine::with_builtin_providers();
        let mut fixes = FixEngine::new();
        for fixed in enabled.iter().filter_map(|rule| rule.fixes()) {
            match builtin_fixes.provider_for(fixed) {
                Some(provider) => fixes.add_provider(provider.clone()),
                None => warn!("No fix provider for rule {}", fixed),
            }
        }

        debug!(
            "Analyzer ready: {} pattern rules, {} structural rules",
            runner.rules().len(),
            checks.len()
        );

        Self {
            snapshot,
            runner,
            checks,
            fixes,
        }
    }

    /// Analyzer over the builtin rules with default configuration
    pub fn with_builtin_rules() -> Result<Self> {
        let registry = crate::RuleRegistry::with_builtin_rules()?;
        Ok(Self::new(registry.snapshot(), &LinterConfiguration::default()))
    }

    /// Every registered descriptor, enabled or not, for the host to advertise
    pub fn supported_rules(&self) -> Vec<Arc<RuleDescriptor>> {
        self.snapshot.iter().cloned().collect()
    }

    /// IDs of the rules that actually run
    pub fn active_rule_ids(&self) -> Vec<&str> {
        self.runner
            .rules()
            .iter()
            .chain(self.checks.iter().map(|(rule, _)| rule))
            .map(|rule| rule.id.as_str())
            .collect()
    }

    /// Diagnostics for `tree`, ordered by start offset
    ///
    /// Diagnostics starting at the same offset keep the order they were
    /// produced in: comment rules first, in registry order, then structural
    /// rules.
    pub fn analyze(&self, tree: &SyntaxTree) -> Vec<Diagnostic> {
        let span = span!(Level::DEBUG, "analyze", len = u32::from(tree.text_len()));
        let _enter = span.enter();

        let mut diagnostics: Vec<Diagnostic> = self.runner.run(tree).collect();
        if !self.checks.is_empty() {
            let root = tree.root();
            for (rule, check) in &self.checks {
                diagnostics.extend(check(&root, rule));
            }
        }

        diagnostics.sort_by_key(|diagnostic| diagnostic.span.start_offset);
        debug!("Found {} diagnostics", diagnostics.len());
        diagnostics
    }

    /// Like [`analyze`](Self::analyze), checking `flag` between top-level
    /// elements and between structural rules
    pub fn analyze_cancellable(
        &self,
        tree: &SyntaxTree,
        flag: &CancellationFlag,
    ) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = self.runner.run_cancellable(tree, flag)?;
        let root = tree.root();
        for (rule, check) in &self.checks {
            if flag.is_cancelled() {
                return Err(SableError::Cancelled);
            }
            diagnostics.extend(check(&root, rule));
        }

        diagnostics.sort_by_key(|diagnostic| diagnostic.span.start_offset);
        Ok(diagnostics)
    }

    /// Analyze many trees in parallel; results are in input order
    pub fn analyze_many(&self, trees: &[SyntaxTree]) -> Vec<Vec<Diagnostic>> {
        let start_time = Instant::now();
        let results: Vec<Vec<Diagnostic>> =
            trees.par_iter().map(|tree| self.analyze(tree)).collect();
        info!(
            "Analyzed {} trees in {:?}",
            trees.len(),
            start_time.elapsed()
        );
        results
    }

    pub fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        self.fixes.can_fix(&diagnostic.rule_id)
    }

    /// Title of the fix offered for `diagnostic`
    pub fn fix_title(&self, diagnostic: &Diagnostic) -> Option<&str> {
        self.fixes
            .provider_for(&diagnostic.rule_id)
            .map(|provider| provider.title())
    }

    /// New tree with `diagnostic` fixed, or why there is none
    pub fn compute_fix(&self, tree: &SyntaxTree, diagnostic: &Diagnostic) -> FixOutcome {
        let outcome = self.fixes.fix(tree, diagnostic);
        if let FixOutcome::Unavailable(reason) = &outcome {
            debug!("No fix for {}: {}", diagnostic, reason);
        }
        outcome
    }

    /// New tree with every diagnostic fixed in one transaction
    ///
    /// Either all edits apply or the outcome is `Unavailable` and nothing
    /// changes.
    pub fn compute_fix_all(&self, tree: &SyntaxTree, diagnostics: &[Diagnostic]) -> FixOutcome {
        let span = span!(Level::DEBUG, "compute_fix_all", count = diagnostics.len());
        let _enter = span.enter();

        let outcome = self.fixes.fix_all(tree, diagnostics);
        match &outcome {
            FixOutcome::Applied { .. } => {
                debug!("Fixed {} diagnostics", diagnostics.len())
            }
            FixOutcome::Unavailable(FixUnavailable::ConflictingEdits) => {
                warn!("Rejected fix batch of {} diagnostics: edits overlap", diagnostics.len())
            }
            FixOutcome::Unavailable(reason) => debug!("Fix batch unavailable: {}", reason),
        }
        outcome
    }

    /// Fix every document's diagnostics in parallel
    ///
    /// Each document is its own transaction. A document whose batch cannot
    /// be applied comes back unchanged and the failure is logged.
    pub fn fix_many(&self, documents: &[(SyntaxTree, Vec<Diagnostic>)]) -> Vec<SyntaxTree> {
        let start_time = Instant::now();
        let fixed: Vec<SyntaxTree> = documents
            .par_iter()
            .map(|(tree, diagnostics)| {
                if diagnostics.is_empty() {
                    return tree.clone();
                }
                self.compute_fix_all(tree, diagnostics)
                    .into_result()
                    .log_and_continue()
                    .unwrap_or_else(|| tree.clone())
            })
            .collect();
        info!(
            "Fixed {} documents in {:?}",
            documents.len(),
            start_time.elapsed()
        );
        fixed
    }

    /// Minimal text edits turning `original` into the fixed tree
    pub fn text_edits_for(&self, original: &SyntaxTree, outcome: &FixOutcome) -> Option<Vec<TextEdit>> {
        outcome
            .tree()
            .map(|fixed| derive_text_edits(&original.text(), &fixed.text()))
    }
}

fn effective_rule(rule: &Arc<RuleDescriptor>, config: &LinterConfiguration) -> Arc<RuleDescriptor> {
    let severity = config.severity_for(&rule.id, rule.severity);
    if severity == rule.severity {
        rule.clone()
    } else {
        Arc::new(rule.as_ref().clone().with_severity(severity))
    }
}
