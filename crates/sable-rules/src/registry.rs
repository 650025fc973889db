//! Rule descriptor registry
//!
//! Holds exactly one descriptor per rule id, in registration order. Readers
//! take a [`RegistrySnapshot`] (an `Arc`) that never changes underneath them;
//! writers serialize on a lock, copy the snapshot, insert and swap.

use indexmap::IndexMap;
use sable_core::{RuleCategory, RuleConfig, RuleDescriptor, RuleKind, Result, SableError};
use std::sync::{Arc, RwLock};

use crate::builtin;

/// Immutable view of the registry at one point in time
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    rules: IndexMap<String, Arc<RuleDescriptor>>,
}

impl RegistrySnapshot {
    pub fn get(&self, id: &str) -> Option<&Arc<RuleDescriptor>> {
        self.rules.get(id)
    }

    /// Look up a descriptor, failing with `UnknownRuleId`
    pub fn lookup(&self, id: &str) -> Result<Arc<RuleDescriptor>> {
        self.rules
            .get(id)
            .cloned()
            .ok_or_else(|| SableError::unknown_rule_id(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// All descriptors in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RuleDescriptor>> {
        self.rules.values()
    }

    /// Comment-pattern rules in registry order
    pub fn pattern_rules(&self) -> Vec<Arc<RuleDescriptor>> {
        self.iter().filter(|rule| rule.is_pattern()).cloned().collect()
    }

    /// Structural analysis rules in registry order
    pub fn structural_rules(&self) -> Vec<Arc<RuleDescriptor>> {
        self.iter()
            .filter(|rule| rule.kind == RuleKind::Structural)
            .cloned()
            .collect()
    }

    /// The fix rule driven by diagnostics of `rule_id`, if any
    pub fn fix_rule_for(&self, rule_id: &str) -> Option<Arc<RuleDescriptor>> {
        self.iter().find(|rule| rule.fixes() == Some(rule_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Registry for rule descriptors
#[derive(Debug, Default)]
pub struct RuleRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin rules
    pub fn with_builtin_rules() -> Result<Self> {
        let registry = Self::new();
        for descriptor in builtin::descriptors()? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Current snapshot; cheap to clone and safe to hold across threads
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Register a descriptor, failing with `DuplicateRuleId` if the id exists
    pub fn register(&self, descriptor: RuleDescriptor) -> Result<()> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());

        if guard.contains(&descriptor.id) {
            tracing::warn!("Rejected duplicate rule id '{}'", descriptor.id);
            return Err(SableError::duplicate_rule_id(&descriptor.id));
        }

        let mut next = RegistrySnapshot::clone(&guard);
        tracing::debug!(
            "Registered {} rule '{}'",
            descriptor.kind.name(),
            descriptor.id
        );
        next.rules
            .insert(descriptor.id.clone(), Arc::new(descriptor));
        *guard = Arc::new(next);
        Ok(())
    }

    /// Build a descriptor from a configuration record and register it
    ///
    /// Entries with a `pattern` become comment-pattern rules that default to
    /// the comment rule's metadata; entries with `fixes` become fix rules and
    /// entries with neither become structural rules.
    pub fn register_config(&self, config: &RuleConfig) -> Result<()> {
        let descriptor = descriptor_from_config(config)?;
        self.register(descriptor)
    }

    /// Register every catalog entry, stopping at the first failure
    pub fn register_catalog(&self, catalog: &[RuleConfig]) -> Result<()> {
        catalog
            .iter()
            .try_for_each(|config| self.register_config(config))
    }

    /// Look up a descriptor, failing with `UnknownRuleId`
    pub fn lookup(&self, id: &str) -> Result<Arc<RuleDescriptor>> {
        self.snapshot().lookup(id)
    }

    /// Every descriptor in registry order
    pub fn all_descriptors(&self) -> Vec<Arc<RuleDescriptor>> {
        self.snapshot().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

fn descriptor_from_config(config: &RuleConfig) -> Result<RuleDescriptor> {
    if config.id.trim().is_empty() {
        return Err(SableError::config_error("rule id must not be empty"));
    }

    let mut descriptor = match (&config.pattern, &config.fixes) {
        (Some(pattern), None) => builtin::comment_regex::descriptor(&config.id, pattern)?,
        (None, Some(fixes)) => RuleDescriptor::fix(
            config.id.clone(),
            config.title.clone().unwrap_or_else(|| config.id.clone()),
            fixes.clone(),
        ),
        (Some(_), Some(_)) => {
            return Err(SableError::config_error(format!(
                "rule '{}' declares both a pattern and a fixed rule",
                config.id
            )));
        }
        (None, None) => RuleDescriptor::structural(
            config.id.clone(),
            config.title.clone().unwrap_or_else(|| config.id.clone()),
        ),
    };

    if let Some(title) = &config.title {
        descriptor.title = title.clone();
    }
    if let Some(message) = &config.message {
        descriptor.message_template = message.clone();
    }
    if let Some(category) = &config.category {
        descriptor.category = RuleCategory::from_slug(category);
    }
    if let Some(severity) = config.severity {
        descriptor.severity = severity;
    }
    if let Some(enabled) = config.enabled {
        descriptor.default_enabled = enabled;
    }
    Ok(descriptor)
}
