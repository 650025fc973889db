//! Rule descriptors
//!
//! A descriptor is the immutable metadata record the registry keeps per rule:
//! id, message template, category, severity, default-enabled flag and a kind
//! tag saying how the rule produces (or consumes) diagnostics.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, SableError, Severity};

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Code that is likely wrong
    Correctness,
    /// Code that does nothing useful
    Redundancy,
    /// Design issues such as types that can never be used
    Design,
    /// Style and conventions
    Style,
    /// Custom category using a bespoke slug
    Custom(String),
}

impl RuleCategory {
    /// Return the slug used for filtering and serialization
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Redundancy => "redundancy",
            RuleCategory::Design => "design",
            RuleCategory::Style => "style",
            RuleCategory::Custom(name) => name.as_str(),
        }
    }

    /// Create a category from its slug, mapping unknown slugs to custom categories
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "correctness" => RuleCategory::Correctness,
            "redundancy" | "redundant" => RuleCategory::Redundancy,
            "design" => RuleCategory::Design,
            "style" => RuleCategory::Style,
            other => RuleCategory::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for RuleCategory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        Ok(RuleCategory::from_slug(&slug))
    }
}

/// A compiled comment pattern
///
/// Matching is a regex search over the raw comment text, delimiters included.
#[derive(Debug, Clone)]
pub struct CommentPattern {
    regex: Regex,
}

impl CommentPattern {
    /// Compile `source`, reporting failures against `rule_id`
    pub fn compile(rule_id: &str, source: &str) -> Result<Self> {
        Regex::new(source)
            .map(|regex| Self { regex })
            .map_err(|e| SableError::invalid_pattern(rule_id, e.to_string()))
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for CommentPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for CommentPattern {}

/// How a rule produces or consumes diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Regex tested against every comment in the tree
    Pattern(CommentPattern),
    /// Tree-shape analysis implemented in code
    Structural,
    /// Fix driven by diagnostics of the companion rule `fixes`
    Fix { fixes: String },
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Pattern(_) => "pattern",
            RuleKind::Structural => "structural",
            RuleKind::Fix { .. } => "fix",
        }
    }
}

/// Metadata for one registered rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Unique identifier for the rule
    pub id: String,
    pub title: String,
    /// Message with positional placeholders `{0}`, `{1}`, ...
    pub message_template: String,
    pub category: RuleCategory,
    /// Default severity level
    pub severity: Severity,
    pub default_enabled: bool,
    pub kind: RuleKind,
    /// Documentation URL for the rule
    pub help_url: Option<String>,
}

impl RuleDescriptor {
    fn with_kind(id: impl Into<String>, title: impl Into<String>, kind: RuleKind) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            message_template: title.clone(),
            title,
            category: RuleCategory::Correctness,
            severity: Severity::Major,
            default_enabled: true,
            kind,
            help_url: None,
        }
    }

    /// A comment-pattern rule; fails with `InvalidPattern` if `pattern` does not compile
    pub fn pattern(id: impl Into<String>, title: impl Into<String>, pattern: &str) -> Result<Self> {
        let id = id.into();
        let compiled = CommentPattern::compile(&id, pattern)?;
        Ok(Self::with_kind(id, title, RuleKind::Pattern(compiled)))
    }

    /// A tree-shape analysis rule
    pub fn structural(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_kind(id, title, RuleKind::Structural)
    }

    /// A fix rule for the companion rule `fixes`
    pub fn fix(id: impl Into<String>, title: impl Into<String>, fixes: impl Into<String>) -> Self {
        Self::with_kind(
            id,
            title,
            RuleKind::Fix {
                fixes: fixes.into(),
            },
        )
    }

    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn enabled_by_default(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }

    pub fn comment_pattern(&self) -> Option<&CommentPattern> {
        match &self.kind {
            RuleKind::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self.kind, RuleKind::Pattern(_))
    }

    pub fn is_fix(&self) -> bool {
        matches!(self.kind, RuleKind::Fix { .. })
    }

    /// Id of the rule whose diagnostics drive this fix rule
    pub fn fixes(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Fix { fixes } => Some(fixes.as_str()),
            _ => None,
        }
    }

    /// Render the message template with positional arguments
    pub fn render_message(&self, args: &[&str]) -> String {
        render_message(&self.message_template, args)
    }
}

/// Substitute `{N}` placeholders in one pass
///
/// Placeholders without a matching argument are kept verbatim, and argument
/// text is never re-scanned.
pub fn render_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message() {
        assert_eq!(render_message("Class '{0}' is useless", &["Foo"]), "Class 'Foo' is useless");
        assert_eq!(render_message("{1} then {0}", &["a", "b"]), "b then a");
        assert_eq!(render_message("missing {2}", &["a"]), "missing {2}");
        assert_eq!(render_message("{0}", &["{0}"]), "{0}");
        assert_eq!(render_message("{ not a placeholder }", &["a"]), "{ not a placeholder }");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = RuleDescriptor::pattern("X1", "Broken", "(unclosed").unwrap_err();
        assert!(matches!(err, SableError::InvalidPattern { ref rule_id, .. } if rule_id == "X1"));
    }

    #[test]
    fn test_pattern_descriptor() {
        let rule = RuleDescriptor::pattern("X2", "Todo", "TODO")
            .unwrap()
            .with_severity(Severity::Minor)
            .enabled_by_default(false);
        assert!(rule.is_pattern());
        assert!(!rule.default_enabled);
        assert_eq!(rule.message_template, "Todo");
        assert!(rule.comment_pattern().unwrap().is_match("// TODO: remove"));
    }

    #[test]
    fn test_fix_descriptor() {
        let rule = RuleDescriptor::fix("S2737-fix", "Remove redundant catch", "S2737");
        assert!(rule.is_fix());
        assert_eq!(rule.fixes(), Some("S2737"));
        assert_eq!(rule.kind.name(), "fix");
    }

    #[test]
    fn test_category_slugs() {
        assert_eq!(RuleCategory::from_slug("design"), RuleCategory::Design);
        assert_eq!(
            RuleCategory::from_slug("SonarQube"),
            RuleCategory::Custom("SonarQube".to_string())
        );
        assert_eq!(RuleCategory::Custom("SonarQube".into()).slug(), "SonarQube");
    }
}
