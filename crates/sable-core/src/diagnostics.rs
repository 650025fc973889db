//! Diagnostic types produced by rule analysis
//!
//! A diagnostic pins a rule id and rendered message to a span of the tree
//! that produced it. Serialized form (camelCase):
//!
//! ```json
//! { "ruleId": "S124", "message": "...", "span": { "startOffset": 4, "length": 9 }, "severity": "major" }
//! ```

use rowan::{TextRange, TextSize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity levels for diagnostics, lowest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
            Severity::Blocker => "blocker",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "minor" => Ok(Severity::Minor),
            "major" => Ok(Severity::Major),
            "critical" => Ok(Severity::Critical),
            "blocker" => Ok(Severity::Blocker),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Byte span in the source text of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start_offset: u32,
    pub length: u32,
}

impl Span {
    pub fn new(start_offset: u32, length: u32) -> Self {
        Self {
            start_offset,
            length,
        }
    }

    pub fn end_offset(&self) -> u32 {
        self.start_offset + self.length
    }

    pub fn to_range(self) -> TextRange {
        TextRange::at(TextSize::from(self.start_offset), TextSize::from(self.length))
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start_offset: range.start().into(),
            length: range.len().into(),
        }
    }
}

/// A finding reported by a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Identifier of the rule that generated this diagnostic
    pub rule_id: String,
    /// Rendered message
    pub message: String,
    /// Location in the tree that produced it
    pub span: Span,
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        span: impl Into<Span>,
        severity: Severity,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            span: span.into(),
            severity,
        }
    }

    /// Override the severity, e.g. from configuration
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The span as a rowan range
    pub fn range(&self) -> TextRange {
        self.span.to_range()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}..{}: {}",
            self.rule_id,
            self.severity,
            self.span.start_offset,
            self.span.end_offset(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Minor);
        assert!(Severity::Minor < Severity::Major);
        assert!(Severity::Critical < Severity::Blocker);
        assert_eq!("MAJOR".parse::<Severity>(), Ok(Severity::Major));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_span_roundtrips_through_range() {
        let span = Span::new(4, 9);
        let range = span.to_range();
        assert_eq!(u32::from(range.start()), 4);
        assert_eq!(u32::from(range.end()), 13);
        assert_eq!(Span::from(range), span);
    }

    #[test]
    fn test_diagnostic_serializes_camel_case() {
        let diagnostic = Diagnostic::new(
            "S124",
            "The regular expression matches this comment",
            Span::new(4, 9),
            Severity::Major,
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ruleId": "S124",
                "message": "The regular expression matches this comment",
                "span": { "startOffset": 4, "length": 9 },
                "severity": "major"
            })
        );
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new("S2737", "Remove this catch", Span::new(10, 5), Severity::Minor);
        assert_eq!(diagnostic.to_string(), "S2737[minor] 10..15: Remove this catch");
    }
}
