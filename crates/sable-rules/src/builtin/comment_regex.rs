//! Regular expression on comments
//!
//! A template rule: every instance carries its own id and pattern and is
//! tested against the raw text of each comment, delimiters included, so a
//! pattern like `^//\s*TODO` can tell line comments from block comments.
//!
//! The comment runner does the matching; this module only defines the
//! metadata instances inherit.

use sable_core::{Result, RuleCategory, RuleDescriptor, Severity};

/// Rule ID of the builtin instance
pub const RULE_ID: &str = "S124";

pub const TITLE: &str = "Regular expression on comment";

pub const MESSAGE: &str = "The regular expression matches this comment";

pub const CATEGORY: &str = "SonarQube";

pub const HELP_URL: &str =
    "http://nemo.sonarqube.org/coding_rules#rule_key=csharpsquid%3ACommentRegularExpression";

/// Pattern of the builtin instance; the rule is off until configured
pub const DEFAULT_PATTERN: &str = "TODO|FIXME";

/// Descriptor for an instance of the comment rule
///
/// Fails with `InvalidPattern` if `pattern` does not compile.
pub fn descriptor(id: &str, pattern: &str) -> Result<RuleDescriptor> {
    Ok(RuleDescriptor::pattern(id, TITLE, pattern)?
        .with_message(MESSAGE)
        .with_category(RuleCategory::Custom(CATEGORY.to_string()))
        .with_severity(Severity::Major)
        .enabled_by_default(false)
        .with_help_url(HELP_URL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_instance_metadata() {
        let rule = descriptor(RULE_ID, DEFAULT_PATTERN).unwrap();
        assert_eq!(rule.id, "S124");
        assert_eq!(rule.severity, Severity::Major);
        assert!(!rule.default_enabled);
        assert_eq!(rule.category.slug(), "SonarQube");
        assert!(rule.comment_pattern().unwrap().is_match("/* FIXME */"));
    }

    #[test]
    fn test_delimiters_are_part_of_the_text() {
        let rule = descriptor("LineTodo", r"^//\s*TODO").unwrap();
        let pattern = rule.comment_pattern().unwrap();
        assert!(pattern.is_match("// TODO: remove"));
        assert!(!pattern.is_match("/* TODO: remove */"));
    }
}
