//! Configuration types for sable

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{Result, SableError, Severity};

/// Root configuration record
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SableConfiguration {
    /// JSON schema reference, ignored by the loader
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Which rules run and at what severity
    #[schemars(description = "Linter configuration")]
    pub linter: LinterConfiguration,

    /// Additional rules declared by configuration
    #[schemars(description = "Rules declared in configuration, registered after the builtin rules")]
    pub catalog: Vec<RuleConfig>,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LinterConfiguration {
    /// Enable/disable linter
    #[schemars(description = "Enable or disable the linter")]
    pub enabled: bool,

    /// Per-rule overrides keyed by rule id
    #[schemars(description = "Per-rule overrides keyed by rule id")]
    pub rules: IndexMap<String, RuleOverride>,
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: IndexMap::new(),
        }
    }
}

impl LinterConfiguration {
    /// Whether `rule_id` runs, given its descriptor default
    pub fn is_rule_enabled(&self, rule_id: &str, default_enabled: bool) -> bool {
        self.enabled
            && self
                .rules
                .get(rule_id)
                .and_then(|o| o.enabled)
                .unwrap_or(default_enabled)
    }

    /// Severity for `rule_id`, given its descriptor default
    pub fn severity_for(&self, rule_id: &str, default: Severity) -> Severity {
        self.rules
            .get(rule_id)
            .and_then(|o| o.severity)
            .unwrap_or(default)
    }
}

/// Override for one registered rule
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverride {
    #[schemars(description = "Force the rule on or off")]
    pub enabled: Option<bool>,

    #[schemars(description = "Override the default severity for this rule")]
    pub severity: Option<Severity>,
}

/// A rule declared by configuration
///
/// Entries with a `pattern` become comment-pattern rules; entries with
/// `fixes` become fix rules for the named companion rule. Unset metadata is
/// filled in by the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    /// Stable rule id, unique across the registry
    pub id: String,
    pub title: Option<String>,
    /// Message template with positional placeholders
    pub message: Option<String>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    /// Default-enabled flag
    pub enabled: Option<bool>,
    /// Regular expression tested against raw comment text
    pub pattern: Option<String>,
    /// Companion rule id for fix rules
    pub fixes: Option<String>,
}

impl SableConfiguration {
    /// Load configuration from a file, picking the format by extension
    ///
    /// `.toml`, `.json` and `.jsonc` (JSON with comments and trailing commas)
    /// are supported.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SableError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| SableError::config_error(format!("Invalid JSON: {e}"))),
            Some("jsonc") => Self::from_jsonc_str(&content),
            _ => Err(SableError::config_error(format!(
                "Unsupported file extension for '{}' (expected .toml, .json, or .jsonc)",
                path.display()
            ))),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SableError::config_error(format!("Invalid TOML: {e}")))
    }

    pub fn from_jsonc_str(content: &str) -> Result<Self> {
        json5::from_str(content)
            .map_err(|e| SableError::config_error(format!("Invalid JSONC: {e}")))
    }

    /// Check catalog entries before they reach the registry
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.catalog.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(SableError::config_error(format!(
                    "catalog entry {index} has an empty id"
                )));
            }
            if rule.pattern.is_some() && rule.fixes.is_some() {
                return Err(SableError::config_error(format!(
                    "rule '{}' declares both a pattern and a fixed rule",
                    rule.id
                )));
            }
        }
        Ok(())
    }

    /// JSON schema for the configuration file
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(SableConfiguration);
        serde_json::to_value(&schema).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SableConfiguration::default();
        assert!(config.linter.enabled);
        assert!(config.catalog.is_empty());
        assert!(config.linter.is_rule_enabled("S2737", true));
        assert!(!config.linter.is_rule_enabled("S124", false));
    }

    #[test]
    fn test_overrides() {
        let mut config = LinterConfiguration::default();
        config.rules.insert(
            "S124".to_string(),
            RuleOverride {
                enabled: Some(true),
                severity: Some(Severity::Blocker),
            },
        );
        assert!(config.is_rule_enabled("S124", false));
        assert_eq!(config.severity_for("S124", Severity::Major), Severity::Blocker);
        assert_eq!(config.severity_for("S3453", Severity::Major), Severity::Major);

        config.enabled = false;
        assert!(!config.is_rule_enabled("S124", false));
    }

    #[test]
    fn test_toml() {
        let config = SableConfiguration::from_toml_str(
            r#"
            [linter.rules.S124]
            enabled = true
            severity = "critical"

            [[catalog]]
            id = "NoTodo"
            pattern = "TODO"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.linter.rules["S124"].severity,
            Some(Severity::Critical)
        );
        assert_eq!(config.catalog[0].pattern.as_deref(), Some("TODO"));
    }

    #[test]
    fn test_jsonc_allows_comments() {
        let config = SableConfiguration::from_jsonc_str(
            r#"{
                // local rules
                "catalog": [
                    { "id": "NoFixme", "pattern": "FIXME", "severity": "minor", },
                ],
            }"#,
        )
        .unwrap();
        assert_eq!(config.catalog[0].severity, Some(Severity::Minor));
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let config = SableConfiguration {
            catalog: vec![RuleConfig {
                id: " ".to_string(),
                pattern: Some("x".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SableError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_schema_names_sections() {
        let schema = SableConfiguration::json_schema();
        let properties = &schema["properties"];
        assert!(properties.get("linter").is_some());
        assert!(properties.get("catalog").is_some());
    }
}
