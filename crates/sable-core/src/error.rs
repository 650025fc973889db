//! Error types for rule registration, analysis and fixing

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sable operations
#[derive(Debug, Error)]
pub enum SableError {
    /// A rule with this id is already registered
    #[error("Duplicate rule id '{rule_id}'")]
    DuplicateRuleId { rule_id: String },

    /// No rule with this id is registered
    #[error("Unknown rule id '{rule_id}'")]
    UnknownRuleId { rule_id: String },

    /// A rule's comment pattern failed to compile
    #[error("Invalid pattern for rule '{rule_id}': {message}")]
    InvalidPattern { rule_id: String, message: String },

    /// Edits in one fix batch overlap
    #[error("Conflicting edits: {message}")]
    ConflictingEdits { message: String },

    /// No fix could be produced for a diagnostic
    #[error("Fix unavailable: {reason}")]
    FixUnavailable { reason: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller cancelled a running analysis
    #[error("Operation cancelled")]
    Cancelled,
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Registry,
    Pattern,
    Fix,
    Config,
    Io,
    Cancelled,
}

impl SableError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SableError::DuplicateRuleId { .. } | SableError::UnknownRuleId { .. } => {
                ErrorKind::Registry
            }
            SableError::InvalidPattern { .. } => ErrorKind::Pattern,
            SableError::ConflictingEdits { .. } | SableError::FixUnavailable { .. } => {
                ErrorKind::Fix
            }
            SableError::ConfigError { .. } => ErrorKind::Config,
            SableError::IoError { .. } => ErrorKind::Io,
            SableError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Check if this error is recoverable (other documents can still be processed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fix | ErrorKind::Cancelled)
    }

    pub fn duplicate_rule_id(rule_id: impl Into<String>) -> Self {
        Self::DuplicateRuleId {
            rule_id: rule_id.into(),
        }
    }

    pub fn unknown_rule_id(rule_id: impl Into<String>) -> Self {
        Self::UnknownRuleId {
            rule_id: rule_id.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn conflicting_edits(message: impl Into<String>) -> Self {
        Self::ConflictingEdits {
            message: message.into(),
        }
    }

    pub fn fix_unavailable(reason: impl Into<String>) -> Self {
        Self::FixUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for SableError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SableError::duplicate_rule_id("S1").kind(), ErrorKind::Registry);
        assert_eq!(
            SableError::invalid_pattern("S124", "unclosed group").kind(),
            ErrorKind::Pattern
        );
        assert_eq!(SableError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_recoverable() {
        assert!(SableError::conflicting_edits("overlap").is_recoverable());
        assert!(SableError::fix_unavailable("stale span").is_recoverable());
        assert!(!SableError::config_error("bad").is_recoverable());
        assert!(!SableError::unknown_rule_id("S9").is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = SableError::invalid_pattern("S124", "unclosed group");
        assert_eq!(
            err.to_string(),
            "Invalid pattern for rule 'S124': unclosed group"
        );
    }
}
