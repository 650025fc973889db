//! Result type alias for sable operations

use crate::error::SableError;

/// Standard Result type for sable operations
pub type Result<T> = std::result::Result<T, SableError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Continuing after error: {}", err);
                None
            }
            Err(err) => {
                tracing::error!("Fatal error: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue() {
        assert_eq!(Ok::<_, SableError>(1).log_and_continue(), Some(1));
        assert_eq!(Err::<u32, _>(SableError::Cancelled).log_and_continue(), None);
    }
}
