//! Error types for keep-alive operations
//!
//! Cache store operations are total and never return these. Only configuration
//! and the two-phase commit protocol between render and mount can fail.

use crate::ProvisionalKey;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Errors raised when the host breaks the render/mount alternation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Render started while {key} is still waiting for mount confirmation")]
    PendingSlotOccupied { key: ProvisionalKey },

    #[error("Mount confirmation for {got} does not match pending {expected}")]
    ProvisionalKeyMismatch {
        expected: ProvisionalKey,
        got: ProvisionalKey,
    },

    #[error("Mount confirmation received with no pending slot")]
    NoPendingSlot,
}

/// Master error type for all keep-alive errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeepAliveError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Result type alias for keep-alive operations.
pub type KeepAliveResult<T> = Result<T, KeepAliveError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheKey;

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "max".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("max"));
        assert!(msg.contains("0"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_lifecycle_error_display_pending_occupied() {
        let err = LifecycleError::PendingSlotOccupied {
            key: ProvisionalKey::new(CacheKey::from("7::panel"), 3),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("7::panel"));
        assert!(msg.contains("#3"));
    }

    #[test]
    fn test_lifecycle_error_display_mismatch() {
        let err = LifecycleError::ProvisionalKeyMismatch {
            expected: ProvisionalKey::new(CacheKey::from("a"), 1),
            got: ProvisionalKey::new(CacheKey::from("b"), 2),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("a#1"));
        assert!(msg.contains("b#2"));
    }

    #[test]
    fn test_keep_alive_error_from_variants() {
        let config = KeepAliveError::from(ConfigError::MissingRequired {
            field: "include".to_string(),
        });
        assert!(matches!(config, KeepAliveError::Config(_)));

        let lifecycle = KeepAliveError::from(LifecycleError::NoPendingSlot);
        assert!(matches!(lifecycle, KeepAliveError::Lifecycle(_)));
        assert!(format!("{}", lifecycle).contains("no pending slot"));
    }
}
