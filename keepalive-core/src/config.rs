//! Configuration types

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Filters, Pattern};

/// Host-supplied configuration of one keep-alive cache.
///
/// `include` and `exclude` decide which component names are cached at all;
/// `max` bounds the number of live entries (absent = unbounded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    #[serde(default)]
    pub include: Option<Pattern>,
    #[serde(default)]
    pub exclude: Option<Pattern>,
    #[serde(default)]
    pub max: Option<usize>,
}

impl KeepAliveConfig {
    /// Create an unfiltered, unbounded config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the include pattern.
    pub fn with_include(mut self, pattern: Pattern) -> Self {
        self.include = Some(pattern);
        self
    }

    /// Set the exclude pattern.
    pub fn with_exclude(mut self, pattern: Pattern) -> Self {
        self.exclude = Some(pattern);
        self
    }

    /// Set the capacity bound.
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Reject a zero capacity bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_max(self.max)
    }

    /// Include and exclude patterns as one filter set.
    pub fn filters(&self) -> Filters {
        Filters::new(self.include.clone(), self.exclude.clone())
    }
}

/// A capacity bound must be positive when present.
pub fn validate_max(max: Option<usize>) -> Result<(), ConfigError> {
    match max {
        Some(0) => Err(ConfigError::InvalidValue {
            field: "max".to_string(),
            value: "0".to_string(),
            reason: "must be a positive integer".to_string(),
        }),
        _ => Ok(()),
    }
}
