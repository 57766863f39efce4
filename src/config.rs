//! Engine configuration
//!
//! Defaults reproduce the loose aggregate rule and the cascading
//! downgrade. Values can come from JSON or from `PERMTREE_*` variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    ENV_DEBOUNCE_MS, ENV_HIDE_PARTIAL, ENV_SEARCH_MIN_CHARS, ENV_SEARCH_THRESHOLD,
    ENV_STRICT_CASCADE, SEARCH_MIN_MATCH_CHARS, SEARCH_THRESHOLD, VALIDATION_DEBOUNCE,
};
use crate::error::{PermissionsError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Apply the parent level verbatim when supported, otherwise `None`,
    /// instead of downgrading to the nearest supported level.
    pub strict_cascade: bool,
    /// Disable an aggregate option unless every descendant supports it.
    pub hide_unless_all_children_support: bool,
    pub validation_debounce_ms: u64,
    pub search_threshold: f64,
    pub search_min_match_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_cascade: false,
            hide_unless_all_children_support: false,
            validation_debounce_ms: VALIDATION_DEBOUNCE.as_millis() as u64,
            search_threshold: SEARCH_THRESHOLD,
            search_min_match_chars: SEARCH_MIN_MATCH_CHARS,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn validation_debounce(&self) -> Duration {
        Duration::from_millis(self.validation_debounce_ms)
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading engine configuration from environment variables");
        let mut config = Self::default();

        if let Ok(v) = env::var(ENV_STRICT_CASCADE) {
            config.strict_cascade = v
                .parse()
                .map_err(|e| PermissionsError::Config(format!("Invalid {}: {}", ENV_STRICT_CASCADE, e)))?;
        }
        if let Ok(v) = env::var(ENV_HIDE_PARTIAL) {
            config.hide_unless_all_children_support = v
                .parse()
                .map_err(|e| PermissionsError::Config(format!("Invalid {}: {}", ENV_HIDE_PARTIAL, e)))?;
        }
        if let Ok(v) = env::var(ENV_DEBOUNCE_MS) {
            config.validation_debounce_ms = v
                .parse()
                .map_err(|e| PermissionsError::Config(format!("Invalid {}: {}", ENV_DEBOUNCE_MS, e)))?;
        }
        if let Ok(v) = env::var(ENV_SEARCH_THRESHOLD) {
            config.search_threshold = v
                .parse()
                .map_err(|e| PermissionsError::Config(format!("Invalid {}: {}", ENV_SEARCH_THRESHOLD, e)))?;
        }
        if let Ok(v) = env::var(ENV_SEARCH_MIN_CHARS) {
            config.search_min_match_chars = v
                .parse()
                .map_err(|e| PermissionsError::Config(format!("Invalid {}: {}", ENV_SEARCH_MIN_CHARS, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search_threshold) {
            return Err(PermissionsError::Config(format!(
                "search_threshold must be within [0, 1], got {}",
                self.search_threshold
            )));
        }
        if self.search_min_match_chars == 0 {
            return Err(PermissionsError::Config("search_min_match_chars must be at least 1".into()));
        }
        Ok(())
    }
}
