//! # Configuration
//!
//! Settings for serving one stateful model. Every field is optional in the
//! JSON form and falls back to its default.
//!
//! ```
//! use hearth::config::StatefulConfig;
//!
//! let config = StatefulConfig::from_json(r#"{"max_sequence_number": 24}"#).unwrap();
//! assert_eq!(config.max_sequence_number, 24);
//! assert_eq!(config.sequence_timeout_seconds, 60);
//! ```

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

pub const DEFAULT_SEQUENCE_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_MAX_SEQUENCE_NUMBER: u32 = 500;
pub const DEFAULT_SEQUENCE_CLEANER_INTERVAL_SECONDS: u64 = 300;

/// Limits and housekeeping cadence for a stateful model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatefulConfig {
    /// Idle seconds after which a sequence is dropped by the sweeper
    pub sequence_timeout_seconds: u64,

    /// Most sequences that may be registered at once
    pub max_sequence_number: u32,

    /// How often the sweeper looks for idle sequences
    pub sequence_cleaner_interval_seconds: u64,
}

impl Default for StatefulConfig {
    fn default() -> Self {
        Self {
            sequence_timeout_seconds: DEFAULT_SEQUENCE_TIMEOUT_SECONDS,
            max_sequence_number: DEFAULT_MAX_SEQUENCE_NUMBER,
            sequence_cleaner_interval_seconds: DEFAULT_SEQUENCE_CLEANER_INTERVAL_SECONDS,
        }
    }
}

impl StatefulConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the sweeper cannot run with.
    ///
    /// A zero timeout or a zero sequence limit are legal; they make every
    /// idle sequence expire immediately or refuse every start respectively.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_cleaner_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "sequence_cleaner_interval_seconds",
                reason: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    pub fn cleaner_interval(&self) -> Duration {
        Duration::from_secs(self.sequence_cleaner_interval_seconds)
    }
}
