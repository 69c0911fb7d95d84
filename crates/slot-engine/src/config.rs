//! Resolver configuration.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Default number of days, starting today, over which recurring rules expand.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Default slot step in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Largest accepted horizon.
pub const MAX_HORIZON_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    pub horizon_days: u32,
    pub granularity_minutes: u32,
    /// Length of one appointment. Falls back to `granularity_minutes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_minutes: Option<u32>,
    /// Whether one-off dates earlier than today are still offered.
    pub include_past_one_offs: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            session_minutes: None,
            include_past_one_offs: true,
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.granularity_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "granularityMinutes must be positive".to_string(),
            ));
        }
        if self.granularity_minutes >= 24 * 60 {
            return Err(SlotError::InvalidConfig(format!(
                "granularityMinutes {} must be shorter than a day",
                self.granularity_minutes
            )));
        }
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(SlotError::InvalidConfig(format!(
                "horizonDays {} exceeds the maximum of {}",
                self.horizon_days, MAX_HORIZON_DAYS
            )));
        }
        if self.session_minutes == Some(0) {
            return Err(SlotError::InvalidConfig(
                "sessionMinutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective appointment length in minutes.
    pub fn session_minutes(&self) -> u32 {
        self.session_minutes.unwrap_or(self.granularity_minutes)
    }
}
