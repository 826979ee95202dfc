//! Accessibility configuration
//!
//! Host-level knobs for the core. Everything has a default, so an empty JSON
//! object is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{A11yError, Result};

/// Default storage key for the persisted preference blob
pub const DEFAULT_STORAGE_KEY: &str = "lodge.accessibility.preferences";
/// Default id of the live-region container
pub const DEFAULT_LIVE_REGION_ID: &str = "a11y-live-announcer";

/// Core configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    /// Storage key holding the preference blob
    pub storage_key: String,
    /// How long an announcement node stays in the document
    pub announcement_dwell_ms: u64,
    /// Interval between assistive-technology re-checks
    pub detection_interval_ms: u64,
    /// Id of the live-region container announcements go into
    pub live_region_id: String,
    /// Install the global Alt+key hotkeys
    pub hotkeys_enabled: bool,
    /// Allow the synthesized-speech channel when assistive technology is detected
    pub speech_enabled: bool,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            announcement_dwell_ms: 1000,
            detection_interval_ms: 5000,
            live_region_id: DEFAULT_LIVE_REGION_ID.to_string(),
            hotkeys_enabled: true,
            speech_enabled: true,
        }
    }
}

impl A11yConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| A11yError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(A11yError::Config("storage_key must not be empty".into()));
        }
        if self.live_region_id.trim().is_empty() || self.live_region_id.contains(char::is_whitespace) {
            return Err(A11yError::Config(format!("invalid live_region_id: {:?}", self.live_region_id)));
        }
        if self.announcement_dwell_ms == 0 {
            return Err(A11yError::Config("announcement_dwell_ms must be positive".into()));
        }
        if self.detection_interval_ms == 0 {
            return Err(A11yError::Config("detection_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn with_dwell_ms(mut self, ms: u64) -> Self {
        self.announcement_dwell_ms = ms;
        self
    }

    pub fn with_detection_interval_ms(mut self, ms: u64) -> Self {
        self.detection_interval_ms = ms;
        self
    }

    pub fn with_live_region_id(mut self, id: &str) -> Self {
        self.live_region_id = id.to_string();
        self
    }

    pub fn with_hotkeys(mut self, enabled: bool) -> Self {
        self.hotkeys_enabled = enabled;
        self
    }

    pub fn with_speech(mut self, enabled: bool) -> Self {
        self.speech_enabled = enabled;
        self
    }

    /// Announcement dwell window
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.announcement_dwell_ms)
    }

    /// Assistive-technology re-check interval
    pub fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = A11yConfig::default();
        assert_eq!(config.storage_key, "lodge.accessibility.preferences");
        assert_eq!(config.dwell(), Duration::from_secs(1));
        assert_eq!(config.detection_interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = A11yConfig::from_json(r#"{"announcement_dwell_ms": 1500, "hotkeys_enabled": false}"#).unwrap();
        assert_eq!(config.announcement_dwell_ms, 1500);
        assert!(!config.hotkeys_enabled);
        assert_eq!(config.live_region_id, DEFAULT_LIVE_REGION_ID);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(A11yConfig::from_json("not json"), Err(A11yError::Config(_))));
        assert!(matches!(A11yConfig::from_json(r#"{"live_region_id": "two words"}"#), Err(A11yError::Config(_))));
        assert!(matches!(A11yConfig::from_json(r#"{"announcement_dwell_ms": 0}"#), Err(A11yError::Config(_))));
    }
}
