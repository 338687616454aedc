//! Configuration for the Extractor

use crate::repair::MAX_REPAIRS;
use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Person used when neither the email nor the sender directory names one
    pub default_person: String,

    /// Title used when the model reply has none
    pub untitled_event: String,

    /// Maximum closing symbols appended when repairing truncated JSON
    pub max_repairs: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_person.trim().is_empty() {
            return Err("default_person must not be empty".to_string());
        }
        if self.untitled_event.trim().is_empty() {
            return Err("untitled_event must not be empty".to_string());
        }
        if self.max_repairs == 0 {
            return Err("max_repairs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            default_person: "Family".to_string(),
            untitled_event: "Unnamed Event".to_string(),
            max_repairs: MAX_REPAIRS,
        }
    }
}
