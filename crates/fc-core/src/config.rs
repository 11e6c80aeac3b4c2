//! Generation settings
//!
//! Read from a JSON file; command-line flags override individual fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::floorplans::PlanKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_attempts must be at least 1")]
    NoAttempts,
}

fn default_max_attempts() -> u32 {
    50
}

fn default_permute() -> bool {
    true
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub plan: PlanKind,
    /// Random if absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Randomly rotate and mirror finished floorplans
    #[serde(default = "default_permute")]
    pub permute: bool,
    /// Floorplans to generate, with consecutive seeds
    #[serde(default = "default_count")]
    pub count: u32,
}

impl GenerationConfig {
    pub fn new(plan: PlanKind) -> Self {
        Self {
            plan,
            seed: None,
            max_attempts: default_max_attempts(),
            permute: default_permute(),
            count: default_count(),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse_config(&contents)
    }

    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        if config.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(config)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(PlanKind::Apartment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = GenerationConfig::parse_config(r#"{"plan": "restaurant"}"#).unwrap();
        assert_eq!(config.plan, PlanKind::Restaurant);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_attempts, 50);
        assert!(config.permute);
        assert_eq!(config.count, 1);
    }

    #[test]
    fn test_full_config() {
        let config = GenerationConfig::parse_config(
            r#"{"plan": "apartment", "seed": 42, "max_attempts": 5, "permute": false, "count": 3}"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_attempts, 5);
        assert!(!config.permute);
        assert_eq!(config.count, 3);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            GenerationConfig::parse_config(r#"{"plan": "castle"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GenerationConfig::parse_config("{}"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GenerationConfig::parse_config(r#"{"plan": "apartment", "max_attempts": 0}"#),
            Err(ConfigError::NoAttempts)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = GenerationConfig::load_from_file(Path::new("/nonexistent/floorcarve.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/floorcarve.json"));
    }
}
