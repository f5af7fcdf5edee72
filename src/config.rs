// SPDX-License-Identifier: MIT
//! Environment-driven settings

use std::path::PathBuf;

/// Boundary catalog replacing the embedded one
pub const CONSTELLATIONS_PATH_VAR: &str = "WWT_CONSTELLATIONS_PATH";

/// Timeout for remote document fetches
pub const FETCH_TIMEOUT_VAR: &str = "WWT_FETCH_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub constellations_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            constellations_path: None,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unparseable values fall back
    /// to their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            constellations_path: lookup(CONSTELLATIONS_PATH_VAR)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            fetch_timeout_secs: lookup(FETCH_TIMEOUT_VAR)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=600).contains(&self.fetch_timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "{FETCH_TIMEOUT_VAR} must be between 1 and 600 seconds"
            )));
        }

        if let Some(path) = &self.constellations_path {
            if !path.is_file() {
                return Err(ConfigError::Invalid(format!(
                    "{CONSTELLATIONS_PATH_VAR} does not name a file: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}
