//! Serializable pipeline configuration.
//!
//! ```toml
//! default_features = ["MA50", "SHOW_RETURNS"]
//!
//! [source]
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults.

use pricelens_core::{FeatureSet, SourceConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pipeline configuration: where to fetch from and which overlays to compute
/// when a request does not say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Remote data source.
    pub source: SourceConfig,

    /// Feature toggles applied by [`crate::Pipeline::request`].
    pub default_features: Vec<String>,
}

impl PipelineConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url must not be empty".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(unknown) = self
            .default_features
            .iter()
            .find(|f| FeatureSet::from_toggle(f).is_none())
        {
            return Err(ConfigError::Invalid(format!(
                "unknown feature '{unknown}' in default_features"
            )));
        }
        Ok(())
    }

    /// Default feature toggles as a flag set.
    pub fn default_feature_set(&self) -> FeatureSet {
        FeatureSet::from_toggles(&self.default_features)
    }
}
