//! Scan iterator configuration
//!
//! Settings reach an iterator in one of two ways:
//! - as string options attached to a table scan ([`ScanConfig::from_options`])
//! - from a TOML file or string ([`ScanConfig::from_file`])
//!
//! Unknown option keys are ignored so newer writers can attach settings that
//! older iterators do not understand.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use txscan_core::{Error, Result};

/// Option key for [`ScanConfig::max_nexts_before_seek`]
pub const MAX_NEXTS_OPTION: &str = "max_nexts_before_seek";

const DEFAULT_MAX_NEXTS: usize = 10;

/// Tuning for skipping iterators
///
/// # Example
///
/// ```toml
/// # Records stepped over with `next` before a skip falls back to a seek.
/// # 0 = always seek.
/// max_nexts_before_seek = 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// `next` calls a skip may spend before issuing a positional seek
    #[serde(default = "default_max_nexts")]
    pub max_nexts_before_seek: usize,
}

fn default_max_nexts() -> usize {
    DEFAULT_MAX_NEXTS
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_nexts_before_seek: default_max_nexts(),
        }
    }
}

impl ScanConfig {
    /// Config whose skips always seek immediately
    pub fn always_seek() -> Self {
        Self {
            max_nexts_before_seek: 0,
        }
    }

    /// Parse iterator options
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a known option has an unparsable
    /// value.
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = options.get(MAX_NEXTS_OPTION) {
            config.max_nexts_before_seek = raw.trim().parse().map_err(|e| {
                Error::InvalidConfig(format!(
                    "Invalid value '{}' for option '{}': {}",
                    raw, MAX_NEXTS_OPTION, e
                ))
            })?;
        }
        Ok(config)
    }

    /// Render as iterator options
    pub fn to_options(&self) -> HashMap<String, String> {
        HashMap::from([(
            MAX_NEXTS_OPTION.to_string(),
            self.max_nexts_before_seek.to_string(),
        )])
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Scan iterator configuration
#
# Records a skip steps over with `next` before it falls back to a positional
# seek. Small values favour sparse metadata, large values dense metadata.
# 0 = always seek.
max_nexts_before_seek = 10
"#
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the text is not valid TOML for
    /// this config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse scan config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::InvalidConfig(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize scan config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
