//! Backend configuration.
//!
//! Loaded from TOML, for example:
//!
//! ```toml
//! debug_mode = "write"
//! required_modules = ["cat", "km", "qsl"]
//! ```

use crate::error::{BackendError, BackendResult};
use flow_hw_types::Subsystem;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Debug tracing of cache writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    /// No tracing.
    #[default]
    None,
    /// Trace every cache write and every flushed range.
    Write,
}

/// Configuration applied when the backend attaches to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Debug tracing mode, forwarded to the device as well.
    #[serde(default)]
    pub debug_mode: DebugMode,

    /// Subsystems whose absence fails the attach. Subsystems not listed are
    /// skipped when the device does not implement them.
    #[serde(default = "default_required_modules")]
    pub required_modules: Vec<Subsystem>,
}

fn default_required_modules() -> Vec<Subsystem> {
    Subsystem::ALL.to_vec()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            debug_mode: DebugMode::default(),
            required_modules: default_required_modules(),
        }
    }
}

impl BackendConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> BackendResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BackendError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> BackendResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|e| {
                BackendError::config(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Backend config {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(BackendError::config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> BackendResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| BackendError::config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            BackendError::config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BackendResult<()> {
        let mut seen = BTreeSet::new();
        for subsystem in &self.required_modules {
            if !seen.insert(subsystem) {
                return Err(BackendError::config(format!(
                    "{} listed twice in required_modules",
                    subsystem
                )));
            }
        }
        Ok(())
    }

    /// Returns true if the subsystem must be present on the device.
    pub fn is_required(&self, subsystem: Subsystem) -> bool {
        self.required_modules.contains(&subsystem)
    }
}
