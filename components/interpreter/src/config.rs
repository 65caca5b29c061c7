//! Runtime configuration.
//!
//! A [`RuntimeConfig`] selects which bundled profiles are loaded, the naming
//! convention that turns a stored variable into a ghost, and the limits that
//! keep prototype walks and nested calls bounded. It deserializes from JSON
//! with every field optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::ProfileSpec;

/// Configuration and profile-loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration or a profile document is not valid JSON for its schema
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A profile was requested by name but is not bundled
    #[error("unknown bundled profile '{0}'")]
    UnknownProfile(String),

    /// A profile parsed but is internally inconsistent
    #[error("invalid profile '{name}': {message}")]
    InvalidProfile {
        /// Profile name
        name: String,
        /// What was wrong
        message: String,
    },
}

/// Runtime-wide settings.
///
/// # Examples
///
/// ```
/// use interpreter::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json_str(r#"{"profiles": ["lua", "js"]}"#).unwrap();
/// assert_eq!(config.profiles, vec!["lua".to_string(), "js".to_string()]);
/// assert_eq!(config.ghost_prefix.as_deref(), Some("ghost_"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Bundled profiles to load at startup
    pub profiles: Vec<String>,
    /// Variables whose name starts with this prefix become ghosts when first
    /// set; `None` disables the convention
    pub ghost_prefix: Option<String>,
    /// Maximum number of prototype links followed by a property lookup
    pub max_prototype_depth: usize,
    /// Maximum nesting of logic, native and metamethod invocations.
    ///
    /// Each logic level costs several evaluator frames on the native stack;
    /// the default stays within a 2 MB thread stack in unoptimized builds.
    pub max_call_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            profiles: ProfileSpec::BUNDLED.iter().map(|s| s.to_string()).collect(),
            ghost_prefix: Some("ghost_".to_string()),
            max_prototype_depth: 64,
            max_call_depth: 64,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether `name` follows the ghost naming convention
    pub fn is_ghost_name(&self, name: &str) -> bool {
        match &self.ghost_prefix {
            Some(prefix) if !prefix.is_empty() => name.starts_with(prefix.as_str()),
            _ => false,
        }
    }
}
