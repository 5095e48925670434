//! Configuration management for Tern.
//!
//! Handles loading configuration from TOML files, with display settings and
//! named repository definitions (data files plus declared namespaces).

use crate::error::{Result, TernError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure for Tern.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Result display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Named repository definitions.
    #[serde(default)]
    pub repositories: HashMap<String, RepositoryConfig>,
}

/// Result display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Total console width used for table layout.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Abbreviate IRIs to `prefix:localName` when a namespace matches.
    #[serde(default = "default_show_prefix")]
    pub show_prefix: bool,
}

fn default_width() -> usize {
    80
}

fn default_show_prefix() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            show_prefix: default_show_prefix(),
        }
    }
}

/// A named repository: the data files to load and the namespaces to declare.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepositoryConfig {
    /// RDF files loaded into the store at startup.
    #[serde(default)]
    pub data: Vec<PathBuf>,

    /// Declared namespaces, `prefix = "iri"`.
    #[serde(default)]
    pub namespaces: HashMap<String, String>,

    /// Load data with the lenient parser configuration.
    #[serde(default)]
    pub lenient: bool,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tern")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TernError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            TernError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named repository, or the default one if name is None.
    pub fn get_repository(&self, name: Option<&str>) -> Option<&RepositoryConfig> {
        let key = name.unwrap_or("default");
        self.repositories.get(key)
    }
}
