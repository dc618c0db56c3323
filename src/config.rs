use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data_loader::DEFAULT_DELIMITER;

/// Runtime settings, read from YAML and overridden by command-line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub delimiter: char,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("character-deaths.csv"),
            delimiter: DEFAULT_DELIMITER as char,
            port: 5000,
            cors_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The delimiter as a single byte, as the csv reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }

    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        delimiter: Option<char>,
        port: Option<u16>,
        cors_origin: Option<String>,
    ) -> Self {
        if let Some(data_path) = data_path {
            self.data_path = data_path;
        }
        if let Some(delimiter) = delimiter {
            self.delimiter = delimiter;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if cors_origin.is_some() {
            self.cors_origin = cors_origin;
        }
        self
    }
}
