use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Default tracing filter when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Capability names excluded from the default registration table.
    #[serde(default)]
    pub disabled_capabilities: Vec<String>,
    /// Directory handed to capabilities that write artifacts.
    #[serde(default)]
    pub output_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            disabled_capabilities: Vec::new(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".toolrig")
            .join("config.json")
    }

    /// Load from `path`, or the default location when `path` is `None`.
    /// A missing file yields the defaults; a present but invalid file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
