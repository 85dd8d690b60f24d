// ABOUTME: Application configuration loaded from ~/.panedeck/config.toml
// Missing files fall back to defaults; PANEDECK_CONFIG points at an alternative file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::layout::Preset;
use crate::tab::DEFAULT_HISTORY_DEPTH;

pub const CONFIG_ENV_VAR: &str = "PANEDECK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding saved layout records.
    pub layouts_dir: PathBuf,
    /// Directory for the log file.
    pub log_dir: PathBuf,
    /// `tracing` filter used when RUST_LOG is unset.
    pub log_filter: String,
    /// Undo depth per tab.
    pub history_depth: usize,
    /// Preset used for new tabs.
    pub default_preset: Preset,
    pub preview_width: u16,
    pub preview_height: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = base_dir();
        Self {
            layouts_dir: base.join("layouts"),
            log_dir: base.join("logs"),
            log_filter: "panedeck=info".to_string(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            default_preset: Preset::Single,
            preview_width: 80,
            preview_height: 24,
        }
    }
}

impl AppConfig {
    /// Load from `PANEDECK_CONFIG` or the default location.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

fn base_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".panedeck"))
        .unwrap_or_else(|| PathBuf::from(".panedeck"))
}

pub fn default_config_path() -> PathBuf {
    base_dir().join("config.toml")
}
