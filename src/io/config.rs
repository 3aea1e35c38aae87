use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::threat::{BonusTable, ThreatCatalog};

/// User-level settings that outlive any single encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// JSON array of threat definitions.
    pub catalog_path: Option<PathBuf>,

    /// Directory the file dialogs open in.
    pub last_directory: Option<PathBuf>,

    /// Bonus table for threats whose catalog entry has none. Empty by
    /// default: no thresholds are assumed.
    pub default_mob_bonus: BonusTable,
}

impl AppConfig {
    pub fn load_catalog(&self) -> Result<ThreatCatalog> {
        let path = self
            .catalog_path
            .as_ref()
            .context("no threat catalog configured")?;
        ThreatCatalog::from_json_file(path)
    }

    /// Record the directory holding `file`. Returns whether it changed.
    pub fn remember_directory(&mut self, file: &Path) -> bool {
        let Some(dir) = file.parent() else {
            return false;
        };
        if self.last_directory.as_deref() == Some(dir) {
            return false;
        }
        self.last_directory = Some(dir.to_path_buf());
        true
    }
}

pub fn config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("encounter_tracker");
    path.push("config.json");
    path
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

/// Missing or unreadable config falls back to defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => return AppConfig::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Unreadable config, using defaults");
            return AppConfig::default();
        }
    };
    serde_json::from_str(&json).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "Ignoring corrupt config");
        AppConfig::default()
    })
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
