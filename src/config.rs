//! Persisted user settings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "e2e-catalog";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Root of the checked-out e2e test repository.
    pub base_path: String,
    pub e2e_pwd: String,
    pub e2e_url: String,
    /// Editor command used to open feature files.
    pub code_editor: String,
    pub backoffice_api_key: String,
    pub theme: Theme,
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read settings file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse settings file")?;

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).context("Failed to write settings file")?;

        Ok(())
    }
}

/// Settings loaded once from disk and served from memory afterwards.
pub struct SettingsStore {
    path: PathBuf,
    cached: RwLock<Option<Settings>>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cached: RwLock::new(None),
        }
    }

    /// Store backed by `<config dir>/e2e-catalog/settings.json`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings from disk unless already cached. An unreadable file is
    /// logged and replaced by defaults.
    pub fn init(&self) -> Settings {
        if let Some(settings) = self.cached.read().clone() {
            return settings;
        }

        let settings = match Settings::load_from(&self.path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Settings::default()
            }
        };
        *self.cached.write() = Some(settings.clone());
        settings
    }

    pub fn get(&self) -> Settings {
        self.init()
    }

    /// Persist `settings`, then make them the cached values.
    pub fn update(&self, settings: Settings) -> Result<()> {
        settings.save_to(&self.path)?;
        *self.cached.write() = Some(settings);
        Ok(())
    }
}

fn default_settings_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(SETTINGS_FILE);
    Ok(path)
}
