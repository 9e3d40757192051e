//! Settings persistence.

use anyhow::{Context, Result};
use shared::settings::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the stored Gemini key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.local", "Vibe Code", "VibeCode")
        .map(|proj| proj.config_dir().join("settings.json"))
}

/// Settings from the default location, or defaults when missing or unreadable.
pub fn load_settings_or_default() -> AppSettings {
    let mut settings = match config_path() {
        Some(path) => load_settings_from(&path),
        None => AppSettings::default(),
    };
    apply_env_override(&mut settings, std::env::var(API_KEY_ENV).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }
    match fs::read(path)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| Ok(serde_json::from_slice::<AppSettings>(&bytes)?))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file");
            AppSettings::default()
        }
    }
}

pub fn save_settings(settings: &AppSettings) -> Result<()> {
    let path = config_path().context("no config directory on this platform")?;
    save_settings_to(&path, settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved settings");
    Ok(())
}

/// A non-empty env key wins over the stored one.
pub fn apply_env_override(settings: &mut AppSettings, env_key: Option<String>) {
    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        settings.model.gemini_auth.api_key = Some(key.trim().to_string());
    }
}
