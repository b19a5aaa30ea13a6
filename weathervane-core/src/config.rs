use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::ClientMode,
    location::{Coordinates, GeolocationMode},
    model::Language,
    theme::Theme,
};

/// Environment variable that overrides the stored OpenWeather key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// client = "direct"
/// api_key = "..."
/// language = "tr"
/// theme = "dark"
/// geolocation = "off"
///
/// [position]
/// lat = 39.93
/// lon = 32.86
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub client: ClientMode,

    /// OpenWeather key, used in direct mode.
    pub api_key: Option<String>,

    /// Proxy endpoint, used in proxy mode.
    pub proxy_url: Option<String>,

    /// Alternative OpenWeather base URL (mirrors, tests).
    pub api_base_url: Option<String>,

    pub language: Language,
    pub theme: Theme,
    pub geolocation: GeolocationMode,

    /// Fixed position; takes precedence over `geolocation`.
    pub position: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathervane", "weathervane")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, else the stored one.
    pub fn resolved_api_key(&self) -> Option<String> {
        pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    /// Convenience helper: switch to direct mode with the given key.
    pub fn use_direct(&mut self, api_key: String) {
        self.client = ClientMode::Direct;
        self.api_key = Some(api_key);
    }

    /// Convenience helper: switch to proxy mode with the given endpoint.
    pub fn use_proxy(&mut self, proxy_url: String) {
        self.client = ClientMode::Proxy;
        self.proxy_url = Some(proxy_url);
    }
}

fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_direct_english_light() {
        let cfg = Config::default();
        assert_eq!(cfg.client, ClientMode::Direct);
        assert_eq!(cfg.language, Language::En);
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.geolocation, GeolocationMode::Ip);
    }

    #[test]
    fn env_key_overrides_stored_key() {
        assert_eq!(pick_api_key(Some("ENV".into()), Some("FILE")), Some("ENV".into()));
        assert_eq!(pick_api_key(None, Some("FILE")), Some("FILE".into()));
        assert_eq!(pick_api_key(Some("  ".into()), Some("FILE")), Some("FILE".into()));
        assert_eq!(pick_api_key(None, Some("")), None);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("language = \"tr\"\n").unwrap();
        assert_eq!(cfg.language, Language::Tr);
        assert_eq!(cfg.client, ClientMode::Direct);
        assert!(cfg.position.is_none());
    }

    #[test]
    fn switching_modes_keeps_other_credential() {
        let mut cfg = Config::default();

        cfg.use_direct("KEY".into());
        cfg.use_proxy("https://example.org/api".into());

        assert_eq!(cfg.client, ClientMode::Proxy);
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.proxy_url.as_deref(), Some("https://example.org/api"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            language: Language::Tr,
            theme: Theme::Dark,
            geolocation: GeolocationMode::Off,
            position: Some(Coordinates { lat: 39.93, lon: 32.86 }),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "language = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
