use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Credentials for the OpenWeather forecast API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenWeatherConfig {
    pub api_key: String,
}

/// Credentials for the GeoNames search API (random locations).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoNamesConfig {
    pub username: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_location = "Cluj-Napoca"
///
/// [openweather]
/// api_key = "..."
///
/// [geonames]
/// username = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Location used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<OpenWeatherConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geonames: Option<GeoNamesConfig>,
}

impl Config {
    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
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

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "willitrain", "willitrain")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_openweather_api_key(&mut self, api_key: String) {
        self.openweather = Some(OpenWeatherConfig { api_key });
    }

    pub fn set_geonames_username(&mut self, username: String) {
        self.geonames = Some(GeoNamesConfig { username });
    }

    /// Returns the OpenWeather API key, if present and non-empty.
    pub fn openweather_api_key(&self) -> Option<&str> {
        self.openweather.as_ref().map(|c| c.api_key.as_str()).filter(|k| !k.is_empty())
    }

    pub fn geonames_username(&self) -> Option<&str> {
        self.geonames.as_ref().map(|c| c.username.as_str()).filter(|u| !u.is_empty())
    }

    pub fn default_location(&self) -> Option<&str> {
        self.default_location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_credentials() {
        let cfg = Config::default();

        assert_eq!(cfg.openweather_api_key(), None);
        assert_eq!(cfg.geonames_username(), None);
        assert_eq!(cfg.default_location(), None);
    }

    #[test]
    fn parses_full_toml() {
        let cfg: Config = toml::from_str(
            r#"
            default_location = "London,GB"

            [openweather]
            api_key = "OPEN_KEY"

            [geonames]
            username = "demo"
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.openweather_api_key(), Some("OPEN_KEY"));
        assert_eq!(cfg.geonames_username(), Some("demo"));
        assert_eq!(cfg.default_location(), Some("London,GB"));
    }

    #[test]
    fn geonames_section_is_optional() {
        let cfg: Config = toml::from_str("[openweather]\napi_key = \"K\"\n").unwrap();

        assert_eq!(cfg.openweather_api_key(), Some("K"));
        assert!(cfg.geonames.is_none());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut cfg = Config::default();
        cfg.set_openweather_api_key(String::new());
        cfg.set_geonames_username(String::new());
        cfg.default_location = Some("   ".into());

        assert_eq!(cfg.openweather_api_key(), None);
        assert_eq!(cfg.geonames_username(), None);
        assert_eq!(cfg.default_location(), None);
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = std::env::temp_dir().join(format!("willitrain-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_openweather_api_key("OPEN_KEY".into());
        cfg.default_location = Some("Cluj-Napoca".into());
        cfg.save_to(&path).expect("save should succeed");

        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_loads_default() {
        let path = std::env::temp_dir().join("willitrain-does-not-exist").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = std::env::temp_dir().join(format!("willitrain-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "openweather = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        let _ = fs::remove_dir_all(&dir);
    }
}
