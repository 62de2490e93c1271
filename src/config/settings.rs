use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provider::Offsets;
use crate::provider::aladhan::DEFAULT_BASE_URL;

fn default_city() -> String {
    "Auckland".to_string()
}
fn default_country() -> String {
    "NewZealand".to_string()
}
fn default_method() -> u8 {
    // Muslim World League
    3
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_program() -> String {
    "omxplayer".to_string()
}
fn default_args() -> Vec<String> {
    ["-o", "local", "--vol", "1000"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_fajr_file() -> PathBuf {
    PathBuf::from("mp3/adhan-fajr.mp3")
}
fn default_file() -> PathBuf {
    PathBuf::from("mp3/adhan-turkish.mp3")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    /// AlAdhan calculation method id
    #[serde(default = "default_method")]
    pub method: u8,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
            method: default_method(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackBackend {
    /// Print the prayer name
    #[default]
    Stdout,
    /// Run an external audio player
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub backend: PlaybackBackend,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_fajr_file")]
    pub fajr_file: PathBuf,
    #[serde(default = "default_file")]
    pub default_file: PathBuf,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            backend: PlaybackBackend::default(),
            program: default_program(),
            args: default_args(),
            fajr_file: default_fajr_file(),
            default_file: default_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub offsets: Offsets,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "prayeralarm")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Serializing config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.location.city, "Auckland");
        assert_eq!(config.location.method, 3);
        assert_eq!(config.offsets, Offsets::default());
        assert_eq!(config.playback.backend, PlaybackBackend::Stdout);
        assert_eq!(config.provider.base_url, "http://api.aladhan.com");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[location]
city = "London"
country = "UK"

[offsets]
fajr = 2
isha = -3

[playback]
backend = "command"
program = "mpv"
args = ["--no-video"]
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.city, "London");
        assert_eq!(config.location.method, 3);
        assert_eq!(config.offsets.fajr, 2);
        assert_eq!(config.offsets.dhuhr, 0);
        assert_eq!(config.offsets.isha, -3);
        assert_eq!(config.playback.backend, PlaybackBackend::Command);
        assert_eq!(config.playback.program, "mpv");
        assert_eq!(config.playback.fajr_file, PathBuf::from("mp3/adhan-fajr.mp3"));
        assert_eq!(config.provider.timeout_secs, 20);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.location.city = "Perth".into();
        config.offsets.maghrib = 5;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.location.city, "Perth");
        assert_eq!(loaded.offsets.maghrib, 5);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[location\ncity = ").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
