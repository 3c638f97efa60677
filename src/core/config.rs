//! Application settings management
//!
//! Handles loading settings including:
//! - Data directory (where per-app databases live)
//! - Apps directory (where app declarations live)
//! - Quiet output

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{DouglasError, Result};

/// Settings file contents
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Override for the per-user data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Override for the apps directory
    #[serde(default)]
    pub apps_dir: Option<PathBuf>,

    /// Suppress informational output
    #[serde(default)]
    pub quiet: bool,
}

impl Config {
    /// Load configuration from file, or default if there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            // No home directory: nothing to load
            Err(_) => Ok(Config::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "douglas", "douglas")
        .ok_or_else(|| DouglasError::Configuration("Could not determine home directory".into()))
}

/// Resolved settings handed explicitly to every entry point
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Root of per-user data (databases live in `<data_dir>/databases`)
    pub data_dir: PathBuf,
    /// Directory holding `<app>.toml` declarations
    pub apps_dir: PathBuf,
    /// Suppress informational output
    pub quiet: bool,
}

/// Values given on the command line (or via env vars), highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub apps_dir: Option<PathBuf>,
    pub quiet: bool,
}

impl Settings {
    /// Resolve settings: overrides, then config file, then defaults
    pub fn resolve(overrides: Overrides, config: Config) -> Result<Self> {
        let data_dir = match overrides.data_dir.or(config.data_dir) {
            Some(dir) => dir,
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        let apps_dir = overrides
            .apps_dir
            .or(config.apps_dir)
            .unwrap_or_else(|| PathBuf::from("apps"));

        Ok(Self {
            data_dir,
            apps_dir,
            quiet: overrides.quiet || config.quiet,
        })
    }

    /// Directory holding one `<app>.db` per app
    pub fn databases_dir(&self) -> PathBuf {
        self.data_dir.join("databases")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert!(config.apps_dir.is_none());
        assert!(!config.quiet);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"/tmp/douglas\"\nquiet = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/douglas")));
        assert!(config.quiet);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            apps_dir: Some(PathBuf::from("/apps/config")),
            quiet: false,
        };
        let overrides = Overrides {
            data_dir: Some(PathBuf::from("/from/flag")),
            apps_dir: None,
            quiet: true,
        };

        let settings = Settings::resolve(overrides, config).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(settings.apps_dir, PathBuf::from("/apps/config"));
        assert!(settings.quiet);
        assert_eq!(
            settings.databases_dir(),
            PathBuf::from("/from/flag/databases")
        );
    }
}
