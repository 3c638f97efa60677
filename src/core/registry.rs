//! App declarations
//!
//! Apps are TOML files in the apps directory, one per app, named
//! `<app>.toml`. Only the parts the record store and browser need are read;
//! other tables (actions, llm, ...) are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DouglasError, Result};
use crate::store::{DisplayFields, ModelCatalog, ModelSpec};

/// One app declaration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Human-friendly name (defaults to the file stem)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Present only for apps that persist records
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// How entries are named in listings
    #[serde(default)]
    pub display: DisplayFields,
}

/// `[database]` table of an app
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

impl AppConfig {
    /// Declared models, empty when the app has no database
    pub fn models(&self) -> &[ModelSpec] {
        self.database
            .as_ref()
            .map(|db| db.models.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_database(&self) -> bool {
        !self.models().is_empty()
    }
}

/// Loads app declarations from a directory
#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps_dir: PathBuf,
}

impl AppRegistry {
    pub fn new(apps_dir: impl Into<PathBuf>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
        }
    }

    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    /// Names of all declared apps, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.apps_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for dir_entry in fs::read_dir(&self.apps_dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load and parse one app
    pub fn load(&self, app_name: &str) -> Result<AppConfig> {
        crate::store::model::validate_app_name(app_name)?;

        let path = self.apps_dir.join(format!("{}.toml", app_name));
        if !path.exists() {
            return Err(DouglasError::AppNotFound(app_name.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load an app that must have a database
    pub fn load_with_database(&self, app_name: &str) -> Result<AppConfig> {
        let config = self.load(app_name)?;
        if !config.has_database() {
            return Err(DouglasError::NoDatabase(app_name.to_string()));
        }
        Ok(config)
    }
}

impl ModelCatalog for AppRegistry {
    fn models(&self, app_name: &str) -> Result<Vec<ModelSpec>> {
        Ok(self.load(app_name)?.models().to_vec())
    }
}
