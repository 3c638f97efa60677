//! Model declarations and identifier validation
//!
//! Model and app names come from configuration files and end up naming
//! tables and database files, so both are checked against a restricted
//! character set before use.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{DouglasError, Result};

/// Table identifiers: lowercase letters, digits, underscores; no leading digit
static TABLE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("valid table name regex"));

/// App names double as file stems in the databases directory
static APP_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,127}$").expect("valid app name regex"));

/// A named record type declared by an app
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelSpec {
    pub name: String,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validated, lowercased table name backing this model
    pub fn table_name(&self) -> Result<String> {
        let table = self.name.trim().to_lowercase();
        if TABLE_NAME_REGEX.is_match(&table) {
            Ok(table)
        } else {
            Err(DouglasError::InvalidIdentifier(self.name.clone()))
        }
    }
}

/// Reject app names that could escape the databases directory
pub fn validate_app_name(app_name: &str) -> Result<()> {
    if APP_NAME_REGEX.is_match(app_name) {
        Ok(())
    } else {
        Err(DouglasError::InvalidIdentifier(app_name.to_string()))
    }
}

/// Source of model declarations for an app
pub trait ModelCatalog {
    /// Declared models, in declaration order
    fn models(&self, app_name: &str) -> Result<Vec<ModelSpec>>;
}

impl ModelCatalog for HashMap<String, Vec<ModelSpec>> {
    fn models(&self, app_name: &str) -> Result<Vec<ModelSpec>> {
        self.get(app_name)
            .cloned()
            .ok_or_else(|| DouglasError::AppNotFound(app_name.to_string()))
    }
}

/// Pick the model an operation targets.
///
/// Apps declaring several models need an explicit selector; guessing the
/// first one would silently write to the wrong table.
pub fn resolve_model(
    app_name: &str,
    models: &[ModelSpec],
    selector: Option<&str>,
) -> Result<ModelSpec> {
    if let Some(wanted) = selector {
        return models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| {
                DouglasError::Configuration(format!(
                    "App '{}' declares no model named '{}'",
                    app_name, wanted
                ))
            });
    }

    match models {
        [] => Err(DouglasError::NoDatabase(app_name.to_string())),
        [only] => Ok(only.clone()),
        many => Err(DouglasError::Configuration(format!(
            "App '{}' declares {} models ({}); choose one with --model",
            app_name,
            many.len(),
            many.iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_lowercases() {
        assert_eq!(ModelSpec::new("Meals").table_name().unwrap(), "meals");
        assert_eq!(ModelSpec::new("_log_2").table_name().unwrap(), "_log_2");
    }

    #[test]
    fn test_table_name_rejects_unsafe_identifiers() {
        for bad in [
            "",
            "1meals",
            "meals; DROP TABLE x",
            "meals\"",
            "my-meals",
            "méals",
        ] {
            assert!(
                matches!(
                    ModelSpec::new(bad).table_name(),
                    Err(DouglasError::InvalidIdentifier(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_app_name() {
        assert!(validate_app_name("food-logger").is_ok());
        assert!(validate_app_name("notes_2").is_ok());
        assert!(validate_app_name("../etc").is_err());
        assert!(validate_app_name("a/b").is_err());
        assert!(validate_app_name("").is_err());
    }

    #[test]
    fn test_resolve_single_model() {
        let models = vec![ModelSpec::new("meals")];
        assert_eq!(
            resolve_model("food", &models, None).unwrap(),
            ModelSpec::new("meals")
        );
    }

    #[test]
    fn test_resolve_without_models_is_configuration_error() {
        let err = resolve_model("food", &[], None).unwrap_err();
        assert!(matches!(err, DouglasError::NoDatabase(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_multiple_models_requires_selector() {
        let models = vec![ModelSpec::new("meals"), ModelSpec::new("snacks")];

        let err = resolve_model("food", &models, None).unwrap_err();
        assert!(err.to_string().contains("--model"));
        assert!(err.is_configuration());

        assert_eq!(
            resolve_model("food", &models, Some("Snacks")).unwrap(),
            ModelSpec::new("snacks")
        );
        assert!(resolve_model("food", &models, Some("drinks")).is_err());
    }

    #[test]
    fn test_hashmap_catalog_unknown_app() {
        let catalog: HashMap<String, Vec<ModelSpec>> = HashMap::new();
        assert!(matches!(
            catalog.models("ghost"),
            Err(DouglasError::AppNotFound(_))
        ));
    }
}
