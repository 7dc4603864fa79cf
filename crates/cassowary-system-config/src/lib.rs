//! Configuration for cassowary-system.
//!
//! Load build options and whole specifications from TOML or YAML so that
//! layouts can change without recompiling.
//!
//! # Examples
//!
//! Load options from a TOML string:
//!
//! ```
//! use cassowary_system_config::SystemConfig;
//! use cassowary_system_core::Strength;
//!
//! let config = SystemConfig::from_toml_str(r#"
//!     edit_strength = "medium"
//!     change_tolerance = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.edit_strength, Strength::Medium);
//! assert!(config.register_rules);
//! ```
//!
//! Parse a specification document:
//!
//! ```
//! use cassowary_system_config::SpecDocument;
//!
//! let doc = SpecDocument::from_toml_str(r#"
//!     rules = [["right", "<=", 400, "required"]]
//!
//!     [quantities]
//!     left = 20
//!     width = { value = 200 }
//!
//!     [formulas]
//!     right = ["left", "+", "width"]
//! "#).unwrap();
//!
//! let spec = doc.into_specification();
//! assert_eq!(spec.quantities.len(), 2);
//! assert_eq!(spec.rules[0].len(), 4);
//! ```


use std::collections::BTreeMap;
use std::path::Path;

use cassowary_system_core::{RawTerm, Specification, Strength};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Options applied when a system is built.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SystemConfig {
    /// Strength at which quantities are registered as adjustable.
    pub edit_strength: Strength,

    /// Submit compiled rules to the solver.
    pub register_rules: bool,

    /// Absolute difference above which a resolved value counts as changed.
    pub change_tolerance: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            edit_strength: Strength::Strong,
            register_rules: true,
            change_tolerance: 0.0,
        }
    }
}

impl SystemConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the strength used for adjustable quantities.
    pub fn with_edit_strength(mut self, strength: Strength) -> Self {
        self.edit_strength = strength;
        self
    }

    /// Controls whether compiled rules are submitted to the solver.
    pub fn with_register_rules(mut self, register: bool) -> Self {
        self.register_rules = register;
        self
    }

    /// Sets the change-detection tolerance.
    pub fn with_change_tolerance(mut self, tolerance: f64) -> Self {
        self.change_tolerance = tolerance;
        self
    }

    /// Checks that the options can be honored by a solver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edit_strength.is_required() {
            return Err(ConfigError::Invalid(
                "edit_strength cannot be 'required'".to_string(),
            ));
        }
        if !self.change_tolerance.is_finite() || self.change_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "change_tolerance must be a non-negative number, got {}",
                self.change_tolerance
            )));
        }
        Ok(())
    }
}

/// A quantity entry in a specification document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QuantityDoc {
    Number(f64),
    Descriptor { value: f64 },
}

/// A formula or rule element in a specification document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TermDoc {
    Number(f64),
    Text(String),
    List(Vec<TermDoc>),
}

impl TermDoc {
    fn into_raw(self) -> RawTerm {
        match self {
            TermDoc::Number(n) => RawTerm::Number(n),
            TermDoc::Text(s) => RawTerm::from(s),
            TermDoc::List(items) => {
                RawTerm::Formula(items.into_iter().map(TermDoc::into_raw).collect())
            }
        }
    }
}

/// Serialized form of a specification.
///
/// Producer functions have no document form; attach them to the converted
/// [`Specification`] with [`Specification::producer`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SpecDocument {
    pub quantities: BTreeMap<String, QuantityDoc>,
    pub formulas: BTreeMap<String, TermDoc>,
    pub rules: Vec<Vec<TermDoc>>,
}

impl SpecDocument {
    /// Loads a document from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a document from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a document from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a document from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Converts the document into raw specification terms.
    pub fn into_specification(self) -> Specification {
        let mut spec = Specification::new();
        for (name, quantity) in self.quantities {
            spec = match quantity {
                QuantityDoc::Number(n) => spec.quantity(name, n),
                QuantityDoc::Descriptor { value } => spec.descriptor(name, value),
            };
        }
        for (name, formula) in self.formulas {
            spec = spec.formula(name, formula.into_raw());
        }
        spec.rules = self
            .rules
            .into_iter()
            .map(|tuple| tuple.into_iter().map(TermDoc::into_raw).collect())
            .collect();
        spec
    }
}
