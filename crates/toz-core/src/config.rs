#![forbid(unsafe_code)]

//! Policy-as-data configuration for the calculator.
//!
//! Captures both breakdown profiles and the session reconciliation policy as
//! a single [`TozConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # tozcalc.toml
//! [alt]
//! weights = { first = 0.50, second = 0.39, third = 0.06, fourth = 0.05 }
//! unit_total = 121.0
//!
//! [session]
//! cross_refresh = "parity"
//! ```
//!
//! ```rust,ignore
//! let config = TozConfig::from_toml_file("tozcalc.toml")?;
//! let config = TozConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every omitted table falls back to the built-in constants, so
//! `TozConfig::default()` reproduces the fixed Alt/Üst profiles. A table that
//! is present must be complete.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::weights::{TozKind, TozProfile};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// How an edit to one breakdown affects the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossRefresh {
    /// Forward-recompute the other breakdown from the new unit count.
    #[default]
    Propagate,
    /// Leave the other breakdown untouched until the count itself is edited.
    Parity,
}

/// Session reconciliation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Unit count at startup and after a reset.
    pub initial_unit_count: f64,
    /// Floor applied to every stored unit count.
    pub min_unit_count: f64,
    pub cross_refresh: CrossRefresh,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            initial_unit_count: 1.0,
            min_unit_count: 1.0,
            cross_refresh: CrossRefresh::default(),
        }
    }
}

/// Top-level calculator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TozConfig {
    pub alt: TozProfile,
    pub ust: TozProfile,
    pub session: SessionPolicy,
}

impl Default for TozConfig {
    fn default() -> Self {
        Self {
            alt: TozKind::Alt.default_profile(),
            ust: TozKind::Ust.default_profile(),
            session: SessionPolicy::default(),
        }
    }
}

impl TozConfig {
    #[must_use]
    pub fn profile(&self, kind: TozKind) -> &TozProfile {
        match kind {
            TozKind::Alt => &self.alt,
            TozKind::Ust => &self.ust,
        }
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// [`from_path`](Self::from_path) followed by [`validate`](Self::validate).
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_path(path)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for kind in TozKind::ALL {
            let profile = self.profile(kind);
            let weights = profile.weights.as_array();
            for (name, weight) in ["first", "second", "third", "fourth"].iter().zip(weights) {
                if !weight.is_finite() || weight < 0.0 {
                    errors.push(format!(
                        "{kind}.weights.{name} must be finite and >= 0, got {weight}"
                    ));
                }
            }

            let sum = profile.weights.sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                errors.push(format!("{kind}.weights must sum to 1.0, got {sum}"));
            }

            if !profile.unit_total.is_finite() || profile.unit_total < 0.0 {
                errors.push(format!(
                    "{kind}.unit_total must be finite and >= 0, got {}",
                    profile.unit_total
                ));
            }
            if profile.unit_total > 0.0 && !profile.unit_total.is_normal() {
                errors.push(format!(
                    "{kind}.unit_total must be 0 or a normal positive number, got {:e}",
                    profile.unit_total
                ));
            }
        }

        let session = &self.session;
        if !session.min_unit_count.is_finite() || session.min_unit_count < 0.0 {
            errors.push(format!(
                "session.min_unit_count must be finite and >= 0, got {}",
                session.min_unit_count
            ));
        }
        if !session.initial_unit_count.is_finite()
            || session.initial_unit_count < session.min_unit_count
        {
            errors.push(format!(
                "session.initial_unit_count must be finite and >= min_unit_count, got {}",
                session.initial_unit_count
            ));
        }

        errors
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors from loading a [`TozConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format for {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
