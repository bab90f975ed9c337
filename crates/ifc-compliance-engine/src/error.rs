// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the rule engine

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Rule engine errors
///
/// Only `Config` on the configuration directory itself and
/// `UnknownCategory` abort a run; everything else is contained to one
/// configuration file or one rule.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing configuration
    #[error("Invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    /// Category name not recognized
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Rule failed while checking the model
    #[error("Rule {rule_id} failed: {message}")]
    Rule { rule_id: String, message: String },

    /// Model access error
    #[error("Model error: {0}")]
    Model(#[from] ifc_compliance_model::ModelError),

    /// Degenerate geometry
    #[error("Geometry error: {0}")]
    Geometry(#[from] ifc_compliance_geometry::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(path: impl AsRef<std::path::Path>, msg: impl Into<String>) -> Self {
        Error::Config {
            path: path.as_ref().display().to_string(),
            message: msg.into(),
        }
    }

    /// Create a rule execution error
    pub fn rule(rule_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Rule {
            rule_id: rule_id.into(),
            message: msg.into(),
        }
    }
}
