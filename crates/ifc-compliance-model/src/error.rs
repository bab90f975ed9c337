// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model loading and access

use crate::EntityId;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while loading or querying a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Content is not a valid model document
    #[error("Invalid model format: {0}")]
    InvalidFormat(String),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Two elements share the same id
    #[error("Duplicate entity {0}")]
    DuplicateEntity(EntityId),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        ModelError::InvalidFormat(msg.into())
    }
}
