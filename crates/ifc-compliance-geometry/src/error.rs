// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry operations

use thiserror::Error;

/// Geometry result type
pub type Result<T> = std::result::Result<T, Error>;

/// Degenerate input to a geometry function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Not enough vertices for the operation
    #[error("Need at least {required} vertices, got {actual}")]
    TooFewVertices { required: usize, actual: usize },

    /// No input points at all
    #[error("Empty point set")]
    Empty,

    /// Input contains NaN or infinite coordinates, or collapses otherwise
    #[error("Degenerate geometry: {0}")]
    Degenerate(String),
}

impl Error {
    /// Create a degenerate-geometry error
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::Degenerate(msg.into())
    }
}
