// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for model access
//!
//! These traits define the main abstractions a compliance run reads through.

use crate::{EntityResolver, GeometrySource, ModelMetadata, PropertyReader, Result, SpatialQuery};
use std::path::Path;
use std::sync::Arc;

/// Loading interface - entry point for obtaining a model
///
/// # Example
///
/// ```ignore
/// use ifc_compliance_model::{ModelLoader, SnapshotLoader};
///
/// let model = SnapshotLoader.load_path(Path::new("model.json"))?;
/// println!("Schema: {}", model.metadata().schema_version);
/// ```
pub trait ModelLoader: Send + Sync {
    /// Load a model from its textual content
    fn load(&self, content: &str) -> Result<Arc<dyn IfcModel>>;

    /// Load a model from a file path
    fn load_path(&self, path: &Path) -> Result<Arc<dyn IfcModel>> {
        let content = std::fs::read_to_string(path)?;
        self.load(&content)
    }
}

/// Core model interface - read-only access to a loaded model
///
/// The model is thread-safe (`Send + Sync`) and never mutated by readers, so
/// one instance is shared by every rule of a run.
pub trait IfcModel: Send + Sync {
    /// Get entity resolver for entity lookups
    fn resolver(&self) -> &dyn EntityResolver;

    /// Get property reader for accessing property sets and quantities
    fn properties(&self) -> &dyn PropertyReader;

    /// Get spatial query interface for containment and space boundaries
    fn spatial(&self) -> &dyn SpatialQuery;

    /// Get geometry source for element shapes
    fn geometry(&self) -> &dyn GeometrySource;

    /// Get unit scale factor (file units to meters)
    ///
    /// This value is declared by the model, never inferred from coordinates.
    /// Common values:
    /// - 1.0 for meters
    /// - 0.001 for millimeters
    /// - 0.3048 for feet
    fn unit_scale(&self) -> f64;

    /// Get file metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;
}
