// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Compliance Model - Model access traits and shared types
//!
//! This crate describes the read-only capability a compliance run needs from a
//! building model. Parsing native IFC files is left to whichever backend
//! implements these traits; the crate ships a JSON snapshot backend
//! ([`SnapshotModel`]) holding pre-resolved elements, properties and geometry.
//!
//! # Architecture
//!
//! - [`ModelLoader`] - Entry point for loading a model from content or a path
//! - [`IfcModel`] - Read-only access to a loaded model
//! - [`EntityResolver`] - Entity lookup by id and type
//! - [`PropertyReader`] - Access to property sets and quantities
//! - [`SpatialQuery`] - Storey containment, space boundaries and search
//! - [`GeometrySource`] - Per-element vertices in file units
//!
//! # Example
//!
//! ```ignore
//! use ifc_compliance_model::{IfcType, ModelLoader, SnapshotLoader};
//!
//! let model = SnapshotLoader.load_path("building.json".as_ref())?;
//! for door in model.resolver().entities_by_type(&IfcType::IfcDoor) {
//!     println!("{} {:?}", door.id, door.name);
//! }
//! ```

pub mod error;
pub mod geometry;
pub mod properties;
pub mod resolver;
pub mod snapshot;
pub mod spatial;
pub mod traits;
pub mod types;

// Re-export all public types
pub use error::*;
pub use geometry::*;
pub use properties::*;
pub use resolver::*;
pub use snapshot::*;
pub use spatial::*;
pub use traits::*;
pub use types::*;
