// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry source trait for element shapes

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Resolved shape of an element, in file units
///
/// `vertices` are the world-space vertices of the element's body
/// representation. `footprint` is an optional closed boundary polyline
/// (e.g. an IfcSite boundary or a space's floor outline), and `placement`
/// the world-space origin of the element's local placement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityGeometry {
    #[serde(default)]
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub footprint: Option<Vec<[f64; 3]>>,
    #[serde(default)]
    pub placement: Option<[f64; 3]>,
}

impl EntityGeometry {
    /// Create geometry from body vertices
    pub fn from_vertices(vertices: Vec<[f64; 3]>) -> Self {
        Self {
            vertices,
            footprint: None,
            placement: None,
        }
    }

    /// Axis-aligned box between two corners, as its 8 vertices
    pub fn from_box(min: [f64; 3], max: [f64; 3]) -> Self {
        let mut vertices = Vec::with_capacity(8);
        for &z in &[min[2], max[2]] {
            for &y in &[min[1], max[1]] {
                for &x in &[min[0], max[0]] {
                    vertices.push([x, y, z]);
                }
            }
        }
        Self::from_vertices(vertices)
    }

    pub fn with_footprint(mut self, footprint: Vec<[f64; 3]>) -> Self {
        self.footprint = Some(footprint);
        self
    }

    pub fn with_placement(mut self, placement: [f64; 3]) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Check if geometry carries no shape at all
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.footprint.as_ref().map_or(true, |f| f.is_empty())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Geometry source
///
/// Provides resolved element shapes. Coordinates are in file units; callers
/// scale them with [`crate::IfcModel::unit_scale`].
pub trait GeometrySource: Send + Sync {
    /// Get all entity IDs that have geometry
    fn entities_with_geometry(&self) -> Vec<EntityId>;

    /// Check if an entity has geometry
    fn has_geometry(&self, id: EntityId) -> bool;

    /// Get geometry for a single entity
    fn get_geometry(&self, id: EntityId) -> Option<EntityGeometry>;

    /// Get geometry for multiple entities, skipping those without any
    fn batch_geometry(&self, ids: &[EntityId]) -> Vec<(EntityId, EntityGeometry)> {
        ids.iter()
            .filter_map(|id| self.get_geometry(*id).map(|g| (*id, g)))
            .collect()
    }
}
