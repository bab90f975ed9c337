// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey containment and space boundaries

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Summary of one IfcBuildingStorey
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreyInfo {
    pub id: EntityId,
    pub name: String,
    /// File units
    pub elevation: f64,
    /// Directly contained elements
    pub element_count: usize,
}

impl StoreyInfo {
    pub fn new(id: EntityId, name: impl Into<String>, elevation: f64, element_count: usize) -> Self {
        StoreyInfo {
            id,
            name: name.into(),
            elevation,
            element_count,
        }
    }
}

/// Resolved spatial relationships
///
/// Containment comes from IfcRelContainedInSpatialStructure, boundaries
/// from IfcRelSpaceBoundary. Both directions of a boundary are queryable.
///
/// # Example
///
/// ```ignore
/// use ifc_compliance_model::SpatialQuery;
///
/// // spaces a door connects
/// let rooms = model.spatial().spaces_bounded_by(door_id);
/// ```
pub trait SpatialQuery: Send + Sync {
    /// Storeys, lowest elevation first
    fn storeys(&self) -> Vec<StoreyInfo>;

    fn elements_in_storey(&self, storey_id: EntityId) -> Vec<EntityId>;

    /// Storey an element is contained in, if any
    fn containing_storey(&self, element_id: EntityId) -> Option<EntityId>;

    /// Walls, doors and openings around a space
    fn space_boundaries(&self, space_id: EntityId) -> Vec<EntityId>;

    /// Spaces on either side of a building element
    fn spaces_bounded_by(&self, element_id: EntityId) -> Vec<EntityId>;

    /// Entities whose name or type contains `query`, case-insensitive
    fn search(&self, query: &str) -> Vec<EntityId>;
}
