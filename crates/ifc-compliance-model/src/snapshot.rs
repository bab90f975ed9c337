// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON snapshot model
//!
//! A snapshot is a model that has already been parsed and had its geometry
//! resolved by an upstream tool, written out as a single JSON document:
//!
//! ```json
//! {
//!   "metadata": { "schema_version": "IFC4" },
//!   "unit_scale": 0.001,
//!   "elements": [
//!     {
//!       "id": 12, "ifc_type": "IfcDoor", "name": "D-01",
//!       "attributes": { "OverallWidth": 900 },
//!       "property_sets": [
//!         { "name": "Pset_DoorCommon", "properties": [ { "name": "IsExternal", "value": true } ] }
//!       ],
//!       "geometry": { "vertices": [[0, 0, 0], [900, 100, 2100]] },
//!       "container": 3,
//!       "bounds": [40, 41]
//!     }
//!   ]
//! }
//! ```
//!
//! `bounds` lists the spaces an element bounds (IfcRelSpaceBoundary seen from
//! the element side); the reverse index is built on load.

use crate::{
    Entity, EntityGeometry, EntityId, EntityResolver, GeometrySource, IfcModel, IfcType,
    ModelError, ModelLoader, ModelMetadata, PropertyReader, PropertySet, Quantity, Result,
    SpatialQuery, StoreyInfo,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized form of a snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64,
    #[serde(default)]
    pub elements: Vec<SnapshotElement>,
}

impl Default for SnapshotDocument {
    fn default() -> Self {
        Self {
            metadata: ModelMetadata::default(),
            unit_scale: default_unit_scale(),
            elements: Vec::new(),
        }
    }
}

fn default_unit_scale() -> f64 {
    1.0
}

/// One element of a snapshot document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotElement {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub property_sets: Vec<PropertySet>,
    #[serde(default)]
    pub quantities: Vec<Quantity>,
    #[serde(default)]
    pub geometry: Option<EntityGeometry>,
    /// Containing spatial structure element (usually a storey)
    #[serde(default)]
    pub container: Option<EntityId>,
    /// Spaces this element bounds
    #[serde(default)]
    pub bounds: Vec<EntityId>,
}

/// In-memory model backed by a snapshot document
///
/// All indexes are built once on load; entity order follows the document.
pub struct SnapshotModel {
    metadata: ModelMetadata,
    unit_scale: f64,
    order: Vec<EntityId>,
    entities: FxHashMap<EntityId, Arc<Entity>>,
    property_sets: FxHashMap<EntityId, Vec<PropertySet>>,
    quantities: FxHashMap<EntityId, Vec<Quantity>>,
    geometry: FxHashMap<EntityId, EntityGeometry>,
    container: FxHashMap<EntityId, EntityId>,
    contained: FxHashMap<EntityId, Vec<EntityId>>,
    space_boundaries: FxHashMap<EntityId, Vec<EntityId>>,
    bounded_spaces: FxHashMap<EntityId, Vec<EntityId>>,
}

impl SnapshotModel {
    /// Parse a snapshot from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    /// Build a model from a decoded document
    pub fn from_document(document: SnapshotDocument) -> Result<Self> {
        if !document.unit_scale.is_finite() || document.unit_scale <= 0.0 {
            return Err(ModelError::format(format!(
                "unit_scale must be a positive number, got {}",
                document.unit_scale
            )));
        }

        let mut model = SnapshotModel {
            metadata: document.metadata,
            unit_scale: document.unit_scale,
            order: Vec::with_capacity(document.elements.len()),
            entities: FxHashMap::default(),
            property_sets: FxHashMap::default(),
            quantities: FxHashMap::default(),
            geometry: FxHashMap::default(),
            container: FxHashMap::default(),
            contained: FxHashMap::default(),
            space_boundaries: FxHashMap::default(),
            bounded_spaces: FxHashMap::default(),
        };

        for element in document.elements {
            let id = element.entity.id;
            if model.entities.contains_key(&id) {
                return Err(ModelError::DuplicateEntity(id));
            }
            model.order.push(id);
            model.entities.insert(id, Arc::new(element.entity));

            if !element.property_sets.is_empty() {
                model.property_sets.insert(id, element.property_sets);
            }
            if !element.quantities.is_empty() {
                model.quantities.insert(id, element.quantities);
            }
            if let Some(geometry) = element.geometry.filter(|g| !g.is_empty()) {
                model.geometry.insert(id, geometry);
            }
            if let Some(container) = element.container {
                model.container.insert(id, container);
                model.contained.entry(container).or_default().push(id);
            }
            for space in element.bounds {
                model.space_boundaries.entry(space).or_default().push(id);
                model.bounded_spaces.entry(id).or_default().push(space);
            }
        }

        Ok(model)
    }

    /// Start building a snapshot in code
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }
}

impl IfcModel for SnapshotModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self
    }

    fn properties(&self) -> &dyn PropertyReader {
        self
    }

    fn spatial(&self) -> &dyn SpatialQuery {
        self
    }

    fn geometry(&self) -> &dyn GeometrySource {
        self
    }

    fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl EntityResolver for SnapshotModel {
    fn get(&self, id: EntityId) -> Option<Arc<Entity>> {
        self.entities.get(&id).cloned()
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<Entity>> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|e| &e.ifc_type == ifc_type)
            .cloned()
            .collect()
    }

    fn all_ids(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    fn entity_count(&self) -> usize {
        self.order.len()
    }
}

impl PropertyReader for SnapshotModel {
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet> {
        self.property_sets.get(&id).cloned().unwrap_or_default()
    }

    fn quantities(&self, id: EntityId) -> Vec<Quantity> {
        self.quantities.get(&id).cloned().unwrap_or_default()
    }
}

impl SpatialQuery for SnapshotModel {
    fn storeys(&self) -> Vec<StoreyInfo> {
        let mut storeys: Vec<StoreyInfo> = self
            .entities_by_type(&IfcType::IfcBuildingStorey)
            .into_iter()
            .map(|storey| {
                let elevation = storey
                    .attribute("Elevation")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                let count = self.contained.get(&storey.id).map_or(0, |c| c.len());
                StoreyInfo::new(
                    storey.id,
                    storey.name.clone().unwrap_or_default(),
                    elevation,
                    count,
                )
            })
            .collect();
        storeys.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
        storeys
    }

    fn elements_in_storey(&self, storey_id: EntityId) -> Vec<EntityId> {
        self.contained.get(&storey_id).cloned().unwrap_or_default()
    }

    fn containing_storey(&self, element_id: EntityId) -> Option<EntityId> {
        let container = *self.container.get(&element_id)?;
        let entity = self.entities.get(&container)?;
        (entity.ifc_type == IfcType::IfcBuildingStorey).then_some(container)
    }

    fn space_boundaries(&self, space_id: EntityId) -> Vec<EntityId> {
        self.space_boundaries
            .get(&space_id)
            .cloned()
            .unwrap_or_default()
    }

    fn spaces_bounded_by(&self, element_id: EntityId) -> Vec<EntityId> {
        self.bounded_spaces
            .get(&element_id)
            .cloned()
            .unwrap_or_default()
    }

    fn search(&self, query: &str) -> Vec<EntityId> {
        let query = query.to_lowercase();
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|e| {
                e.ifc_type.name().to_lowercase().contains(&query)
                    || e.name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&query))
                    || e.long_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&query))
            })
            .map(|e| e.id)
            .collect()
    }
}

impl GeometrySource for SnapshotModel {
    fn entities_with_geometry(&self) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.geometry.contains_key(id))
            .collect()
    }

    fn has_geometry(&self, id: EntityId) -> bool {
        self.geometry.contains_key(&id)
    }

    fn get_geometry(&self, id: EntityId) -> Option<EntityGeometry> {
        self.geometry.get(&id).cloned()
    }
}

/// Programmatic snapshot construction
#[derive(Default)]
pub struct SnapshotBuilder {
    document: SnapshotDocument,
}

impl SnapshotBuilder {
    pub fn unit_scale(mut self, unit_scale: f64) -> Self {
        self.document.unit_scale = unit_scale;
        self
    }

    pub fn metadata(mut self, metadata: ModelMetadata) -> Self {
        self.document.metadata = metadata;
        self
    }

    /// Add an entity
    pub fn entity(mut self, entity: Entity) -> Self {
        self.document.elements.push(SnapshotElement {
            entity,
            property_sets: Vec::new(),
            quantities: Vec::new(),
            geometry: None,
            container: None,
            bounds: Vec::new(),
        });
        self
    }

    /// Attach a property set to the most recently added entity
    pub fn property_set(mut self, pset: PropertySet) -> Self {
        if let Some(element) = self.document.elements.last_mut() {
            element.property_sets.push(pset);
        }
        self
    }

    /// Attach a quantity to the most recently added entity
    pub fn quantity(mut self, quantity: Quantity) -> Self {
        if let Some(element) = self.document.elements.last_mut() {
            element.quantities.push(quantity);
        }
        self
    }

    /// Set geometry of the most recently added entity
    pub fn geometry(mut self, geometry: EntityGeometry) -> Self {
        if let Some(element) = self.document.elements.last_mut() {
            element.geometry = Some(geometry);
        }
        self
    }

    /// Place the most recently added entity in a storey
    pub fn contained_in(mut self, container: EntityId) -> Self {
        if let Some(element) = self.document.elements.last_mut() {
            element.container = Some(container);
        }
        self
    }

    /// Record that the most recently added entity bounds the given spaces
    pub fn bounds(mut self, spaces: &[EntityId]) -> Self {
        if let Some(element) = self.document.elements.last_mut() {
            element.bounds.extend_from_slice(spaces);
        }
        self
    }

    pub fn build(self) -> Result<SnapshotModel> {
        SnapshotModel::from_document(self.document)
    }
}

/// [`ModelLoader`] for JSON snapshot documents
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotLoader;

impl ModelLoader for SnapshotLoader {
    fn load(&self, content: &str) -> Result<Arc<dyn IfcModel>> {
        Ok(Arc::new(SnapshotModel::from_json(content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityResolverExt, PropertyValue, QuantityType};

    const SNAPSHOT: &str = r#"{
        "metadata": { "schema_version": "IFC4" },
        "unit_scale": 0.001,
        "elements": [
            { "id": 1, "ifc_type": "IfcBuildingStorey", "name": "Level 1",
              "attributes": { "Elevation": 0.0 } },
            { "id": 10, "ifc_type": "IFCSPACE", "name": "Corridor 1", "container": 1,
              "geometry": { "vertices": [[0, 0, 0], [10000, 1000, 3000]] } },
            { "id": 11, "ifc_type": "IfcSpace", "name": "Office", "container": 1 },
            { "id": 20, "ifc_type": "IfcDoor", "name": "D-01", "container": 1,
              "attributes": { "OverallWidth": 900 },
              "property_sets": [
                { "name": "Pset_DoorCommon",
                  "properties": [ { "name": "IsExternal", "value": true } ] }
              ],
              "bounds": [10, 11] }
        ]
    }"#;

    #[test]
    fn test_load_snapshot() {
        let model = SnapshotLoader.load(SNAPSHOT).unwrap();
        assert_eq!(model.metadata().schema_version, "IFC4");
        assert_eq!(model.unit_scale(), 0.001);
        assert_eq!(model.resolver().entity_count(), 4);

        let spaces = model.resolver().entities_by_type(&IfcType::IfcSpace);
        let ids: Vec<_> = spaces.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![EntityId(10), EntityId(11)]);
    }

    #[test]
    fn test_properties_and_attributes() {
        let model = SnapshotModel::from_json(SNAPSHOT).unwrap();
        let door = model.get_or_err(EntityId(20)).unwrap();
        assert_eq!(door.attribute("OverallWidth"), Some(&PropertyValue::Integer(900)));

        let external = model
            .get_pset_property(EntityId(20), "Pset_DoorCommon", "IsExternal")
            .and_then(|p| p.value.as_bool());
        assert_eq!(external, Some(true));
        assert!(model.get_property(EntityId(20), "FireRating").is_none());
    }

    #[test]
    fn test_spatial_indexes() {
        let model = SnapshotModel::from_json(SNAPSHOT).unwrap();
        assert_eq!(model.containing_storey(EntityId(10)), Some(EntityId(1)));
        assert_eq!(model.elements_in_storey(EntityId(1)).len(), 3);
        assert_eq!(model.space_boundaries(EntityId(11)), vec![EntityId(20)]);
        assert_eq!(
            model.spaces_bounded_by(EntityId(20)),
            vec![EntityId(10), EntityId(11)]
        );
        assert_eq!(model.search("corridor"), vec![EntityId(10)]);

        let storeys = model.storeys();
        assert_eq!(storeys.len(), 1);
        assert_eq!(storeys[0].element_count, 3);
    }

    #[test]
    fn test_lookup_by_type_name() {
        let model = SnapshotModel::from_json(SNAPSHOT).unwrap();
        let spaces = model.find_by_type_name("IFCSPACE");
        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].name.as_deref(), Some("Corridor 1"));
        assert_eq!(model.count_by_type(&IfcType::IfcDoor), 1);
        assert_eq!(model.count_by_type(&IfcType::IfcWall), 0);
        assert!(model.find_by_type_name("IfcRamp").is_empty());
    }

    #[test]
    fn test_geometry_lookup() {
        let model = SnapshotModel::from_json(SNAPSHOT).unwrap();
        assert!(model.has_geometry(EntityId(10)));
        assert!(!model.has_geometry(EntityId(11)));
        assert_eq!(model.entities_with_geometry(), vec![EntityId(10)]);

        let batch = model.batch_geometry(&[EntityId(11), EntityId(10), EntityId(99)]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].0, EntityId(10));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_scale() {
        let duplicate = SnapshotModel::builder()
            .entity(Entity::new(EntityId(1), IfcType::IfcDoor))
            .entity(Entity::new(EntityId(1), IfcType::IfcWall))
            .build();
        assert!(matches!(duplicate, Err(ModelError::DuplicateEntity(EntityId(1)))));

        let bad_scale = SnapshotModel::builder().unit_scale(0.0).build();
        assert!(matches!(bad_scale, Err(ModelError::InvalidFormat(_))));

        assert!(matches!(
            SnapshotModel::from_json("not json"),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn test_builder_defaults_to_metre_units() {
        let model = SnapshotModel::builder()
            .entity(Entity::new(EntityId(1), IfcType::IfcSpace))
            .build()
            .unwrap();
        assert_eq!(model.unit_scale(), 1.0);

        let loaded = SnapshotLoader.load(r#"{"elements": []}"#).unwrap();
        assert_eq!(loaded.unit_scale(), model.unit_scale());
    }

    #[test]
    fn test_builder_attaches_to_last_entity() {
        let model = SnapshotModel::builder()
            .entity(Entity::new(EntityId(5), IfcType::IfcSpace))
            .quantity(Quantity::new("NetFloorArea", 12.5, QuantityType::Area))
            .geometry(EntityGeometry::from_box([0.0; 3], [1.0, 1.0, 1.0]))
            .build()
            .unwrap();
        assert_eq!(model.quantities(EntityId(5)).len(), 1);
        assert_eq!(model.get_quantity(EntityId(5), "NetFloorArea").unwrap().value, 12.5);
        assert!(model.has_geometry(EntityId(5)));
    }
}
