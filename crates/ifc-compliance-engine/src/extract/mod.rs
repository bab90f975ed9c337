// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element extractors
//!
//! Each extractor turns the model's raw elements of one kind into typed
//! records with geometry in meters. Records are built fresh on every call;
//! nothing is cached on or across models.
//!
//! Elements missing what a record needs (usually geometry) are skipped and
//! counted in [`ExtractionDiagnostics`].

mod connectivity;
mod door;
mod space;
mod stair;
mod wall;

pub use connectivity::build_egress_graph;
pub use door::{DoorExtractor, DoorRecord, DoorWidth, WidthSource};
pub use space::{SpaceExtractor, SpaceRecord};
pub use stair::{StairExtractor, StairRecord};
pub use wall::{WallExtractor, WallRecord};

use ifc_compliance_geometry::{bounding_box, centroid, BoundingBox, Point3};
use ifc_compliance_model::{
    Entity, EntityGeometry, EntityId, EntityResolverExt, IfcModel, IfcType, PropertyValue,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Element geometry in meters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementGeometry {
    pub centroid: Option<Point3<f64>>,
    pub bounds: Option<BoundingBox>,
    pub footprint: Option<Vec<Point3<f64>>>,
    pub placement: Option<Point3<f64>>,
}

impl ElementGeometry {
    /// Convert a model shape from file units to meters
    pub fn from_source(geometry: &EntityGeometry, unit_scale: f64) -> Self {
        let scale = |v: &[f64; 3]| Point3::new(v[0], v[1], v[2]) * unit_scale;

        let vertices: Vec<Point3<f64>> = geometry.vertices.iter().map(scale).collect();
        let footprint: Option<Vec<Point3<f64>>> = geometry
            .footprint
            .as_ref()
            .filter(|f| !f.is_empty())
            .map(|f| f.iter().map(scale).collect());
        let placement = geometry.placement.as_ref().map(scale);

        let bounds = bounding_box(&vertices)
            .ok()
            .or_else(|| footprint.as_deref().and_then(|f| bounding_box(f).ok()));
        let centroid = centroid(&vertices)
            .or_else(|| footprint.as_deref().and_then(centroid))
            .or(placement);

        Self {
            centroid,
            bounds,
            footprint,
            placement,
        }
    }

    /// True when there is any shape to measure
    pub fn has_shape(&self) -> bool {
        self.bounds.is_some()
    }
}

/// Common data pulled from one model element
#[derive(Clone, Debug, PartialEq)]
pub struct ElementRecord {
    pub element_id: EntityId,
    pub global_id: String,
    pub element_type: IfcType,
    pub name: Option<String>,
    pub long_name: Option<String>,
    pub predefined_type: Option<String>,
    pub object_type: Option<String>,
    /// Name of the containing storey
    pub storey: Option<String>,
    pub geometry: ElementGeometry,
    /// Direct attributes, in file units
    pub attributes: BTreeMap<String, PropertyValue>,
    /// Property set name to properties
    pub properties: BTreeMap<String, BTreeMap<String, PropertyValue>>,
    /// Quantity name to value, in file units
    pub quantities: BTreeMap<String, f64>,
}

impl ElementRecord {
    /// Gather everything the model knows about an entity
    pub fn from_entity(model: &dyn IfcModel, entity: &Entity) -> Self {
        let geometry = model.geometry().get_geometry(entity.id);
        Self::with_geometry(model, entity, geometry.as_ref())
    }

    /// Like [`ElementRecord::from_entity`], with the geometry already fetched
    pub fn with_geometry(
        model: &dyn IfcModel,
        entity: &Entity,
        geometry: Option<&EntityGeometry>,
    ) -> Self {
        let id = entity.id;

        let geometry = geometry
            .map(|g| ElementGeometry::from_source(g, model.unit_scale()))
            .unwrap_or_default();

        let storey = model
            .spatial()
            .containing_storey(id)
            .and_then(|s| model.resolver().get_or_err(s).ok())
            .and_then(|s| s.name.clone());

        let properties = model
            .properties()
            .property_sets(id)
            .into_iter()
            .map(|pset| {
                let values = pset
                    .properties
                    .into_iter()
                    .map(|p| (p.name, p.value))
                    .collect();
                (pset.name, values)
            })
            .collect();

        let quantities = model
            .properties()
            .quantities(id)
            .into_iter()
            .map(|q| (q.name, q.value))
            .collect();

        Self {
            element_id: id,
            global_id: entity.global_id.clone(),
            element_type: entity.ifc_type.clone(),
            name: entity.name.clone(),
            long_name: entity.long_name.clone(),
            predefined_type: entity.predefined_type.clone(),
            object_type: entity.object_type.clone(),
            storey,
            geometry,
            attributes: entity.attributes.clone(),
            properties,
            quantities,
        }
    }

    /// Name, falling back to LongName
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.long_name.as_deref())
    }

    /// Names used for pattern matching
    pub fn names(&self) -> Vec<&str> {
        self.name
            .iter()
            .chain(self.long_name.iter())
            .map(String::as_str)
            .collect()
    }

    /// Property from a named set
    pub fn property(&self, pset: &str, name: &str) -> Option<&PropertyValue> {
        self.properties.get(pset).and_then(|p| p.get(name))
    }

    /// Boolean property from a named set, `false` when absent
    pub fn flag(&self, pset: &str, name: &str) -> bool {
        self.property(pset, name)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    /// Non-blank text property from a named set
    pub fn text(&self, pset: &str, name: &str) -> Option<String> {
        self.property(pset, name)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
    }

    pub fn quantity(&self, name: &str) -> Option<f64> {
        self.quantities.get(name).copied()
    }

    pub fn attribute_f64(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(PropertyValue::as_f64)
    }
}

/// Per-extractor skip accounting
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractionDiagnostics {
    pub extractor: String,
    pub total: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub skipped_ids: Vec<EntityId>,
}

impl ExtractionDiagnostics {
    pub fn new(extractor: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            ..Default::default()
        }
    }
}

/// Records produced by one extractor call
#[derive(Clone, Debug)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub diagnostics: ExtractionDiagnostics,
}

/// Builds typed records for one element kind
pub trait Extractor {
    type Record;

    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Model types this extractor reads
    fn element_types(&self) -> Vec<IfcType>;

    /// Build a record, or `None` to skip the element
    fn build(&self, element: ElementRecord, unit_scale: f64) -> Option<Self::Record>;

    /// Extract every element of this kind from the model
    fn extract(&self, model: &dyn IfcModel) -> Extraction<Self::Record> {
        let mut records = Vec::new();
        let mut diagnostics = ExtractionDiagnostics::new(self.name());
        let unit_scale = model.unit_scale();

        for ifc_type in self.element_types() {
            let entities = model.resolver().entities_by_type(&ifc_type);
            let ids: Vec<EntityId> = entities.iter().map(|e| e.id).collect();
            let shapes: FxHashMap<EntityId, EntityGeometry> =
                model.geometry().batch_geometry(&ids).into_iter().collect();

            for entity in entities {
                diagnostics.total += 1;
                let element = ElementRecord::with_geometry(model, &entity, shapes.get(&entity.id));
                match self.build(element, unit_scale) {
                    Some(record) => records.push(record),
                    None => diagnostics.skipped_ids.push(entity.id),
                }
            }
        }

        diagnostics.extracted = records.len();
        diagnostics.skipped = diagnostics.skipped_ids.len();
        log::debug!(
            "{} extractor: {} of {} elements extracted, {} skipped",
            diagnostics.extractor,
            diagnostics.extracted,
            diagnostics.total,
            diagnostics.skipped
        );

        Extraction {
            records,
            diagnostics,
        }
    }
}

/// File-unit length to millimeters
#[inline]
pub(crate) fn to_mm(value: f64, unit_scale: f64) -> f64 {
    value * unit_scale * 1000.0
}
