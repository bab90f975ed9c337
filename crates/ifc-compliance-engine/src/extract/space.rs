// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IfcSpace extraction

use super::{ElementRecord, Extractor};
use crate::identify::IdentificationHints;
use ifc_compliance_geometry::polygon_area;
use ifc_compliance_model::IfcType;

/// A space with its measured extents
#[derive(Clone, Debug, PartialEq)]
pub struct SpaceRecord {
    pub element: ElementRecord,
    /// Net (or gross) floor area in m²
    pub floor_area: Option<f64>,
    /// Clear height in meters
    pub height: Option<f64>,
    /// `Pset_SpaceCommon.Category`
    pub category: Option<String>,
}

impl SpaceRecord {
    /// Type tags used for classification
    pub fn type_tags(&self) -> Vec<&str> {
        [
            self.element.predefined_type.as_deref(),
            self.element.object_type.as_deref(),
            self.category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Classify against a hint set
    pub fn is(&self, hints: &IdentificationHints) -> bool {
        hints.matches(
            self.type_tags().iter().copied(),
            self.element.names().into_iter(),
        )
    }

    /// Passable width in millimeters (smaller horizontal extent)
    pub fn width_mm(&self) -> Option<f64> {
        self.element
            .geometry
            .bounds
            .map(|b| b.min_horizontal_extent() * 1000.0)
    }
}

/// Extracts IfcSpace elements; spaces without geometry are skipped
#[derive(Clone, Copy, Debug, Default)]
pub struct SpaceExtractor;

impl Extractor for SpaceExtractor {
    type Record = SpaceRecord;

    fn name(&self) -> &'static str {
        "space"
    }

    fn element_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcSpace]
    }

    fn build(&self, element: ElementRecord, unit_scale: f64) -> Option<SpaceRecord> {
        if !element.geometry.has_shape() {
            return None;
        }

        let floor_area = element
            .quantity("NetFloorArea")
            .or_else(|| element.quantity("GrossFloorArea"))
            .map(|a| a * unit_scale * unit_scale)
            .or_else(|| {
                element
                    .geometry
                    .footprint
                    .as_deref()
                    .and_then(|f| polygon_area(f).ok())
            });

        let height = element
            .quantity("Height")
            .map(|h| h * unit_scale)
            .or_else(|| element.geometry.bounds.map(|b| b.height()));

        let category = element.text("Pset_SpaceCommon", "Category");

        Some(SpaceRecord {
            element,
            floor_area,
            height,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::ElementClass;
    use approx::assert_relative_eq;
    use ifc_compliance_model::{
        Entity, EntityGeometry, EntityId, PropertySet, Quantity, QuantityType, SnapshotModel,
    };

    fn model() -> SnapshotModel {
        SnapshotModel::builder()
            .unit_scale(0.001)
            .entity(Entity::new(EntityId(1), IfcType::IfcSpace).with_name("Corridor A"))
            .geometry(EntityGeometry::from_box([0.0; 3], [10000.0, 1000.0, 2800.0]))
            .entity(
                Entity::new(EntityId(2), IfcType::IfcSpace)
                    .with_name("2.01")
                    .with_long_name("Office"),
            )
            .geometry(EntityGeometry::from_box([0.0, 1000.0, 0.0], [5000.0, 5000.0, 2800.0]))
            .quantity(Quantity::new("NetFloorArea", 19_000_000.0, QuantityType::Area))
            .property_set(PropertySet::new("Pset_SpaceCommon").with("Category", "OFFICE"))
            .entity(Entity::new(EntityId(3), IfcType::IfcSpace).with_name("Void"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_extract_spaces_and_skip_missing_geometry() {
        let extraction = SpaceExtractor.extract(&model());
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.diagnostics.total, 3);
        assert_eq!(extraction.diagnostics.skipped, 1);
        assert_eq!(extraction.diagnostics.skipped_ids, vec![EntityId(3)]);
    }

    #[test]
    fn test_space_measures() {
        let extraction = SpaceExtractor.extract(&model());
        let corridor = &extraction.records[0];
        assert_relative_eq!(corridor.width_mm().unwrap(), 1000.0, epsilon = 1e-6);
        assert_relative_eq!(corridor.height.unwrap(), 2.8, epsilon = 1e-9);

        let office = &extraction.records[1];
        assert_relative_eq!(office.floor_area.unwrap(), 19.0, epsilon = 1e-9);
        assert_eq!(office.type_tags(), vec!["OFFICE"]);
    }

    #[test]
    fn test_corridor_classification() {
        let hints = ElementClass::Corridor.default_hints();
        let extraction = SpaceExtractor.extract(&model());
        let corridors: Vec<_> = extraction.records.iter().filter(|s| s.is(&hints)).collect();
        assert_eq!(corridors.len(), 1);
        assert_eq!(corridors[0].element.element_id, EntityId(1));
    }
}
