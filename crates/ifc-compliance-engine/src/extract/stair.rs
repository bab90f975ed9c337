// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IfcStair extraction

use super::{to_mm, ElementRecord, Extractor};
use ifc_compliance_model::{IfcType, PropertyValue};

/// A stair with its common properties and measured width
#[derive(Clone, Debug, PartialEq)]
pub struct StairRecord {
    pub element: ElementRecord,
    pub stair_type: Option<String>,
    pub is_external: bool,
    pub number_of_risers: Option<i64>,
    pub number_of_treads: Option<i64>,
    pub riser_height_mm: Option<f64>,
    pub tread_length_mm: Option<f64>,
    /// Smaller horizontal extent of the stair, in millimeters
    pub width_mm: Option<f64>,
}

/// Extracts IfcStair elements; stairs without geometry are skipped
#[derive(Clone, Copy, Debug, Default)]
pub struct StairExtractor;

impl Extractor for StairExtractor {
    type Record = StairRecord;

    fn name(&self) -> &'static str {
        "stair"
    }

    fn element_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcStair]
    }

    fn build(&self, element: ElementRecord, unit_scale: f64) -> Option<StairRecord> {
        let bounds = element.geometry.bounds?;

        let common = |name: &str| element.property("Pset_StairCommon", name);
        let count = |name: &str| common(name).and_then(PropertyValue::as_f64).map(|v| v as i64);
        let length_mm = |name: &str| {
            common(name)
                .and_then(PropertyValue::as_f64)
                .map(|v| to_mm(v, unit_scale))
        };

        let record = StairRecord {
            stair_type: element.predefined_type.clone(),
            is_external: element.flag("Pset_StairCommon", "IsExternal"),
            number_of_risers: count("NumberOfRiser"),
            number_of_treads: count("NumberOfTreads"),
            riser_height_mm: length_mm("RiserHeight"),
            tread_length_mm: length_mm("TreadLength"),
            width_mm: Some(bounds.min_horizontal_extent() * 1000.0),
            element,
        };
        Some(record)
    }
}
