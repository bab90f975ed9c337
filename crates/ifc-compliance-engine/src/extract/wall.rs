// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IfcWall extraction

use super::{ElementRecord, Extractor};
use ifc_compliance_model::IfcType;

/// A wall with its common properties and base quantities
#[derive(Clone, Debug, PartialEq)]
pub struct WallRecord {
    pub element: ElementRecord,
    pub is_external: bool,
    pub is_load_bearing: bool,
    pub fire_rating: Option<String>,
    /// Meters, from `Qto_WallBaseQuantities`
    pub thickness: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
}

/// Extracts walls of every wall type; walls without geometry are skipped
#[derive(Clone, Copy, Debug, Default)]
pub struct WallExtractor;

impl Extractor for WallExtractor {
    type Record = WallRecord;

    fn name(&self) -> &'static str {
        "wall"
    }

    fn element_types(&self) -> Vec<IfcType> {
        vec![
            IfcType::IfcWall,
            IfcType::IfcWallStandardCase,
            IfcType::IfcCurtainWall,
        ]
    }

    fn build(&self, element: ElementRecord, unit_scale: f64) -> Option<WallRecord> {
        if !element.geometry.has_shape() {
            return None;
        }
        let length_quantity = |name: &str| element.quantity(name).map(|v| v * unit_scale);

        Some(WallRecord {
            is_external: element.flag("Pset_WallCommon", "IsExternal"),
            is_load_bearing: element.flag("Pset_WallCommon", "LoadBearing"),
            fire_rating: element.text("Pset_WallCommon", "FireRating"),
            thickness: length_quantity("Width"),
            height: length_quantity("Height"),
            length: length_quantity("Length"),
            element,
        })
    }
}
