// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IfcDoor extraction

use super::{to_mm, ElementRecord, Extractor};
use crate::identify::IdentificationHints;
use ifc_compliance_model::{IfcType, PropertyValue};

/// Where a door width came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthSource {
    /// A width property in one of the door's property sets
    Property,
    /// The `OverallWidth` attribute
    Attribute,
    /// Larger horizontal extent of the door's bounding box
    Estimated,
}

/// A resolved door width in millimeters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorWidth {
    pub mm: f64,
    pub source: WidthSource,
}

impl DoorWidth {
    /// Whether the width is a geometric estimate rather than a declared value
    pub fn is_estimate(&self) -> bool {
        self.source == WidthSource::Estimated
    }
}

/// A door with its declared and measured dimensions
#[derive(Clone, Debug, PartialEq)]
pub struct DoorRecord {
    pub element: ElementRecord,
    pub door_type: Option<String>,
    pub overall_width_mm: Option<f64>,
    pub overall_height_mm: Option<f64>,
    pub clear_width_mm: Option<f64>,
    pub is_external: bool,
    pub fire_rating: Option<String>,
}

impl DoorRecord {
    pub fn is_fire_rated(&self) -> bool {
        self.fire_rating.is_some()
    }

    /// Best available opening width: clear width, then overall width, then
    /// the bounding box estimate
    pub fn width(&self) -> Option<DoorWidth> {
        if let Some(mm) = self.clear_width_mm {
            return Some(DoorWidth {
                mm,
                source: WidthSource::Property,
            });
        }
        if let Some(mm) = self.overall_width_mm {
            return Some(DoorWidth {
                mm,
                source: WidthSource::Attribute,
            });
        }
        // a door leaf is wider than the wall it sits in is thick
        self.element.geometry.bounds.map(|b| DoorWidth {
            mm: b.width().max(b.depth()) * 1000.0,
            source: WidthSource::Estimated,
        })
    }

    /// Classify against a hint set
    pub fn is(&self, hints: &IdentificationHints) -> bool {
        let tags: Vec<&str> = [
            self.door_type.as_deref(),
            self.element.object_type.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        hints.matches(tags.iter().copied(), self.element.names().into_iter())
    }
}

/// Extracts IfcDoor elements
///
/// A door is skipped only when it has neither geometry nor any declared
/// width.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoorExtractor;

impl Extractor for DoorExtractor {
    type Record = DoorRecord;

    fn name(&self) -> &'static str {
        "door"
    }

    fn element_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcDoor]
    }

    fn build(&self, element: ElementRecord, unit_scale: f64) -> Option<DoorRecord> {
        let overall_width_mm = element
            .attribute_f64("OverallWidth")
            .filter(|w| *w > 0.0)
            .map(|w| to_mm(w, unit_scale));
        let overall_height_mm = element
            .attribute_f64("OverallHeight")
            .filter(|h| *h > 0.0)
            .map(|h| to_mm(h, unit_scale));

        let clear_width_mm = declared_clear_width(&element).map(|w| to_mm(w, unit_scale));

        if !element.geometry.has_shape() && overall_width_mm.is_none() && clear_width_mm.is_none()
        {
            return None;
        }

        let is_external = element.flag("Pset_DoorCommon", "IsExternal");
        let fire_rating = element.text("Pset_DoorCommon", "FireRating");
        let door_type = element
            .predefined_type
            .clone()
            .filter(|t| !t.eq_ignore_ascii_case("NOTDEFINED"));

        Some(DoorRecord {
            element,
            door_type,
            overall_width_mm,
            overall_height_mm,
            clear_width_mm,
            is_external,
            fire_rating,
        })
    }
}

/// Positive numeric property value, in file units
fn positive_number(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Integer(_) | PropertyValue::Float(_) => value.as_f64().filter(|w| *w > 0.0),
        _ => None,
    }
}

/// Declared clear opening width, in file units
///
/// `Pset_DoorCommon.ClearWidth`, then `ClearWidth` in any set, then
/// `Pset_DoorCommon.Width`, then the first numeric `*width*` property with
/// sets in name order.
fn declared_clear_width(element: &ElementRecord) -> Option<f64> {
    let common = |name: &str| {
        element
            .property("Pset_DoorCommon", name)
            .and_then(positive_number)
    };
    let all = || element.properties.values().flat_map(|props| props.iter());

    common("ClearWidth")
        .or_else(|| {
            all()
                .filter(|(name, _)| name.eq_ignore_ascii_case("ClearWidth"))
                .find_map(|(_, value)| positive_number(value))
        })
        .or_else(|| common("Width"))
        .or_else(|| {
            all()
                .filter(|(name, _)| name.to_lowercase().contains("width"))
                .find_map(|(_, value)| positive_number(value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_compliance_model::{Entity, EntityGeometry, EntityId, PropertySet, SnapshotModel};

    fn model() -> SnapshotModel {
        SnapshotModel::builder()
            .unit_scale(0.001)
            .entity(
                Entity::new(EntityId(1), IfcType::IfcDoor)
                    .with_name("Main Entrance")
                    .with_attribute("OverallWidth", 1000.0),
            )
            .property_set(
                PropertySet::new("Pset_DoorCommon")
                    .with("IsExternal", true)
                    .with("FireRating", "FD30"),
            )
            .entity(Entity::new(EntityId(2), IfcType::IfcDoor).with_name("D-02"))
            .geometry(EntityGeometry::from_box([0.0; 3], [820.0, 100.0, 2100.0]))
            .entity(
                Entity::new(EntityId(3), IfcType::IfcDoor)
                    .with_name("D-03")
                    .with_attribute("OverallWidth", 1000.0),
            )
            .property_set(PropertySet::new("Pset_Custom").with("ClearWidth", 850_i64))
            .entity(Entity::new(EntityId(4), IfcType::IfcDoor).with_name("Ghost"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_width_sources() {
        let extraction = DoorExtractor.extract(&model());
        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.diagnostics.skipped_ids, vec![EntityId(4)]);

        let main = extraction.records[0].width().unwrap();
        assert_eq!(main.source, WidthSource::Attribute);
        assert_relative_eq!(main.mm, 1000.0, epsilon = 1e-9);

        let estimated = extraction.records[1].width().unwrap();
        assert!(estimated.is_estimate());
        assert_relative_eq!(estimated.mm, 820.0, epsilon = 1e-9);

        let clear = extraction.records[2].width().unwrap();
        assert_eq!(clear.source, WidthSource::Property);
        assert_relative_eq!(clear.mm, 850.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clear_width_preferred_over_frame_widths() {
        let model = SnapshotModel::builder()
            .entity(Entity::new(EntityId(1), IfcType::IfcDoor).with_attribute("OverallWidth", 1.0))
            .property_set(PropertySet::new("Pset_DoorCommon").with("ClearWidth", 0.9))
            .property_set(PropertySet::new("Pset_DoorLiningProperties").with("LiningWidth", 0.05))
            .entity(Entity::new(EntityId(2), IfcType::IfcDoor).with_attribute("OverallWidth", 1.0))
            .property_set(PropertySet::new("Pset_DoorLiningProperties").with("LiningWidth", 0.05))
            .property_set(PropertySet::new("Pset_Manufacturer").with("ClearWidth", 0.8))
            .entity(Entity::new(EntityId(3), IfcType::IfcDoor).with_attribute("OverallWidth", 1.0))
            .property_set(PropertySet::new("Pset_DoorLiningProperties").with("LiningWidth", 0.05))
            .build()
            .unwrap();

        let widths: Vec<f64> = DoorExtractor
            .extract(&model)
            .records
            .iter()
            .map(|d| d.clear_width_mm.unwrap())
            .collect();
        assert_relative_eq!(widths[0], 900.0, epsilon = 1e-9);
        assert_relative_eq!(widths[1], 800.0, epsilon = 1e-9);
        // nothing better declared: falls back to any width property
        assert_relative_eq!(widths[2], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_door_flags() {
        let extraction = DoorExtractor.extract(&model());
        let main = &extraction.records[0];
        assert!(main.is_external);
        assert!(main.is_fire_rated());
        assert!(!extraction.records[1].is_external);
    }
}
