// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BC-001: building setbacks from the site boundary
//!
//! Plan extents only: the site boundary and the building footprint are
//! both reduced to XY bounding boxes, with the front taken as the low Y
//! edge of the site.

use crate::config::{Category, RuleConfig};
use crate::extract::{ElementRecord, Extractor, WallExtractor};
use crate::rule::{number_value, round_to, Rule, RuleResult, Violation};
use crate::Result;
use ifc_compliance_geometry::{polygon_area, BoundingBox};
use ifc_compliance_model::{IfcModel, IfcType};

/// Minimum distances between external walls and the site boundary
#[derive(Clone, Copy, Debug, Default)]
pub struct SetbackRule;

impl Rule for SetbackRule {
    fn rule_id(&self) -> &'static str {
        "BC-001"
    }

    fn name(&self) -> &'static str {
        "Building Setback"
    }

    fn category(&self) -> Category {
        Category::BuildingControl
    }

    fn config_file(&self) -> &'static str {
        "setbacks.yaml"
    }

    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult> {
        let front: f64 = config.param("front_setback_m", 7.5);
        let side: f64 = config.param("side_setback_m", 3.0);
        let rear: f64 = config.param("rear_setback_m", 3.0);

        let skipped =
            |note: &str| RuleResult::for_rule(self, config, Vec::new()).with_metadata("note", note);
        let first = |ifc_type: IfcType| {
            model
                .resolver()
                .entities_by_type(&ifc_type)
                .into_iter()
                .next()
        };

        let Some(site) = first(IfcType::IfcSite) else {
            return Ok(skipped("No IfcSite found - setback check skipped"));
        };
        let site = ElementRecord::from_entity(model, &site);
        let Some(site_bounds) = site.geometry.bounds else {
            return Ok(skipped("Site boundary not defined - setback check skipped"));
        };

        let Some(building) = first(IfcType::IfcBuilding) else {
            return Ok(skipped("No IfcBuilding found - setback check skipped"));
        };

        let walls = WallExtractor.extract(model);
        let external: Vec<_> = walls.records.iter().filter(|w| w.is_external).collect();
        let footprint_walls = if external.is_empty() {
            walls.records.iter().collect()
        } else {
            external
        };
        let Some(footprint) = footprint_walls
            .iter()
            .filter_map(|w| w.element.geometry.bounds)
            .reduce(|a, b| a.union(&b))
        else {
            return Ok(skipped("No walls found - setback check skipped")
                .with_diagnostics(vec![walls.diagnostics]));
        };

        let mut violations = Vec::new();
        let mut site_area = None;
        if let Some(boundary) = site.geometry.footprint.as_deref() {
            match polygon_area(boundary) {
                Ok(area) => site_area = Some(area),
                Err(e) => violations.push(
                    Violation::info(format!("Site boundary area could not be computed: {e}"))
                        .on(&site),
                ),
            }
        }

        let building_name = building.display_name().map(str::to_string);
        for (edge, actual, required) in measure(&site_bounds, &footprint, front, side, rear) {
            if actual < required {
                violations.push(
                    Violation::error(format!(
                        "{edge} setback ({actual:.2}m) is less than required ({required}m)"
                    ))
                    .on_entity(building.id, IfcType::IfcBuilding.name(), building_name.as_deref())
                    .actual(number_value(round_to(actual, 2)))
                    .expected(number_value(required)),
                );
            }
        }

        let mut result = RuleResult::for_rule(self, config, violations)
            .with_metadata("walls_used", footprint_walls.len());
        if let Some(area) = site_area {
            result = result.with_metadata("site_area_m2", number_value(round_to(area, 2)));
        }
        Ok(result.with_diagnostics(vec![walls.diagnostics]))
    }
}

/// Setback per site edge: (edge, actual, required)
fn measure(
    site: &BoundingBox,
    building: &BoundingBox,
    front: f64,
    side: f64,
    rear: f64,
) -> [(&'static str, f64, f64); 4] {
    [
        ("Front", building.min.y - site.min.y, front),
        ("Rear", site.max.y - building.max.y, rear),
        ("Left side", building.min.x - site.min.x, side),
        ("Right side", site.max.x - building.max.x, side),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Severity;
    use approx::assert_relative_eq;
    use ifc_compliance_model::{Entity, EntityGeometry, EntityId, PropertySet, SnapshotModel};

    fn site_outline() -> EntityGeometry {
        EntityGeometry::default().with_footprint(vec![
            [0.0, 0.0, 0.0],
            [40.0, 0.0, 0.0],
            [40.0, 50.0, 0.0],
            [0.0, 50.0, 0.0],
        ])
    }

    type WallSpec = (Entity, PropertySet, EntityGeometry);

    fn wall(id: u32, min: [f64; 3], max: [f64; 3], external: bool) -> WallSpec {
        (
            Entity::new(EntityId(id), IfcType::IfcWall),
            PropertySet::new("Pset_WallCommon").with("IsExternal", external),
            EntityGeometry::from_box(min, max),
        )
    }

    fn model(walls: Vec<WallSpec>) -> SnapshotModel {
        let mut builder = SnapshotModel::builder()
            .entity(Entity::new(EntityId(1), IfcType::IfcSite).with_name("Lot 12"))
            .geometry(site_outline())
            .entity(Entity::new(EntityId(2), IfcType::IfcBuilding).with_name("Block A"));
        for (entity, pset, geometry) in walls {
            builder = builder.entity(entity).property_set(pset).geometry(geometry);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_setbacks() {
        // footprint x 5..36, y 6..45: front 6 < 7.5, right 4 ok, rear 5 ok, left 5 ok
        let model = model(vec![
            wall(10, [5.0, 6.0, 0.0], [36.0, 6.3, 3.0], true),
            wall(11, [5.0, 44.7, 0.0], [36.0, 45.0, 3.0], true),
            // interior wall outside the footprint is ignored
            wall(12, [0.5, 20.0, 0.0], [1.0, 30.0, 3.0], false),
        ]);
        let config = RuleConfig::new("BC-001", Category::BuildingControl);
        let result = SetbackRule.check(&model, &config).unwrap();

        assert!(!result.passed());
        assert_eq!(result.violations().len(), 1);
        let violation = &result.violations()[0];
        assert_eq!(violation.element_id, Some(EntityId(2)));
        assert_eq!(violation.element_type, "IfcBuilding");
        assert_eq!(violation.element_name.as_deref(), Some("Block A"));
        assert!(violation.message.starts_with("Front setback"));
        assert_eq!(violation.actual_value, Some(serde_json::json!(6)));
        assert_eq!(violation.expected_value, Some(serde_json::json!(7.5)));
        assert_eq!(result.metadata()["walls_used"], 2);
        assert_relative_eq!(result.metadata()["site_area_m2"].as_f64().unwrap(), 2000.0);
    }

    #[test]
    fn test_all_walls_when_none_external() {
        let model = model(vec![wall(10, [1.0, 10.0, 0.0], [30.0, 40.0, 3.0], false)]);
        let config = RuleConfig::new("BC-001", Category::BuildingControl);
        let result = SetbackRule.check(&model, &config).unwrap();
        let edges: Vec<_> = result
            .violations()
            .iter()
            .map(|v| (v.message.split(" setback").next().unwrap().to_string(), v.severity))
            .collect();
        assert_eq!(edges, vec![("Left side".to_string(), Severity::Error)]);
    }

    #[test]
    fn test_missing_site_skips() {
        let model = SnapshotModel::builder()
            .entity(Entity::new(EntityId(2), IfcType::IfcBuilding))
            .build()
            .unwrap();
        let config = RuleConfig::new("BC-001", Category::BuildingControl);
        let result = SetbackRule.check(&model, &config).unwrap();
        assert!(result.passed());
        assert_eq!(result.metadata()["note"], "No IfcSite found - setback check skipped");
    }

    #[test]
    fn test_degenerate_site_outline_is_info() {
        let too_short = vec![[0.0, 0.0, 0.0], [40.0, 0.0, 0.0]];
        let collinear = vec![[0.0, 0.0, 0.0], [20.0, 0.0, 0.0], [40.0, 0.0, 0.0]];

        for outline in [too_short, collinear] {
            let model = SnapshotModel::builder()
                .entity(Entity::new(EntityId(1), IfcType::IfcSite))
                .geometry(
                    EntityGeometry::from_box([0.0; 3], [40.0, 50.0, 0.0]).with_footprint(outline),
                )
                .entity(Entity::new(EntityId(2), IfcType::IfcBuilding))
                .entity(Entity::new(EntityId(10), IfcType::IfcWall))
                .geometry(EntityGeometry::from_box([10.0, 10.0, 0.0], [30.0, 40.0, 3.0]))
                .build()
                .unwrap();
            let config = RuleConfig::new("BC-001", Category::BuildingControl);
            let result = SetbackRule.check(&model, &config).unwrap();
            assert!(result.passed());
            assert_eq!(result.violations().len(), 1);
            assert_eq!(result.violations()[0].severity, Severity::Info);
            assert_eq!(result.violations()[0].element_id, Some(EntityId(1)));
            assert!(!result.metadata().contains_key("site_area_m2"));
        }
    }
}
