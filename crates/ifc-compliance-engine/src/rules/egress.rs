// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FS-002: egress widths of doors, corridors and stairs

use super::whole_mm;
use crate::config::{Category, RuleConfig};
use crate::extract::{DoorExtractor, Extractor, SpaceExtractor, StairExtractor};
use crate::identify::ElementClass;
use crate::rule::{number_value, Rule, RuleResult, Violation};
use crate::Result;
use ifc_compliance_model::IfcModel;

/// Minimum widths along escape routes
#[derive(Clone, Copy, Debug, Default)]
pub struct EgressWidthRule;

impl Rule for EgressWidthRule {
    fn rule_id(&self) -> &'static str {
        "FS-002"
    }

    fn name(&self) -> &'static str {
        "Egress Width"
    }

    fn category(&self) -> Category {
        Category::FireSafety
    }

    fn config_file(&self) -> &'static str {
        "egress.yaml"
    }

    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult> {
        let min_door: f64 = config.param("min_door_width_mm", 850.0);
        let min_corridor: f64 = config.param("min_corridor_width_mm", 1200.0);
        let min_stair: f64 = config.param("min_stair_width_mm", 1000.0);

        let doors = DoorExtractor.extract(model);
        let spaces = SpaceExtractor.extract(model);
        let stairs = StairExtractor.extract(model);

        let mut violations = Vec::new();

        for door in &doors.records {
            let Some(width) = door.width() else {
                continue;
            };
            if width.mm >= min_door {
                continue;
            }
            let violation = if width.is_estimate() {
                // a bounding box is only an approximation of the opening
                Violation::warning(format!(
                    "Estimated door width ({:.0}mm) is less than minimum required ({min_door}mm)",
                    width.mm
                ))
            } else {
                Violation::error(format!(
                    "Door width ({:.0}mm) is less than minimum required ({min_door}mm)",
                    width.mm
                ))
            };
            violations.push(
                violation
                    .on(&door.element)
                    .actual(whole_mm(width.mm))
                    .expected(number_value(min_door)),
            );
        }

        let corridor_hints = config.hints(ElementClass::Corridor);
        let mut corridors_checked = 0usize;
        for corridor in spaces.records.iter().filter(|s| s.is(&corridor_hints)) {
            let Some(width) = corridor.width_mm() else {
                continue;
            };
            corridors_checked += 1;
            if width < min_corridor {
                violations.push(
                    Violation::error(format!(
                        "Corridor width ({width:.0}mm) is less than minimum required ({min_corridor}mm)"
                    ))
                    .on(&corridor.element)
                    .actual(whole_mm(width))
                    .expected(number_value(min_corridor)),
                );
            }
        }

        for stair in &stairs.records {
            let Some(width) = stair.width_mm else {
                continue;
            };
            if width < min_stair {
                violations.push(
                    Violation::error(format!(
                        "Stair width ({width:.0}mm) is less than minimum required ({min_stair}mm)"
                    ))
                    .on(&stair.element)
                    .actual(whole_mm(width))
                    .expected(number_value(min_stair)),
                );
            }
        }

        Ok(RuleResult::for_rule(self, config, violations)
            .with_metadata("doors_checked", doors.records.len())
            .with_metadata("corridors_checked", corridors_checked)
            .with_metadata("stairs_checked", stairs.records.len())
            .with_diagnostics(vec![
                doors.diagnostics,
                spaces.diagnostics,
                stairs.diagnostics,
            ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Severity;
    use ifc_compliance_model::{Entity, EntityGeometry, EntityId, IfcType, SnapshotModel};

    fn model() -> SnapshotModel {
        SnapshotModel::builder()
            .unit_scale(0.001)
            .entity(
                Entity::new(EntityId(1), IfcType::IfcDoor)
                    .with_name("D-01")
                    .with_attribute("OverallWidth", 800.0),
            )
            .entity(
                Entity::new(EntityId(2), IfcType::IfcDoor)
                    .with_name("D-02")
                    .with_attribute("OverallWidth", 900.0),
            )
            // no declared width: 820mm leaf in a 100mm wall
            .entity(Entity::new(EntityId(3), IfcType::IfcDoor).with_name("D-03"))
            .geometry(EntityGeometry::from_box([0.0; 3], [820.0, 100.0, 2100.0]))
            .entity(Entity::new(EntityId(4), IfcType::IfcSpace).with_name("Corridor 1"))
            .geometry(EntityGeometry::from_box([0.0; 3], [12000.0, 1100.0, 3000.0]))
            .entity(Entity::new(EntityId(5), IfcType::IfcSpace).with_name("Office"))
            .geometry(EntityGeometry::from_box([0.0; 3], [3000.0, 800.0, 3000.0]))
            .entity(Entity::new(EntityId(6), IfcType::IfcStair).with_name("Stair A"))
            .geometry(EntityGeometry::from_box([0.0; 3], [4000.0, 1100.0, 3000.0]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_egress_widths() {
        let config = RuleConfig::new("FS-002", Category::FireSafety);
        let result = EgressWidthRule.check(&model(), &config).unwrap();
        assert!(!result.passed());

        let found: Vec<_> = result
            .violations()
            .iter()
            .map(|v| (v.element_id.unwrap().0, v.severity))
            .collect();
        // the office is narrow but is not a corridor; the stair is wide enough
        assert_eq!(
            found,
            vec![(1, Severity::Error), (3, Severity::Warning), (4, Severity::Error)]
        );

        let door = &result.violations()[0];
        assert_eq!(door.actual_value, Some(serde_json::json!(800)));
        assert_eq!(door.expected_value, Some(serde_json::json!(850)));
        assert_eq!(result.violations()[1].actual_value, Some(serde_json::json!(820)));
        assert_eq!(result.violations()[2].actual_value, Some(serde_json::json!(1100)));
    }

    #[test]
    fn test_narrow_stair() {
        let model = SnapshotModel::builder()
            .entity(Entity::new(EntityId(6), IfcType::IfcStair))
            .geometry(EntityGeometry::from_box([0.0; 3], [3.0, 0.9, 3.0]))
            .build()
            .unwrap();
        let config = RuleConfig::new("FS-002", Category::FireSafety);
        let result = EgressWidthRule.check(&model, &config).unwrap();
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].element_type, "IfcStair");
        assert_eq!(result.violations()[0].actual_value, Some(serde_json::json!(900)));
    }
}
