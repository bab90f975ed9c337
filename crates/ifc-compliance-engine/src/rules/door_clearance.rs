// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ACC-002: accessible door clear width

use super::whole_mm;
use crate::config::{Category, RuleConfig};
use crate::extract::{DoorExtractor, Extractor};
use crate::identify::ElementClass;
use crate::rule::{number_value, Rule, RuleResult, Violation};
use crate::Result;
use ifc_compliance_model::IfcModel;

const DEFAULT_EXCLUDED: [&str; 2] = ["TRAPDOOR", "GATE"];

/// Clear opening width of doors, with a wider minimum for the main entrance
#[derive(Clone, Copy, Debug, Default)]
pub struct DoorClearanceRule;

impl Rule for DoorClearanceRule {
    fn rule_id(&self) -> &'static str {
        "ACC-002"
    }

    fn name(&self) -> &'static str {
        "Door Clear Width"
    }

    fn category(&self) -> Category {
        Category::Accessibility
    }

    fn config_file(&self) -> &'static str {
        "doors.yaml"
    }

    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult> {
        let min_clear: f64 = config.param("min_clear_width_mm", 850.0);
        let min_entrance: f64 = config.param("min_main_entrance_width_mm", 900.0);
        let excluded: Vec<String> = config
            .exclude_door_types
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCLUDED.iter().map(|t| t.to_string()).collect());
        let entrance_hints = config.hints(ElementClass::MainEntrance);

        let doors = DoorExtractor.extract(model);
        let mut violations = Vec::new();
        let mut checked = 0usize;
        let mut excluded_count = 0usize;

        for door in &doors.records {
            let is_excluded = door
                .door_type
                .as_deref()
                .is_some_and(|t| excluded.iter().any(|e| e.eq_ignore_ascii_case(t)));
            if is_excluded {
                excluded_count += 1;
                continue;
            }
            let Some(width) = door.width() else {
                continue;
            };
            checked += 1;

            let is_entrance = door.is(&entrance_hints);
            let required = if is_entrance { min_entrance } else { min_clear };
            if width.mm >= required {
                continue;
            }

            let subject = if is_entrance { "Main entrance door" } else { "Door" };
            let violation = if width.is_estimate() {
                Violation::warning(format!(
                    "{subject} estimated clear width ({:.0}mm) is less than minimum required for accessibility ({required}mm)",
                    width.mm
                ))
            } else {
                Violation::error(format!(
                    "{subject} clear width ({:.0}mm) is less than minimum required for accessibility ({required}mm)",
                    width.mm
                ))
            };
            violations.push(
                violation
                    .on(&door.element)
                    .actual(whole_mm(width.mm))
                    .expected(number_value(required)),
            );
        }

        Ok(RuleResult::for_rule(self, config, violations)
            .with_metadata("doors_checked", checked)
            .with_metadata("doors_excluded", excluded_count)
            .with_diagnostics(vec![doors.diagnostics]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Severity;
    use ifc_compliance_model::{Entity, EntityId, IfcType, PropertySet, SnapshotModel};

    fn door(id: u32, name: &str, width_mm: f64) -> Entity {
        Entity::new(EntityId(id), IfcType::IfcDoor)
            .with_name(name)
            .with_attribute("OverallWidth", width_mm)
    }

    fn model() -> SnapshotModel {
        SnapshotModel::builder()
            .unit_scale(0.001)
            .entity(door(1, "Main Entrance", 880.0))
            .entity(door(2, "Office 2.01", 880.0))
            .entity(door(3, "Store", 800.0))
            // declared clear width wins over the overall width
            .property_set(PropertySet::new("Pset_DoorCommon").with("ClearWidth", 860.0))
            .entity(door(4, "Roof hatch", 600.0).with_predefined_type("TRAPDOOR"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_door_clearance() {
        let config = RuleConfig::new("ACC-002", Category::Accessibility);
        let result = DoorClearanceRule.check(&model(), &config).unwrap();

        assert!(!result.passed());
        assert_eq!(result.violations().len(), 1);
        let violation = &result.violations()[0];
        assert_eq!(violation.element_id, Some(EntityId(1)));
        assert_eq!(violation.severity, Severity::Error);
        assert!(violation.message.starts_with("Main entrance door"));
        assert_eq!(violation.expected_value, Some(serde_json::json!(900)));
        assert_eq!(result.metadata()["doors_excluded"], 1);
        assert_eq!(result.metadata()["doors_checked"], 3);
    }

    #[test]
    fn test_configured_exclusions() {
        let mut config = RuleConfig::new("ACC-002", Category::Accessibility);
        config.exclude_door_types = Some(Vec::new());
        let result = DoorClearanceRule.check(&model(), &config).unwrap();
        let ids: Vec<_> = result.violations().iter().filter_map(|v| v.element_id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(4)]);
    }
}
