// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ACC-001: accessible corridor width

use super::whole_mm;
use crate::config::{Category, RuleConfig};
use crate::extract::{Extractor, SpaceExtractor};
use crate::identify::ElementClass;
use crate::rule::{number_value, Rule, RuleResult, Violation};
use crate::Result;
use ifc_compliance_model::IfcModel;

/// Corridors must be wide enough for a wheelchair, and should be wide
/// enough to turn one
#[derive(Clone, Copy, Debug, Default)]
pub struct CorridorWidthRule;

impl Rule for CorridorWidthRule {
    fn rule_id(&self) -> &'static str {
        "ACC-001"
    }

    fn name(&self) -> &'static str {
        "Corridor Width"
    }

    fn category(&self) -> Category {
        Category::Accessibility
    }

    fn config_file(&self) -> &'static str {
        "corridors.yaml"
    }

    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult> {
        let min_width: f64 = config.param("min_width_mm", 1200.0);
        let min_turning: f64 = config.param("min_width_turning_mm", 1500.0);
        let hints = config.hints(ElementClass::Corridor);

        let spaces = SpaceExtractor.extract(model);
        let mut violations = Vec::new();
        let mut checked = 0usize;

        for corridor in spaces.records.iter().filter(|s| s.is(&hints)) {
            let Some(width) = corridor.width_mm() else {
                continue;
            };
            checked += 1;

            if width < min_width {
                violations.push(
                    Violation::error(format!(
                        "Corridor width ({width:.0}mm) is less than minimum required for accessibility ({min_width}mm)"
                    ))
                    .on(&corridor.element)
                    .actual(whole_mm(width))
                    .expected(number_value(min_width)),
                );
            } else if width < min_turning {
                violations.push(
                    Violation::warning(format!(
                        "Corridor width ({width:.0}mm) is below recommended width for wheelchair turning ({min_turning}mm)"
                    ))
                    .on(&corridor.element)
                    .actual(whole_mm(width))
                    .expected(number_value(min_turning)),
                );
            }
        }

        Ok(RuleResult::for_rule(self, config, violations)
            .with_metadata("corridors_checked", checked)
            .with_diagnostics(vec![spaces.diagnostics]))
    }
}
