// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FS-001: travel distance to the nearest exit

use crate::config::{Category, RuleConfig};
use crate::extract::{build_egress_graph, DoorExtractor, DoorRecord, Extractor, SpaceExtractor};
use crate::identify::ElementClass;
use crate::rule::{number_value, round_to, Rule, RuleResult, Violation};
use crate::{Error, Result};
use ifc_compliance_geometry::distance;
use ifc_compliance_model::{EntityId, IfcModel, IfcType, PropertyValue};

/// How travel distance is measured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMode {
    /// Straight line from space centroid to door centroid
    StraightLine,
    /// Shortest walk through the space/door connectivity graph
    Graph,
}

impl PathMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathMode::StraightLine => "straight_line",
            PathMode::Graph => "graph",
        }
    }

    fn from_config(config: &RuleConfig) -> Result<Self> {
        let mode: String = config.param("path_mode", "straight_line".to_string());
        match mode.as_str() {
            "straight_line" => Ok(PathMode::StraightLine),
            "graph" => Ok(PathMode::Graph),
            other => Err(Error::rule(
                config.rule_id.as_str(),
                format!("unknown path_mode '{other}'"),
            )),
        }
    }
}

/// Maximum travel distance from every space to its nearest exit
///
/// The limit depends on sprinkler protection, read from
/// `Pset_BuildingCommon.SprinklerProtection` on the building and falling
/// back to the `default_sprinklered` parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TravelDistanceRule;

impl Rule for TravelDistanceRule {
    fn rule_id(&self) -> &'static str {
        "FS-001"
    }

    fn name(&self) -> &'static str {
        "Maximum Travel Distance"
    }

    fn category(&self) -> Category {
        Category::FireSafety
    }

    fn config_file(&self) -> &'static str {
        "travel_distance.yaml"
    }

    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult> {
        let mode = PathMode::from_config(config)?;
        let sprinklered = sprinkler_protection(model)
            .unwrap_or_else(|| config.param("default_sprinklered", true));
        let max_distance = if sprinklered {
            config.param("max_distance_sprinklered_m", 60.0)
        } else {
            config.param("max_distance_unsprinklered_m", 45.0)
        };

        let spaces = SpaceExtractor.extract(model);
        let doors = DoorExtractor.extract(model);
        let diagnostics = vec![spaces.diagnostics.clone(), doors.diagnostics.clone()];

        let exits = exit_doors(&doors.records, config);
        if exits.is_empty() {
            return Ok(RuleResult::for_rule(self, config, Vec::new())
                .with_metadata("note", "No exit doors found - travel distance check skipped")
                .with_diagnostics(diagnostics));
        }

        let graph = match mode {
            PathMode::Graph => Some(build_egress_graph(
                model,
                &spaces.records,
                &doors.records,
                config.param("connection_tolerance_m", 0.05),
            )),
            PathMode::StraightLine => None,
        };
        let exit_ids: Vec<EntityId> = exits.iter().map(|d| d.element.element_id).collect();

        let mut violations = Vec::new();
        let mut checked = 0usize;
        for space in &spaces.records {
            let Some(centroid) = space.element.geometry.centroid else {
                continue;
            };
            checked += 1;

            let nearest = match &graph {
                Some(graph) => graph
                    .nearest_target(&space.element.element_id, &exit_ids)
                    .map(|path| path.distance),
                None => exits
                    .iter()
                    .filter_map(|d| d.element.geometry.centroid)
                    .map(|exit| distance(&centroid, &exit))
                    .min_by(f64::total_cmp),
            };

            match nearest {
                None => violations.push(
                    Violation::warning("No walkable route from space to any exit")
                        .on(&space.element)
                        .expected(number_value(max_distance)),
                ),
                Some(d) if d > max_distance => violations.push(
                    Violation::error(format!(
                        "Travel distance to nearest exit ({d:.1}m) exceeds maximum allowed ({max_distance}m)"
                    ))
                    .on(&space.element)
                    .actual(number_value(round_to(d, 2)))
                    .expected(number_value(max_distance)),
                ),
                Some(_) => {}
            }
        }

        Ok(RuleResult::for_rule(self, config, violations)
            .with_metadata("path_mode", mode.as_str())
            .with_metadata("sprinklered", sprinklered)
            .with_metadata("max_distance_m", number_value(max_distance))
            .with_metadata("spaces_checked", checked)
            .with_metadata("exits", exit_ids.len())
            .with_diagnostics(diagnostics))
    }
}

/// External or exit-classified doors, all doors when none qualify
fn exit_doors<'a>(doors: &'a [DoorRecord], config: &RuleConfig) -> Vec<&'a DoorRecord> {
    let hints = config.hints(ElementClass::FireExit);
    let located = |d: &&DoorRecord| d.element.geometry.centroid.is_some();

    let exits: Vec<&DoorRecord> = doors
        .iter()
        .filter(|d| d.is_external || d.is(&hints))
        .filter(located)
        .collect();
    if exits.is_empty() {
        doors.iter().filter(located).collect()
    } else {
        exits
    }
}

fn sprinkler_protection(model: &dyn IfcModel) -> Option<bool> {
    model
        .resolver()
        .entities_by_type(&IfcType::IfcBuilding)
        .iter()
        .find_map(|building| {
            model
                .properties()
                .get_pset_property(building.id, "Pset_BuildingCommon", "SprinklerProtection")
                .and_then(|p| PropertyValue::as_bool(&p.value))
        })
}
