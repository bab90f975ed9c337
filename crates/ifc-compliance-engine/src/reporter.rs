// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compliance report aggregation
//!
//! Pure functions of the rule results: no model access, no IO. Writing the
//! report out is left to the caller.

use crate::config::Category;
use crate::rule::{RuleResult, Severity};
use crate::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const GENERATOR: &str = "IFC Rule Engine - Singapore Code of Practice";
pub const GENERATOR_VERSION: &str = "1.0.0";

/// Full JSON report
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub report_metadata: ReportMetadata,
    pub summary: ReportSummary,
    /// Categories in report order; a category appears once any of its
    /// rules ran
    pub results_by_category: BTreeMap<Category, Vec<RuleResult>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generator: String,
    pub generator_version: String,
    pub model_path: String,
    /// Caller supplied entries, merged alongside the fixed fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_rules_checked: usize,
    pub rules_passed: usize,
    pub rules_failed: usize,
    /// Percentage of rules passed, 0 when nothing ran
    pub compliance_rate: f64,
    pub total_violations: usize,
    pub violations_by_severity: SeverityCounts,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

/// Short summary for console output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_rules: usize,
    pub passed: usize,
    pub failed: usize,
    pub compliance_rate: f64,
    pub failed_rules: Vec<FailedRule>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailedRule {
    pub rule_id: String,
    pub name: String,
    pub violations: usize,
}

/// Report builder
#[derive(Clone, Debug)]
pub struct Reporter {
    /// Keep passing rules in `results_by_category`
    pub include_passed_rules: bool,
    pub extra_metadata: Map<String, Value>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            include_passed_rules: true,
            extra_metadata: Map::new(),
        }
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passed_rules(mut self, include: bool) -> Self {
        self.include_passed_rules = include;
        self
    }

    /// Add an entry to `report_metadata`; fixed fields cannot be replaced
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_metadata.insert(key.into(), value.into());
        self
    }

    /// Build a report stamped with the current time
    pub fn generate(&self, model_path: &str, results: &[RuleResult]) -> ComplianceReport {
        self.generate_at(model_path, results, Utc::now())
    }

    /// Build a report with a fixed timestamp
    pub fn generate_at(
        &self,
        model_path: &str,
        results: &[RuleResult],
        generated_at: DateTime<Utc>,
    ) -> ComplianceReport {
        let passed = results.iter().filter(|r| r.passed()).count();

        let mut violations_by_severity = SeverityCounts::default();
        for v in results.iter().flat_map(|r| r.violations()) {
            match v.severity {
                Severity::Error => violations_by_severity.error += 1,
                Severity::Warning => violations_by_severity.warning += 1,
                Severity::Info => violations_by_severity.info += 1,
            }
        }

        let mut results_by_category: BTreeMap<Category, Vec<RuleResult>> = BTreeMap::new();
        for result in results {
            let entry = results_by_category.entry(result.category()).or_default();
            if self.include_passed_rules || !result.passed() {
                entry.push(result.clone());
            }
        }

        let fixed = ["generated_at", "generator", "generator_version", "model_path"];
        let extra = self
            .extra_metadata
            .iter()
            .filter(|(k, _)| !fixed.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        ComplianceReport {
            report_metadata: ReportMetadata {
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                generator: GENERATOR.to_string(),
                generator_version: GENERATOR_VERSION.to_string(),
                model_path: model_path.to_string(),
                extra,
            },
            summary: ReportSummary {
                total_rules_checked: results.len(),
                rules_passed: passed,
                rules_failed: results.len() - passed,
                compliance_rate: compliance_rate(passed, results.len()),
                total_violations: results.iter().map(|r| r.violations().len()).sum(),
                violations_by_severity,
            },
            results_by_category,
        }
    }

    /// Minimal summary: counts and the failed rules
    pub fn summary(&self, results: &[RuleResult]) -> RunSummary {
        let passed = results.iter().filter(|r| r.passed()).count();
        RunSummary {
            total_rules: results.len(),
            passed,
            failed: results.len() - passed,
            compliance_rate: compliance_rate(passed, results.len()),
            failed_rules: results
                .iter()
                .filter(|r| !r.passed())
                .map(|r| FailedRule {
                    rule_id: r.rule_id().to_string(),
                    name: r.name().to_string(),
                    violations: r.violations().len(),
                })
                .collect(),
        }
    }

    /// One console line per violation
    pub fn format_violation_messages(
        &self,
        result: &RuleResult,
        include_location: bool,
    ) -> Vec<String> {
        result
            .violations()
            .iter()
            .map(|v| {
                let mut line = format!(
                    "[{}] {}: {}",
                    v.severity.as_str().to_uppercase(),
                    result.rule_id(),
                    v.message
                );
                if let Some(name) = &v.element_name {
                    line.push_str(&format!(" (Element: {name})"));
                }
                if let Some(loc) = v.location.filter(|_| include_location) {
                    line.push_str(&format!(" @ ({:.2}, {:.2}, {:.2})", loc.x, loc.y, loc.z));
                }
                line
            })
            .collect()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self, report: &ComplianceReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

fn compliance_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Violation;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use ifc_compliance_geometry::Point3;

    fn results() -> Vec<RuleResult> {
        vec![
            RuleResult::new("FS-001", "Travel", Category::FireSafety, "", vec![]),
            RuleResult::new(
                "ACC-001",
                "Corridors",
                Category::Accessibility,
                "",
                vec![
                    Violation::error("too narrow").at(Point3::new(1.0, 2.5, 0.0)),
                    Violation::warning("tight turn"),
                ],
            ),
            RuleResult::new(
                "ACC-002",
                "Doors",
                Category::Accessibility,
                "",
                vec![Violation::info("estimated")],
            ),
        ]
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let report = Reporter::new().generate_at("model.json", &results(), timestamp());
        let summary = &report.summary;
        assert_eq!(summary.total_rules_checked, 3);
        assert_eq!(summary.rules_passed, 2);
        assert_eq!(summary.rules_failed, 1);
        assert_relative_eq!(summary.compliance_rate, 200.0 / 3.0, epsilon = 1e-9);
        assert_eq!(summary.total_violations, 3);
        assert_eq!(
            summary.violations_by_severity,
            SeverityCounts {
                error: 1,
                warning: 1,
                info: 1
            }
        );
    }

    #[test]
    fn test_empty_run() {
        let report = Reporter::new().generate_at("model.json", &[], timestamp());
        assert_eq!(report.summary.compliance_rate, 0.0);
        assert!(report.results_by_category.is_empty());
    }

    #[test]
    fn test_report_shape() {
        let report = Reporter::new()
            .with_metadata("ruleset", "SG-2024")
            .with_metadata("generator", "ignored")
            .generate_at("model.json", &results(), timestamp());
        let json = serde_json::to_value(&report).unwrap();

        let meta = &json["report_metadata"];
        assert_eq!(meta["generated_at"], "2024-03-01T09:30:00Z");
        assert_eq!(meta["generator"], GENERATOR);
        assert_eq!(meta["generator_version"], "1.0.0");
        assert_eq!(meta["model_path"], "model.json");
        assert_eq!(meta["ruleset"], "SG-2024");

        let categories: Vec<_> = json["results_by_category"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(categories, vec!["accessibility", "fire_safety"]);
        assert_eq!(json["results_by_category"]["accessibility"][0]["rule_id"], "ACC-001");
        assert_eq!(json["summary"]["violations_by_severity"]["warning"], 1);
    }

    #[test]
    fn test_failed_only() {
        let report = Reporter::new()
            .with_passed_rules(false)
            .generate_at("model.json", &results(), timestamp());
        assert!(report.results_by_category[&Category::FireSafety].is_empty());
        assert_eq!(report.results_by_category[&Category::Accessibility].len(), 1);
        // the summary still counts every rule
        assert_eq!(report.summary.total_rules_checked, 3);
    }

    #[test]
    fn test_minimal_summary_and_messages() {
        let reporter = Reporter::new();
        let results = results();
        let summary = reporter.summary(&results);
        assert_eq!(summary.failed_rules.len(), 1);
        assert_eq!(summary.failed_rules[0].rule_id, "ACC-001");
        assert_eq!(summary.failed_rules[0].violations, 2);

        let lines = reporter.format_violation_messages(&results[1], true);
        assert_eq!(lines[0], "[ERROR] ACC-001: too narrow @ (1.00, 2.50, 0.00)");
        assert_eq!(lines[1], "[WARNING] ACC-001: tight turn");
        let lines = reporter.format_violation_messages(&results[1], false);
        assert_eq!(lines[0], "[ERROR] ACC-001: too narrow");
    }
}
