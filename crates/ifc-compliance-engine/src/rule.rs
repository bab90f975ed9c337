// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rule contract and result types

use crate::config::{Category, FromParam, RuleConfig};
use crate::extract::{ElementRecord, ExtractionDiagnostics};
use crate::Result;
use ifc_compliance_geometry::Point3;
use ifc_compliance_model::{EntityId, IfcModel};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Violation severity, ordered `Info < Warning < Error`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point in model space, meters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Point3<f64>> for Location {
    fn from(p: Point3<f64>) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

/// JSON number, written as an integer when the value is whole
pub fn number_value(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}

/// Round to `digits` decimal places
pub fn round_to(v: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (v * factor).round() / factor
}

/// One detected non-compliance
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    pub element_id: Option<EntityId>,
    pub element_type: String,
    pub element_name: Option<String>,
    pub message: String,
    pub location: Option<Location>,
    pub severity: Severity,
    pub actual_value: Option<Value>,
    pub expected_value: Option<Value>,
}

impl Violation {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            element_id: None,
            element_type: String::new(),
            element_name: None,
            message: message.into(),
            location: None,
            severity,
            actual_value: None,
            expected_value: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Attach the offending element, its name and its centroid
    pub fn on(mut self, element: &ElementRecord) -> Self {
        self.element_id = Some(element.element_id);
        self.element_type = element.element_type.name().to_string();
        self.element_name = element.display_name().map(str::to_string);
        self.location = element.geometry.centroid.map(Location::from);
        self
    }

    /// Attach an element known only by id, type and name
    pub fn on_entity(mut self, id: EntityId, element_type: &str, name: Option<&str>) -> Self {
        self.element_id = Some(id);
        self.element_type = element_type.to_string();
        self.element_name = name.map(str::to_string);
        self
    }

    pub fn at(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn actual(mut self, value: impl Into<Value>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    pub fn expected(mut self, value: impl Into<Value>) -> Self {
        self.expected_value = Some(value.into());
        self
    }
}

/// Outcome of one rule execution
///
/// `passed` is derived from the violations when the result is built and
/// the violations cannot be changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleResult {
    rule_id: String,
    name: String,
    category: Category,
    reference: String,
    passed: bool,
    violations: Vec<Violation>,
    metadata: BTreeMap<String, Value>,
    diagnostics: Vec<ExtractionDiagnostics>,
}

impl RuleResult {
    pub fn new(
        rule_id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        reference: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        let passed = !violations.iter().any(|v| v.severity >= Severity::Error);
        Self {
            rule_id: rule_id.into(),
            name: name.into(),
            category,
            reference: reference.into(),
            passed,
            violations,
            metadata: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Result for `rule` run under `config`
    pub fn for_rule(rule: &dyn Rule, config: &RuleConfig, violations: Vec<Violation>) -> Self {
        let name = if config.name.is_empty() {
            rule.name()
        } else {
            config.name.as_str()
        };
        Self::new(
            config.rule_id.as_str(),
            name,
            rule.category(),
            config.reference.as_str(),
            violations,
        )
    }

    /// Failed result carrying one synthetic error describing a crash
    pub fn failure(rule: &dyn Rule, config: &RuleConfig, message: impl Into<String>) -> Self {
        let violation = Violation::error(format!(
            "Rule execution failed: {}",
            message.into()
        ));
        let mut result = Self::for_rule(rule, config, vec![violation]);
        result
            .metadata
            .insert("execution_error".to_string(), Value::Bool(true));
        result
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<ExtractionDiagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Extractor diagnostics gathered while checking; not part of reports
    pub fn diagnostics(&self) -> &[ExtractionDiagnostics] {
        &self.diagnostics
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

impl Serialize for RuleResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RuleResult", 8)?;
        s.serialize_field("rule_id", &self.rule_id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("category", &self.category)?;
        s.serialize_field("reference", &self.reference)?;
        s.serialize_field("passed", &self.passed)?;
        s.serialize_field("violation_count", &self.violations.len())?;
        s.serialize_field("violations", &self.violations)?;
        s.serialize_field("metadata", &self.metadata)?;
        s.end()
    }
}

/// A compliance check
///
/// Rules are stateless: everything they need arrives through `check`,
/// so one instance serves any number of configurations and runs.
pub trait Rule: Send + Sync {
    /// Identifier of the requirement, e.g. `FS-001`
    fn rule_id(&self) -> &'static str;

    /// Display name used when the configuration has none
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Configuration file name this rule is bound to
    fn config_file(&self) -> &'static str;

    /// Check the model against one configuration
    fn check(&self, model: &dyn IfcModel, config: &RuleConfig) -> Result<RuleResult>;
}

/// A rule paired with the configuration it runs under
#[derive(Clone)]
pub struct BoundRule {
    pub rule: Arc<dyn Rule>,
    pub config: RuleConfig,
}

impl BoundRule {
    pub fn new(rule: Arc<dyn Rule>, config: RuleConfig) -> Self {
        Self { rule, config }
    }

    pub fn rule_id(&self) -> &str {
        &self.config.rule_id
    }

    /// Typed parameter of the bound configuration
    pub fn get_param<T: FromParam>(&self, name: &str, default: T) -> T {
        self.config.param(name, default)
    }

    pub fn check(&self, model: &dyn IfcModel) -> Result<RuleResult> {
        self.rule.check(model, &self.config)
    }
}

impl fmt::Debug for BoundRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRule")
            .field("rule_id", &self.config.rule_id)
            .field("source", &self.config.source)
            .finish()
    }
}
