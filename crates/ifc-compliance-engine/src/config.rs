// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rule configuration
//!
//! One YAML file configures one rule instance:
//!
//! ```yaml
//! rule_id: ACC-001
//! name: Corridor Width
//! reference: "Code on Accessibility in the Built Environment, Clause 4.2"
//! parameters:
//!   min_width_mm: 1200
//!   min_width_turning_mm: 1500
//! corridor_identification:
//!   space_types: [CORRIDOR, HALLWAY]
//!   name_patterns: [corridor, hallway]
//! ```
//!
//! `rule_id` is required. Keys ending in `_identification` are read as
//! [`IdentificationHints`]; other unknown keys are ignored.

use crate::identify::{ElementClass, IdentificationHints};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Regulatory domain a rule belongs to
///
/// Declaration order is the order categories appear in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FireSafety,
    Accessibility,
    BuildingControl,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::FireSafety,
        Category::Accessibility,
        Category::BuildingControl,
    ];

    /// Config directory / report key for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FireSafety => "fire_safety",
            Category::Accessibility => "accessibility",
            Category::BuildingControl => "building_control",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Which categories a run covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Categories selected by this filter, in report order
    pub fn categories(&self) -> Vec<Category> {
        match self {
            CategoryFilter::All => Category::ALL.to_vec(),
            CategoryFilter::Only(c) => vec![*c],
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    /// `"all"` or a category name; anything else is `UnknownCategory`
    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "all" {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// A scalar or list parameter value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

/// Conversion from a [`ParamValue`] for typed parameter lookup
pub trait FromParam: Sized {
    fn from_param(value: &ParamValue) -> Option<Self>;
}

impl FromParam for f64 {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Integer(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Integer(i) => Some(*i),
            ParamValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

impl FromParam for bool {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromParam for String {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromParam for Vec<String> {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::List(items) => items.iter().map(String::from_param).collect(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawRuleConfig {
    rule_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    reference: Option<String>,
    category: Option<String>,
    parameters: Option<BTreeMap<String, ParamValue>>,
    exclude_door_types: Option<Vec<String>>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Immutable configuration of one rule instance
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleConfig {
    pub rule_id: String,
    pub name: String,
    pub description: String,
    pub reference: String,
    pub category: Category,
    pub parameters: BTreeMap<String, ParamValue>,
    /// Hint blocks by class key, e.g. `corridor` from `corridor_identification`
    pub identification: BTreeMap<String, IdentificationHints>,
    pub exclude_door_types: Option<Vec<String>>,
    /// File the configuration was read from
    pub source: PathBuf,
}

impl RuleConfig {
    /// Minimal configuration, used by tests and programmatic callers
    pub fn new(rule_id: impl Into<String>, category: Category) -> Self {
        Self {
            rule_id: rule_id.into(),
            name: String::new(),
            description: String::new(),
            reference: String::new(),
            category,
            parameters: BTreeMap::new(),
            identification: BTreeMap::new(),
            exclude_door_types: None,
            source: PathBuf::new(),
        }
    }

    /// Set a parameter, builder style
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path, category: Category) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content, category, path)
    }

    /// Parse configuration text found in `category`'s directory
    ///
    /// A `category` key in the file must agree with the directory.
    pub fn from_yaml_str(content: &str, category: Category, source: &Path) -> Result<Self> {
        let raw: RawRuleConfig =
            serde_yaml::from_str(content).map_err(|e| Error::config(source, e.to_string()))?;

        let rule_id = raw
            .rule_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::config(source, "missing required field 'rule_id'"))?;

        if let Some(declared) = raw.category.as_deref() {
            let declared: Category = declared
                .parse()
                .map_err(|_| Error::config(source, format!("unknown category '{declared}'")))?;
            if declared != category {
                return Err(Error::config(
                    source,
                    format!("declares category '{declared}' but lives under '{category}'"),
                ));
            }
        }

        let mut identification = BTreeMap::new();
        for (key, value) in raw.extra {
            let Some(class) = key.strip_suffix("_identification") else {
                continue;
            };
            let hints: IdentificationHints = serde_yaml::from_value(value)
                .map_err(|e| Error::config(source, format!("{key}: {e}")))?;
            identification.insert(class.to_string(), hints);
        }

        Ok(Self {
            rule_id,
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            reference: raw.reference.unwrap_or_default(),
            category,
            parameters: raw.parameters.unwrap_or_default(),
            identification,
            exclude_door_types: raw.exclude_door_types,
            source: source.to_path_buf(),
        })
    }

    /// Raw parameter value
    pub fn param_value(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Typed parameter with fallback
    ///
    /// Returns `default` when the parameter is absent, and also when it is
    /// present with a value of the wrong type (logged as a warning).
    pub fn param<T: FromParam>(&self, name: &str, default: T) -> T {
        match self.parameters.get(name) {
            None => default,
            Some(value) => T::from_param(value).unwrap_or_else(|| {
                log::warn!(
                    "{}: parameter '{}' has unexpected value {:?}, using default",
                    self.rule_id,
                    name,
                    value
                );
                default
            }),
        }
    }

    /// Identification hints for a class, falling back to the built-in set
    pub fn hints(&self, class: ElementClass) -> IdentificationHints {
        self.identification
            .get(class.key())
            .filter(|h| !h.is_empty())
            .cloned()
            .unwrap_or_else(|| class.default_hints())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDORS: &str = r#"
rule_id: ACC-001
name: Corridor Width
description: Minimum clear corridor width
reference: "Accessibility Code, Clause 4.2"
category: accessibility
parameters:
  min_width_mm: 1200
  min_width_turning_mm: 1500.5
  strict: true
  mode: graph
corridor_identification:
  space_types: [CORRIDOR, LOBBY]
  name_patterns: [corridor]
reviewer_notes: ignored
"#;

    fn parse(content: &str, category: Category) -> Result<RuleConfig> {
        RuleConfig::from_yaml_str(content, category, Path::new("corridors.yaml"))
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(CORRIDORS, Category::Accessibility).unwrap();
        assert_eq!(config.rule_id, "ACC-001");
        assert_eq!(config.name, "Corridor Width");
        assert_eq!(config.reference, "Accessibility Code, Clause 4.2");
        assert_eq!(config.param("min_width_mm", 0.0), 1200.0);
        assert_eq!(config.param("min_width_turning_mm", 0.0), 1500.5);
        assert!(config.param("strict", false));
        assert_eq!(config.param("mode", String::new()), "graph");

        let hints = config.hints(ElementClass::Corridor);
        assert_eq!(hints.types, vec!["CORRIDOR", "LOBBY"]);
        assert_eq!(hints.name_patterns, vec!["corridor"]);
    }

    #[test]
    fn test_param_defaults() {
        let config = parse("rule_id: X-1\n", Category::FireSafety).unwrap();
        assert_eq!(config.param("max_distance_m", 45.0), 45.0);
        assert!(config.parameters.is_empty());

        // wrong type falls back
        let config = parse(CORRIDORS, Category::Accessibility).unwrap();
        assert_eq!(config.param("mode", 7_i64), 7);
    }

    #[test]
    fn test_default_hints_when_absent() {
        let config = parse("rule_id: ACC-002\n", Category::Accessibility).unwrap();
        assert_eq!(
            config.hints(ElementClass::MainEntrance),
            ElementClass::MainEntrance.default_hints()
        );
    }

    #[test]
    fn test_missing_rule_id_is_config_error() {
        let err = parse("name: Nameless\nparameters: {}\n", Category::FireSafety).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        let err = parse("rule_id: '  '\n", Category::FireSafety).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = parse("rule_id: [unterminated\n", Category::FireSafety).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_category_mismatch() {
        let err = parse(CORRIDORS, Category::FireSafety).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("fire_safety".parse::<Category>().unwrap(), Category::FireSafety);
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "building_control".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::BuildingControl)
        );
        assert!(matches!(
            "plumbing".parse::<CategoryFilter>(),
            Err(Error::UnknownCategory(c)) if c == "plumbing"
        ));
        assert_eq!(CategoryFilter::All.categories(), Category::ALL.to_vec());
    }
}
