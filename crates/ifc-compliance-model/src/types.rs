// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for model access

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type-safe entity identifier
///
/// Wraps the raw IFC entity ID (e.g., #123 becomes EntityId(123))
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// IFC entity type enumeration
///
/// Covers the spatial structure and the building elements compliance rules
/// look at. Anything else is kept as `Unknown` with its original name.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IfcType {
    // Spatial structure
    IfcProject,
    IfcSite,
    IfcBuilding,
    IfcBuildingStorey,
    IfcSpace,

    // Building elements
    IfcWall,
    IfcWallStandardCase,
    IfcCurtainWall,
    IfcSlab,
    IfcRoof,
    IfcBeam,
    IfcColumn,
    IfcDoor,
    IfcWindow,
    IfcStair,
    IfcStairFlight,
    IfcRamp,
    IfcRampFlight,
    IfcRailing,
    IfcOpeningElement,
    IfcBuildingElementProxy,

    /// Unknown type - stores the original type name string
    Unknown(String),
}

impl IfcType {
    /// Parse type name from string (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "IFCPROJECT" => IfcType::IfcProject,
            "IFCSITE" => IfcType::IfcSite,
            "IFCBUILDING" => IfcType::IfcBuilding,
            "IFCBUILDINGSTOREY" => IfcType::IfcBuildingStorey,
            "IFCSPACE" => IfcType::IfcSpace,

            "IFCWALL" => IfcType::IfcWall,
            "IFCWALLSTANDARDCASE" => IfcType::IfcWallStandardCase,
            "IFCCURTAINWALL" => IfcType::IfcCurtainWall,
            "IFCSLAB" => IfcType::IfcSlab,
            "IFCROOF" => IfcType::IfcRoof,
            "IFCBEAM" => IfcType::IfcBeam,
            "IFCCOLUMN" => IfcType::IfcColumn,
            "IFCDOOR" => IfcType::IfcDoor,
            "IFCWINDOW" => IfcType::IfcWindow,
            "IFCSTAIR" => IfcType::IfcStair,
            "IFCSTAIRFLIGHT" => IfcType::IfcStairFlight,
            "IFCRAMP" => IfcType::IfcRamp,
            "IFCRAMPFLIGHT" => IfcType::IfcRampFlight,
            "IFCRAILING" => IfcType::IfcRailing,
            "IFCOPENINGELEMENT" => IfcType::IfcOpeningElement,
            "IFCBUILDINGELEMENTPROXY" => IfcType::IfcBuildingElementProxy,

            _ => IfcType::Unknown(s.to_string()),
        }
    }

    /// Get the canonical IFC class name
    pub fn name(&self) -> &str {
        match self {
            IfcType::IfcProject => "IfcProject",
            IfcType::IfcSite => "IfcSite",
            IfcType::IfcBuilding => "IfcBuilding",
            IfcType::IfcBuildingStorey => "IfcBuildingStorey",
            IfcType::IfcSpace => "IfcSpace",
            IfcType::IfcWall => "IfcWall",
            IfcType::IfcWallStandardCase => "IfcWallStandardCase",
            IfcType::IfcCurtainWall => "IfcCurtainWall",
            IfcType::IfcSlab => "IfcSlab",
            IfcType::IfcRoof => "IfcRoof",
            IfcType::IfcBeam => "IfcBeam",
            IfcType::IfcColumn => "IfcColumn",
            IfcType::IfcDoor => "IfcDoor",
            IfcType::IfcWindow => "IfcWindow",
            IfcType::IfcStair => "IfcStair",
            IfcType::IfcStairFlight => "IfcStairFlight",
            IfcType::IfcRamp => "IfcRamp",
            IfcType::IfcRampFlight => "IfcRampFlight",
            IfcType::IfcRailing => "IfcRailing",
            IfcType::IfcOpeningElement => "IfcOpeningElement",
            IfcType::IfcBuildingElementProxy => "IfcBuildingElementProxy",
            IfcType::Unknown(s) => s,
        }
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<String> for IfcType {
    fn from(s: String) -> Self {
        IfcType::parse(&s)
    }
}

impl From<IfcType> for String {
    fn from(t: IfcType) -> Self {
        t.name().to_string()
    }
}

/// Scalar value of an attribute or property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    /// Numeric view of the value
    ///
    /// Text is parsed when it holds a number, which is how many exporters
    /// write measures into property sets.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) => None,
        }
    }

    /// Boolean view of the value, accepting STEP logical literals
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Text(s) => match s.trim().to_uppercase().as_str() {
                "TRUE" | ".T." | "YES" => Some(true),
                "FALSE" | ".F." | "NO" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for empty text, which IFC exporters use for "not set"
    pub fn is_blank(&self) -> bool {
        matches!(self, PropertyValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

/// A resolved model entity
///
/// Carries the IfcRoot / IfcObject attributes rules care about. Direct
/// attributes specific to a class (e.g. `OverallWidth` on IfcDoor) live in
/// `attributes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub ifc_type: IfcType,
    #[serde(default)]
    pub global_id: String,
    pub name: Option<String>,
    pub long_name: Option<String>,
    pub predefined_type: Option<String>,
    pub object_type: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, PropertyValue>,
}

impl Entity {
    /// Create a new entity with no optional attributes set
    pub fn new(id: EntityId, ifc_type: IfcType) -> Self {
        Self {
            id,
            ifc_type,
            global_id: String::new(),
            name: None,
            long_name: None,
            predefined_type: None,
            object_type: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    pub fn with_predefined_type(mut self, predefined_type: impl Into<String>) -> Self {
        self.predefined_type = Some(predefined_type.into());
        self
    }

    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = global_id.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get a direct attribute by name
    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }

    /// Name, falling back to LongName
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.long_name.as_deref())
    }
}

/// Model file metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4", "IFC4X3")
    #[serde(default)]
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Organization
    pub organization: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifc_type_parse_is_case_insensitive() {
        assert_eq!(IfcType::parse("IFCDOOR"), IfcType::IfcDoor);
        assert_eq!(IfcType::parse("IfcDoor"), IfcType::IfcDoor);
        assert_eq!(IfcType::parse("ifcbuildingstorey"), IfcType::IfcBuildingStorey);
        assert_eq!(
            IfcType::parse("IfcFurniture"),
            IfcType::Unknown("IfcFurniture".to_string())
        );
    }

    #[test]
    fn test_ifc_type_serde_uses_class_name() {
        let json = serde_json::to_string(&IfcType::IfcSpace).unwrap();
        assert_eq!(json, "\"IfcSpace\"");
        let back: IfcType = serde_json::from_str("\"IFCSPACE\"").unwrap();
        assert_eq!(back, IfcType::IfcSpace);
    }

    #[test]
    fn test_property_value_views() {
        assert_eq!(PropertyValue::Integer(900).as_f64(), Some(900.0));
        assert_eq!(PropertyValue::from("1.2").as_f64(), Some(1.2));
        assert_eq!(PropertyValue::from(".T.").as_bool(), Some(true));
        assert_eq!(PropertyValue::Float(1.0).as_bool(), None);
        assert!(PropertyValue::from("  ").is_blank());
    }

    #[test]
    fn test_property_value_untagged_decoding() {
        let values: Vec<PropertyValue> =
            serde_json::from_str(r#"[true, 3, 2.5, "EI 60"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Bool(true),
                PropertyValue::Integer(3),
                PropertyValue::Float(2.5),
                PropertyValue::Text("EI 60".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_name_falls_back_to_long_name() {
        let space = Entity::new(EntityId(7), IfcType::IfcSpace).with_long_name("Lobby");
        assert_eq!(space.display_name(), Some("Lobby"));
        assert_eq!(EntityId(7).to_string(), "#7");
    }
}
