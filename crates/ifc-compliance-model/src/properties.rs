// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property sets and base quantities

use crate::{EntityId, PropertyValue};
use serde::{Deserialize, Serialize};

/// One named value of a property set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
    /// Declared unit, when the exporter wrote one
    #[serde(default)]
    pub unit: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Property {
            name: name.into(),
            value: value.into(),
            unit: None,
        }
    }
}

/// `Pset_*` style group of properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// e.g. `Pset_DoorCommon`
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl PropertySet {
    pub fn new(name: impl Into<String>) -> Self {
        PropertySet {
            name: name.into(),
            properties: vec![],
        }
    }

    /// Append a property, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Property by exact name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name == name)
    }
}

/// Kind of an element quantity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityType {
    Length,
    Area,
    Volume,
    Count,
}

/// Base quantity such as `NetFloorArea`, in file units
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub name: String,
    pub value: f64,
    pub quantity_type: QuantityType,
    /// Quantity set, e.g. `Qto_SpaceBaseQuantities`
    #[serde(default)]
    pub set_name: Option<String>,
}

impl Quantity {
    pub fn new(name: impl Into<String>, value: f64, kind: QuantityType) -> Self {
        Quantity {
            name: name.into(),
            value,
            quantity_type: kind,
            set_name: None,
        }
    }
}

/// Read access to property sets and quantities
///
/// # Example
///
/// ```ignore
/// use ifc_compliance_model::{PropertyReader, EntityId};
///
/// fn is_external(props: &dyn PropertyReader, door: EntityId) -> bool {
///     props
///         .get_pset_property(door, "Pset_DoorCommon", "IsExternal")
///         .and_then(|p| p.value.as_bool())
///         .unwrap_or(false)
/// }
/// ```
pub trait PropertyReader: Send + Sync {
    /// Property sets of an entity, in document order
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet>;

    /// Quantities of an entity, in document order
    fn quantities(&self, id: EntityId) -> Vec<Quantity>;

    /// First property called `name` in any of the entity's sets
    fn get_property(&self, id: EntityId, name: &str) -> Option<Property> {
        self.property_sets(id)
            .into_iter()
            .find_map(|set| set.properties.into_iter().find(|prop| prop.name == name))
    }

    /// Property `name` of set `pset`
    fn get_pset_property(&self, id: EntityId, pset: &str, name: &str) -> Option<Property> {
        let set = self.property_sets(id).into_iter().find(|set| set.name == pset)?;
        set.properties.into_iter().find(|prop| prop.name == name)
    }

    fn get_quantity(&self, id: EntityId, name: &str) -> Option<Quantity> {
        self.quantities(id)
            .into_iter()
            .find(|quantity| quantity.name == name)
    }
}
