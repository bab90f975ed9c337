// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element classification from configured hints
//!
//! Whether a space is a corridor or a door is a main entrance is decided
//! by data, not code: a hint set lists type tags and name fragments, and an
//! element matches when any of its tags equals a listed type or any of its
//! names contains a listed fragment (both case-insensitive).

use serde::{Deserialize, Serialize};

/// Type tags and name patterns identifying one class of element
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationHints {
    /// Type tags (PredefinedType, ObjectType, category property)
    #[serde(default, alias = "space_types", alias = "element_types")]
    pub types: Vec<String>,
    /// Case-insensitive name fragments
    #[serde(default)]
    pub name_patterns: Vec<String>,
    /// Type tags that veto a match
    #[serde(default)]
    pub exclude_types: Vec<String>,
}

impl IdentificationHints {
    pub fn new<S: Into<String>>(
        types: impl IntoIterator<Item = S>,
        name_patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            name_patterns: name_patterns.into_iter().map(Into::into).collect(),
            exclude_types: Vec::new(),
        }
    }

    /// True when the set carries no positive hints
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.name_patterns.is_empty()
    }

    /// Classify an element from its type tags and names
    pub fn matches<'a>(
        &self,
        tags: impl IntoIterator<Item = &'a str> + Clone,
        names: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        let tag_in = |list: &[String]| {
            tags.clone()
                .into_iter()
                .any(|tag| list.iter().any(|t| t.eq_ignore_ascii_case(tag.trim())))
        };

        if tag_in(&self.exclude_types) {
            return false;
        }
        if tag_in(&self.types) {
            return true;
        }

        names.into_iter().any(|name| {
            let name = name.to_lowercase();
            self.name_patterns
                .iter()
                .any(|p| !p.is_empty() && name.contains(&p.to_lowercase()))
        })
    }
}

/// Element classes rules need to recognize
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Corridor,
    FireExit,
    MainEntrance,
}

impl ElementClass {
    /// Prefix of the `<key>_identification` configuration block
    pub fn key(&self) -> &'static str {
        match self {
            ElementClass::Corridor => "corridor",
            ElementClass::FireExit => "fire_exit",
            ElementClass::MainEntrance => "main_entrance",
        }
    }

    /// Built-in hints used when a configuration supplies none
    pub fn default_hints(&self) -> IdentificationHints {
        match self {
            ElementClass::Corridor => IdentificationHints::new(
                ["CORRIDOR", "HALLWAY", "PASSAGE"],
                ["corridor", "hallway", "passage"],
            ),
            ElementClass::FireExit => IdentificationHints::new(
                ["EMERGENCY_EXIT", "FIRE_EXIT"],
                ["exit", "escape", "egress"],
            ),
            ElementClass::MainEntrance => IdentificationHints::new(
                Vec::<&str>::new(),
                vec!["main", "entrance", "entry", "lobby"],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_type_tag_case_insensitive() {
        let hints = ElementClass::Corridor.default_hints();
        assert!(hints.matches(["corridor"], []));
        assert!(hints.matches(["USERDEFINED", "Hallway"], []));
        // tags compare whole, not as substrings
        assert!(!hints.matches(["CORRIDOR_STORAGE"], []));
    }

    #[test]
    fn test_matches_name_substring() {
        let hints = ElementClass::Corridor.default_hints();
        assert!(hints.matches([], ["L2 Main Corridor"]));
        assert!(hints.matches(["OFFICE"], ["Office", "Passage to lift"]));
        assert!(!hints.matches(["OFFICE"], ["Office 2.01"]));
    }

    #[test]
    fn test_exclude_types_veto() {
        let mut hints = ElementClass::Corridor.default_hints();
        hints.exclude_types.push("SHAFT".to_string());
        assert!(!hints.matches(["shaft"], ["Corridor shaft"]));
    }

    #[test]
    fn test_hints_from_yaml_aliases() {
        let hints: IdentificationHints =
            serde_yaml::from_str("space_types: [CORRIDOR]\nname_patterns: [gang]\n").unwrap();
        assert_eq!(hints.types, vec!["CORRIDOR"]);
        assert!(hints.matches([], ["Gang 3"]));

        let empty: IdentificationHints = serde_yaml::from_str("{}").unwrap();
        assert!(empty.is_empty());
        assert!(!empty.matches(["CORRIDOR"], ["corridor"]));
    }
}
