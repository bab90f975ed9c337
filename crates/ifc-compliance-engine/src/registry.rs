// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rule registry
//!
//! Maps categories and configuration file names to rule implementations.
//! Built once before a run and only read afterwards.

use crate::config::{Category, CategoryFilter};
use crate::rule::Rule;
use crate::rules::default_rules;
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Category and config-file lookup tables
#[derive(Clone, Default)]
pub struct RuleRegistry {
    by_category: BTreeMap<Category, Vec<Arc<dyn Rule>>>,
    by_config: BTreeMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every delivered rule
    pub fn with_default_rules() -> Self {
        let mut registry = Self::new();
        for rule in default_rules() {
            registry.register(rule);
        }
        registry
    }

    /// Add a rule under its category and config file name
    ///
    /// A rule registered for an already bound config file replaces the
    /// previous binding.
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        if let Some(previous) = self
            .by_config
            .insert(rule.config_file().to_string(), Arc::clone(&rule))
        {
            log::warn!(
                "{} replaces {} for {}",
                rule.rule_id(),
                previous.rule_id(),
                rule.config_file()
            );
            for rules in self.by_category.values_mut() {
                rules.retain(|r| r.config_file() != rule.config_file());
            }
        }
        self.by_category
            .entry(rule.category())
            .or_default()
            .push(rule);
    }

    /// Rules selected by a filter, category order then registration order
    pub fn resolve(&self, filter: &CategoryFilter) -> Vec<Arc<dyn Rule>> {
        filter
            .categories()
            .into_iter()
            .filter_map(|c| self.by_category.get(&c))
            .flatten()
            .cloned()
            .collect()
    }

    /// Rules for a category name, or `all`
    pub fn resolve_named(&self, category: &str) -> Result<Vec<Arc<dyn Rule>>> {
        let filter: CategoryFilter = category.parse()?;
        Ok(self.resolve(&filter))
    }

    /// Rule bound to a configuration file name
    pub fn resolve_by_config(&self, file_name: &str) -> Option<Arc<dyn Rule>> {
        self.by_config.get(file_name).cloned()
    }

    /// Rule by identifier
    pub fn get(&self, rule_id: &str) -> Option<Arc<dyn Rule>> {
        self.by_config
            .values()
            .find(|r| r.rule_id() == rule_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.by_config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_config.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.by_config.iter().map(|(file, rule)| (file, rule.rule_id())))
            .finish()
    }
}
