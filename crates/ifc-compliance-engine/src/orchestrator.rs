// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run orchestration
//!
//! Discovers configuration files under `<config_dir>/<category>/`, binds
//! each to its registered rule and runs the bound rules one after another
//! against a shared, read-only model. A rule that fails or panics yields a
//! failed result and the run carries on.

use crate::config::{Category, CategoryFilter, RuleConfig};
use crate::extract::ExtractionDiagnostics;
use crate::registry::RuleRegistry;
use crate::rule::{BoundRule, RuleResult};
use crate::{Error, Result};
use ifc_compliance_model::IfcModel;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A configuration file that was not turned into a rule
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub reason: String,
}

/// Bound rules ready to run, plus the files left out
#[derive(Debug, Default)]
pub struct LoadedRules {
    pub rules: Vec<BoundRule>,
    pub skipped: Vec<SkippedConfig>,
}

/// Everything a run produced
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// One result per bound rule, in execution order
    pub results: Vec<RuleResult>,
    pub skipped: Vec<SkippedConfig>,
}

impl RunOutcome {
    /// Extractor diagnostics keyed by the rule that gathered them
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &ExtractionDiagnostics)> {
        self.results
            .iter()
            .flat_map(|r| r.diagnostics().iter().map(move |d| (r.rule_id(), d)))
    }
}

/// Sequential rule runner
#[derive(Debug)]
pub struct Orchestrator {
    registry: RuleRegistry,
    verbose: bool,
}

impl Orchestrator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            verbose: false,
        }
    }

    /// Log extractor diagnostics at info level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// YAML files per selected category, sorted by file name
    ///
    /// A missing configuration directory is an error; a missing category
    /// directory just contributes nothing.
    pub fn discover_configs(
        &self,
        config_dir: &Path,
        filter: &CategoryFilter,
    ) -> Result<Vec<(Category, PathBuf)>> {
        if !config_dir.is_dir() {
            return Err(Error::config(
                config_dir,
                "configuration directory not found",
            ));
        }

        let mut found = Vec::new();
        for category in filter.categories() {
            let dir = config_dir.join(category.as_str());
            if !dir.is_dir() {
                debug!("No config directory for {category}");
                continue;
            }

            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_yaml(entry.path()) {
                    found.push((category, entry.into_path()));
                }
            }
        }
        Ok(found)
    }

    /// Parse discovered configurations and bind them to registered rules
    pub fn load_rules(&self, config_dir: &Path, filter: &CategoryFilter) -> Result<LoadedRules> {
        let mut loaded = LoadedRules::default();
        let mut seen_ids = FxHashSet::default();

        for (category, path) in self.discover_configs(config_dir, filter)? {
            match self.bind(category, &path, &mut seen_ids) {
                Ok(bound) => {
                    debug!("Loaded {} from {}", bound.rule_id(), path.display());
                    loaded.rules.push(bound);
                }
                Err(reason) => {
                    warn!("Skipping {}: {}", path.display(), reason);
                    loaded.skipped.push(SkippedConfig { path, reason });
                }
            }
        }

        info!(
            "Loaded {} rule(s), skipped {} config file(s)",
            loaded.rules.len(),
            loaded.skipped.len()
        );
        Ok(loaded)
    }

    fn bind(
        &self,
        category: Category,
        path: &Path,
        seen_ids: &mut FxHashSet<String>,
    ) -> std::result::Result<BoundRule, String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let rule = self
            .registry
            .resolve_by_config(&file_name)
            .ok_or_else(|| format!("no rule implementation registered for '{file_name}'"))?;
        if rule.category() != category {
            return Err(format!(
                "'{file_name}' belongs to {}, found under {category}",
                rule.category()
            ));
        }

        let config = RuleConfig::load(path, category).map_err(|e| e.to_string())?;
        if !seen_ids.insert(config.rule_id.clone()) {
            return Err(format!("duplicate rule_id '{}'", config.rule_id));
        }
        if config.rule_id != rule.rule_id() {
            debug!(
                "{} configures {} under rule_id {}",
                file_name,
                rule.rule_id(),
                config.rule_id
            );
        }

        Ok(BoundRule::new(rule, config))
    }

    /// Run bound rules in order, isolating each one
    pub fn execute(&self, model: &dyn IfcModel, rules: &[BoundRule]) -> Vec<RuleResult> {
        rules
            .iter()
            .map(|bound| {
                debug!("Checking {}", bound.rule_id());
                let result = match panic::catch_unwind(AssertUnwindSafe(|| bound.check(model))) {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        warn!("{} failed: {}", bound.rule_id(), e);
                        RuleResult::failure(bound.rule.as_ref(), &bound.config, e.to_string())
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!("{} panicked: {}", bound.rule_id(), message);
                        RuleResult::failure(bound.rule.as_ref(), &bound.config, message)
                    }
                };
                self.log_diagnostics(&result);
                result
            })
            .collect()
    }

    /// Load, bind and execute everything selected by `filter`
    pub fn run(
        &self,
        model: &dyn IfcModel,
        config_dir: &Path,
        filter: &CategoryFilter,
    ) -> Result<RunOutcome> {
        let loaded = self.load_rules(config_dir, filter)?;
        let results = self.execute(model, &loaded.rules);

        let failed = results.iter().filter(|r| !r.passed()).count();
        info!("Checked {} rule(s), {} failed", results.len(), failed);

        Ok(RunOutcome {
            results,
            skipped: loaded.skipped,
        })
    }

    fn log_diagnostics(&self, result: &RuleResult) {
        for d in result.diagnostics() {
            let level = if self.verbose {
                log::Level::Info
            } else {
                log::Level::Debug
            };
            log::log!(
                level,
                "{} [{}]: {} of {} extracted, {} skipped",
                result.rule_id(),
                d.extractor,
                d.extracted,
                d.total,
                d.skipped
            );
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("doors.yaml")));
        assert!(is_yaml(Path::new("doors.YML")));
        assert!(!is_yaml(Path::new("doors.json")));
        assert!(!is_yaml(Path::new("README")));
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 1");
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
    }

    #[test]
    fn test_missing_config_dir() {
        let orchestrator = Orchestrator::new(RuleRegistry::with_default_rules());
        let err = orchestrator
            .discover_configs(Path::new("/nonexistent/config"), &CategoryFilter::All)
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
