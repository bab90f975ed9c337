// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Compliance Engine - configurable code-of-practice checks for building models
//!
//! Rules read a model through the [`ifc_compliance_model::IfcModel`] traits,
//! measure it with the geometry kit and report [`Violation`]s. Which rules
//! run, and with which thresholds, is decided by YAML files laid out per
//! category:
//!
//! ```text
//! config/
//!   fire_safety/travel_distance.yaml
//!   accessibility/corridors.yaml
//!   ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ifc_compliance_engine::{CategoryFilter, Orchestrator, Reporter, RuleRegistry};
//!
//! let orchestrator = Orchestrator::new(RuleRegistry::with_default_rules());
//! let outcome = orchestrator.run(model.as_ref(), Path::new("config"), &CategoryFilter::All)?;
//! let report = Reporter::new().generate("model.json", &outcome.results);
//! println!("{}", report.summary.compliance_rate);
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod identify;
pub mod orchestrator;
pub mod registry;
pub mod reporter;
pub mod rule;
pub mod rules;

pub use config::{Category, CategoryFilter, FromParam, ParamValue, RuleConfig};
pub use error::{Error, Result};
pub use identify::{ElementClass, IdentificationHints};
pub use orchestrator::{LoadedRules, Orchestrator, RunOutcome, SkippedConfig};
pub use registry::RuleRegistry;
pub use reporter::{ComplianceReport, Reporter, RunSummary};
pub use rule::{BoundRule, Location, Rule, RuleResult, Severity, Violation};
