// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ifc-compliance` - check a building model against code-of-practice rules
//!
//! Loads a JSON model snapshot, runs the rules configured under
//! `--config-dir` and writes a JSON compliance report. Rules failing is a
//! report outcome: the process exits 0 whenever the run completes.

use anyhow::{Context, Result};
use clap::Parser;
use ifc_compliance_engine::{CategoryFilter, Orchestrator, Reporter, RuleRegistry};
use ifc_compliance_model::{IfcModel, IfcType, ModelLoader, SnapshotLoader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ifc-compliance")]
#[command(about = "Check an IFC model against Singapore code-of-practice rules")]
#[command(version)]
struct Cli {
    /// Model snapshot (JSON) to check
    #[arg(long)]
    ifc_path: PathBuf,

    /// Directory holding <category>/<rule>.yaml files
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Where to write the JSON report
    #[arg(long, default_value = "outputs/compliance_report.json")]
    output: PathBuf,

    /// all, fire_safety, accessibility or building_control
    #[arg(long, default_value = "all")]
    category: String,

    /// Show extractor diagnostics and skipped configs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let filter: CategoryFilter = cli
        .category
        .parse()
        .with_context(|| format!("invalid --category '{}'", cli.category))?;

    println!("Loading model: {}", cli.ifc_path.display());
    let model = SnapshotLoader
        .load_path(&cli.ifc_path)
        .with_context(|| format!("failed to load model {}", cli.ifc_path.display()))?;
    print_model_summary(model.as_ref());

    let orchestrator =
        Orchestrator::new(RuleRegistry::with_default_rules()).with_verbose(cli.verbose);
    let outcome = orchestrator
        .run(model.as_ref(), &cli.config_dir, &filter)
        .context("rule run failed")?;

    if cli.verbose {
        for category in filter.categories() {
            let ran = outcome
                .results
                .iter()
                .filter(|r| r.category() == category)
                .count();
            println!("  {category}: {ran} rule(s)");
        }
        for skipped in &outcome.skipped {
            println!("  skipped {}: {}", skipped.path.display(), skipped.reason);
        }
        for (rule_id, d) in outcome.diagnostics() {
            println!(
                "  {rule_id} [{}]: {}/{} extracted, {} skipped",
                d.extractor, d.extracted, d.total, d.skipped
            );
        }
    }

    let reporter = Reporter::new();
    let model_path = cli.ifc_path.display().to_string();
    let report = reporter.generate(&model_path, &outcome.results);
    let json = reporter.to_json(&report)?;

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&cli.output, json)
        .with_context(|| format!("failed to write report {}", cli.output.display()))?;
    println!("Report written to {}", cli.output.display());

    let summary = reporter.summary(&outcome.results);
    println!();
    println!(
        "Rules checked: {}  passed: {}  failed: {}  ({:.1}% compliant)",
        summary.total_rules, summary.passed, summary.failed, summary.compliance_rate
    );
    for failed in &summary.failed_rules {
        println!(
            "  FAILED {} {} ({} violation(s))",
            failed.rule_id, failed.name, failed.violations
        );
    }
    if cli.verbose {
        for result in outcome.results.iter().filter(|r| !r.passed()) {
            for line in reporter.format_violation_messages(result, true) {
                println!("    {line}");
            }
        }
    }

    log::debug!("Done");
    Ok(())
}

fn print_model_summary(model: &dyn IfcModel) {
    let metadata = model.metadata();
    let schema = if metadata.schema_version.is_empty() {
        "unknown"
    } else {
        metadata.schema_version.as_str()
    };
    println!(
        "  schema {}, {} entities, {} storey(s), unit scale {}",
        schema,
        model.resolver().entity_count(),
        model.spatial().storeys().len(),
        model.unit_scale()
    );

    let resolver = model.resolver();
    println!(
        "  {} space(s), {} door(s), {} wall(s), {} stair(s)",
        resolver.count_by_type(&IfcType::IfcSpace),
        resolver.count_by_type(&IfcType::IfcDoor),
        [IfcType::IfcWall, IfcType::IfcWallStandardCase, IfcType::IfcCurtainWall]
            .iter()
            .map(|t| resolver.count_by_type(t))
            .sum::<usize>(),
        resolver.count_by_type(&IfcType::IfcStair)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ifc-compliance", "--ifc-path", "model.json"]).unwrap();
        assert_eq!(cli.config_dir, PathBuf::from("config"));
        assert_eq!(cli.output, PathBuf::from("outputs/compliance_report.json"));
        assert_eq!(cli.category, "all");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_ifc_path_is_required() {
        assert!(Cli::try_parse_from(["ifc-compliance"]).is_err());
    }

    #[test]
    fn test_unknown_category_fails() {
        let cli = Cli::try_parse_from([
            "ifc-compliance",
            "--ifc-path",
            "model.json",
            "--category",
            "plumbing",
        ])
        .unwrap();
        assert!(run(&cli).is_err());
    }
}
