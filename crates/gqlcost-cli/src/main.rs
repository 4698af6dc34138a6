//! gqlcost CLI: cost analysis over YAML bundles.

use clap::{Parser, Subcommand};
use gqlcost_analysis::{CostAnalysis, CostReport, FieldCost, RuleSource};
use gqlcost_core::config::CostConfig;
use gqlcost_core::failure::ValidationFailure;
use gqlcost_dsl::{parse_bundle, parse_variables_json, Bundle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gqlcost")]
#[command(about = "Static cost analysis for type-checked GraphQL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the cost of a bundle's document and check it against the budget
    Analyze {
        /// Path to the bundle YAML file
        #[arg(short, long)]
        bundle: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Emit the report and failures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a bundle and check its schema and configuration
    Validate {
        /// Path to the bundle YAML file
        #[arg(short, long)]
        bundle: PathBuf,
    },

    /// Show how every field's cost was derived
    Explain {
        /// Path to the bundle YAML file
        #[arg(short, long)]
        bundle: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Maximum cost (overrides bundle and environment)
    #[arg(long)]
    maximum_cost: Option<u64>,

    /// Cost of unannotated fields (overrides bundle and environment)
    #[arg(long)]
    default_cost: Option<u64>,

    /// Initial value of the running total
    #[arg(long)]
    starting_cost: Option<u64>,

    /// Variables as a JSON object; merged over the bundle's variables
    #[arg(long)]
    variables: Option<String>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const EXIT_FAILURES: u8 = 2;
const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let status = match cli.command {
        Commands::Analyze {
            bundle,
            overrides,
            json,
        } => analyze_status(analyze(&bundle, &overrides, json)),
        Commands::Validate { bundle } => match validate(&bundle) {
            Ok(()) => {
                println!("✓ Bundle is valid");
                0
            }
            Err(e) => {
                eprintln!("Validation failed: {}", e);
                EXIT_ERROR
            }
        },
        Commands::Explain { bundle, overrides } => match explain(&bundle, &overrides) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
    };
    ExitCode::from(status)
}

/// 0 within budget, 2 when failures were reported, 1 when nothing ran.
fn analyze_status(outcome: CliResult<bool>) -> u8 {
    match outcome {
        Ok(true) => EXIT_FAILURES,
        Ok(false) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GQLCOST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> CliResult<Bundle> {
    tracing::debug!(path = %path.display(), "loading bundle");
    let yaml_content = fs::read_to_string(path)?;
    let bundle = parse_bundle(&yaml_content)?;
    tracing::debug!(
        types = bundle.schema.types().len(),
        operations = bundle.document.operations.len(),
        "bundle loaded"
    );
    Ok(bundle)
}

/// Defaults < environment < bundle config < command line.
fn build_config(bundle: &Bundle, overrides: &Overrides) -> CliResult<CostConfig> {
    build_config_with(bundle, overrides, |key| std::env::var(key).ok())
}

fn build_config_with<F>(bundle: &Bundle, overrides: &Overrides, env: F) -> CliResult<CostConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CostConfig::new(0);
    config.apply_env(env);
    bundle.config.apply_to(&mut config);

    if let Some(max) = overrides.maximum_cost {
        config.maximum_cost = max;
    }
    if let Some(cost) = overrides.default_cost {
        config.default_cost = cost;
    }
    if let Some(start) = overrides.starting_cost {
        config.starting_cost = start;
    }

    config.validate().map_err(|e| {
        format!("{e} (set --maximum-cost, config.maximum_cost or GQLCOST_MAXIMUM_COST)")
    })?;
    Ok(config)
}

fn merge_variables(bundle: &mut Bundle, overrides: &Overrides) -> CliResult<()> {
    if let Some(src) = &overrides.variables {
        bundle.variables.extend(parse_variables_json(src)?);
    }
    Ok(())
}

fn analyze(path: &Path, overrides: &Overrides, json: bool) -> CliResult<bool> {
    let mut bundle = load(path)?;
    merge_variables(&mut bundle, overrides)?;
    let config = build_config(&bundle, overrides)?;
    let (report, failures) = run_analysis(&bundle, &config, false)?;

    if json {
        let out = serde_json::json!({
            "report": report,
            "failures": failures
                .iter()
                .map(|f| serde_json::json!({ "message": f.message(), "path": f.path }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(&report, &failures);
    }

    Ok(!failures.is_empty())
}

fn run_analysis(
    bundle: &Bundle,
    config: &CostConfig,
    record_fields: bool,
) -> CliResult<(CostReport, Vec<ValidationFailure>)> {
    let analysis = CostAnalysis::new(&bundle.schema, config)?
        .with_variables(&bundle.variables)
        .record_fields(record_fields);
    let mut failures: Vec<ValidationFailure> = Vec::new();
    let report = analysis.analyze(&bundle.document, &mut failures);
    Ok((report, failures))
}

fn print_summary(report: &CostReport, failures: &[ValidationFailure]) {
    println!(
        "Total cost: {} (maximum {})",
        report.total_cost, report.maximum_cost
    );
    for op in &report.operations {
        println!(
            "  {:?} {}: {}",
            op.kind,
            op.name.as_deref().unwrap_or("<anonymous>"),
            op.cost
        );
    }
    println!("  Fields costed: {}", report.fields_costed);
    if failures.is_empty() {
        println!("✓ Within budget");
    }
    for failure in failures {
        println!("✗ {}", failure);
    }
}

fn validate(path: &Path) -> CliResult<()> {
    let bundle = load(path)?;
    build_config(&bundle, &Overrides::default())?;
    Ok(())
}

fn explain(path: &Path, overrides: &Overrides) -> CliResult<()> {
    let mut bundle = load(path)?;
    merge_variables(&mut bundle, overrides)?;
    let config = build_config(&bundle, overrides)?;
    let (report, failures) = run_analysis(&bundle, &config, true)?;

    println!("=== Cost breakdown ===");
    for field in &report.fields {
        println!("{}", describe(field));
    }
    println!();
    print_summary(&report, &failures);
    Ok(())
}

fn describe(field: &FieldCost) -> String {
    let depth = field.path.len().saturating_sub(1);
    let name = field.path.last().map(String::as_str).unwrap_or("?");
    let source = match field.source {
        Some(RuleSource::CostMap) => "cost map",
        Some(RuleSource::FieldAnnotation) => "field @cost",
        Some(RuleSource::TypeAnnotation) => "type @cost",
        Some(RuleSource::Default) => "default",
        None => return format!("{:indent$}{name}: 0 [invalid @cost]", "", indent = depth * 2),
    };
    let formula = if field.negative_multiplier {
        format!("{} [negative multiplier, {source}]", field.contribution)
    } else if !field.use_multipliers {
        format!("{} [no multipliers, {source}]", field.contribution)
    } else {
        let own = field
            .own_multiplier
            .map(|m| format!(" × {m}"))
            .unwrap_or_default();
        format!(
            "{} × {}{own} = {} [{source}]",
            field.complexity, field.path_factor, field.contribution
        )
    };
    format!("{:indent$}{name}: {formula}", "", indent = depth * 2)
}
