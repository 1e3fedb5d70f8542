use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use estibuild::operations::boq::{estimate, MaterialEstimate};
use estibuild::{Pipeline, PipelineConfig, Report};

/// Measures built-up area, carpet area and wall lengths of a DXF line plan.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input drawing (ASCII DXF)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Pipeline settings (TOML)
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Override the wall thickness
    #[arg(long, value_name = "T")]
    wall_thickness: Option<f64>,

    /// Override the vertex snapping tolerance
    #[arg(long, value_name = "EPS")]
    tolerance: Option<f64>,

    /// Add a bill of quantities estimate
    #[arg(long)]
    boq: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    materials: Option<MaterialEstimate>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default: WARN for everything, INFO for estibuild. RUST_LOG overrides.
    let crate_level = if cli.verbose { "estibuild=debug" } else { "estibuild=info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive(crate_level.parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(t) = cli.wall_thickness {
        config.wall_thickness = t;
    }
    if let Some(eps) = cli.tolerance {
        config.tolerance = eps;
    }

    let report = Pipeline::new(&config)
        .run_file(&cli.input)
        .with_context(|| format!("Failed to measure {}", cli.input.display()))?;

    if report.totals.room_count == 0 {
        warn!("no room outline contributed to the totals");
    }

    let materials = cli
        .boq
        .then(|| estimate(&report.totals, config.wall_thickness, &config.boq));
    let output = Output {
        report: &report,
        materials,
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}
