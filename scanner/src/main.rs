use anyhow::Context;
use clap::Parser;
use dataset::{load_table, write_table};
use generator::profile::{build_recording, GeneratorConfig, ScenarioProfile};
use log::{info, warn};
use serde_json::json;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod dataset;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Find the lowest time-to-collision interaction in an AEB recording"
)]
struct Args {
    /// Recording to analyze (CSV with a header row)
    #[arg(long, required_unless_present = "synthetic")]
    input: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Trailing rows used for scenario classification
    #[arg(long)]
    window_size: Option<usize>,
    /// Yaw-rate span in degrees that marks a turning maneuver
    #[arg(long)]
    yaw_threshold: Option<f64>,
    /// Where to write the annotated recording; defaults to the input file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Skip writing the Scenario annotation
    #[arg(long, default_value_t = false)]
    no_persist: bool,
    /// Also print the event and scan counters as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Analyze a generated recording instead of a file
    #[arg(long, value_enum)]
    synthetic: Option<ScenarioProfile>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .with_overrides(args.window_size, args.yaw_threshold)?;
    if args.no_persist {
        workflow_config.persist = false;
    }

    let raw = match (args.synthetic, &args.input) {
        (Some(profile), _) => build_recording(&GeneratorConfig {
            profile,
            seed: args.seed,
            ..Default::default()
        })?,
        (None, Some(path)) => load_table(path)?,
        (None, None) => anyhow::bail!("either --input or --synthetic is required"),
    };
    info!(
        "loaded {} rows with {} columns",
        raw.len(),
        raw.column_names().len()
    );

    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(raw).context("analyzing recording")?;

    println!("{}", result.event);
    if args.json {
        let summary = json!({
            "event": result.event,
            "metrics": result.metrics,
            "objects": result.object_count,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if workflow_config.persist {
        match args.output.as_ref().or(args.input.as_ref()) {
            Some(path) => {
                write_table(path, &result.recording)?;
                info!("wrote annotated recording to {}", path.display());
            }
            None => warn!("no output path for a synthetic recording, skipping persistence"),
        }
    }

    Ok(())
}
