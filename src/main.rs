//! Liftsim command-line harness
//!
//! Runs a scripted scenario against the simulation and prints a JSON
//! report, or describes the environment at a floor.
//!
//! # Usage
//!
//! ```bash
//! # Built-in demo on the simulated clock
//! liftsim run
//!
//! # A scenario file, with a separate elevator config, paced in real time
//! liftsim run --scenario trip.json --config elevator.json --realtime
//!
//! # What the car would see at floor B12
//! liftsim inspect -- -12
//! ```

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use liftsim::config::ElevatorConfig;
use liftsim::environment::{format_pressure, sample};
use liftsim::format_floor;
use liftsim::input::parse_floor;
use liftsim::scenario::{Scenario, ScenarioReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Liftsim elevator simulation
#[derive(Parser, Debug)]
#[command(name = "liftsim")]
#[command(author, version, about = "Deterministic elevator simulation", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario and print its report (default if no subcommand)
    Run {
        /// Scenario file; the built-in demo when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Elevator config replacing the scenario's own
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Wait out each step's delay in wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Print the report on one line
        #[arg(long)]
        compact: bool,
    },

    /// Describe the environment at a floor
    Inspect {
        /// Floor number, e.g. -12 or 350
        floor: String,
    },
}

#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    realtime: bool,
    #[serde(flatten)]
    scenario: ScenarioReport,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("liftsim v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None => run(None, None, false, false).await,
        Some(Commands::Run {
            scenario,
            config,
            realtime,
            compact,
        }) => run(scenario, config, realtime, compact).await,
        Some(Commands::Inspect { floor }) => inspect(&floor),
    }
}

async fn run(
    scenario: Option<PathBuf>,
    config: Option<PathBuf>,
    realtime: bool,
    compact: bool,
) -> anyhow::Result<()> {
    let mut scenario = match scenario {
        Some(path) => Scenario::from_json_file(&path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::demo(),
    };
    if let Some(path) = config {
        scenario.config = ElevatorConfig::from_json_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?;
    }

    info!(name = %scenario.name, steps = scenario.steps.len(), realtime, "running scenario");
    let mut run = scenario.start()?;
    while let Some(wait) = run.next_wait() {
        if realtime {
            tokio::time::sleep(wait).await;
        }
        run.step();
    }
    let report = Report {
        generated_at: Utc::now(),
        realtime,
        scenario: run.finish(),
    };

    let json = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}

fn inspect(floor: &str) -> anyhow::Result<()> {
    let floor = parse_floor(floor)?;
    let env = sample(floor as f64);

    println!("floor        {}", format_floor(floor));
    println!("pressure     {}", format_pressure(env.pressure_pa));
    if let Some(layer) = env.geology {
        println!("stratum      {} {}: {}", layer.icon(), layer.name(), layer.description());
    }
    if let Some(reading) = env.atmosphere {
        println!(
            "atmosphere   {} {}: {}",
            reading.layer.icon(),
            reading.layer.name(),
            reading.layer.description()
        );
        println!("altitude     {:.0} m", reading.altitude_m);
        println!("temperature  {:.1} °C", reading.temperature_c);
    }
    Ok(())
}
