//! caubay — command-line front end for the Cầu Bây water-quality engine.
//!
//! Evaluates single positions, prints longitudinal profiles as tables or
//! JSON lines, and lists the named stations along the river.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use caubay_core::constants::{critical_positions, STATIONS};
use caubay_core::types::{Conditions, CriticalPosition, Indicator, Station, WaterQualitySample};
use caubay_quality::classifier::clamp_position;
use caubay_quality::profile::{build_profile, profile_positions, ProfilePoint};
use caubay_quality::{classify, EngineConfig, WaterQualityEngine};

/// Cầu Bây river water-quality engine.
#[derive(Parser, Debug)]
#[command(name = "caubay", version, about = "BOD5, NH4+ and NO3- along the Cầu Bây river")]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Water quality at one position.
    Evaluate(EvaluateArgs),
    /// Water quality along the whole river.
    Profile(ProfileArgs),
    /// Named stations and critical sample positions.
    Stations(StationsArgs),
}

#[derive(Args, Debug)]
struct DriverArgs {
    /// Rainfall intensity, mm/hr.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rainfall: f64,

    /// Water temperature, °C.
    #[arg(long, default_value_t = 26.0, allow_negative_numbers = true)]
    temperature: f64,
}

impl DriverArgs {
    fn conditions(&self) -> Result<Conditions> {
        Conditions::try_new(self.rainfall, self.temperature).context("invalid weather drivers")
    }
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Distance from the Sài Đồng outfall, metres. Clamped to the river.
    #[arg(long, allow_negative_numbers = true)]
    position: f64,

    #[command(flatten)]
    drivers: DriverArgs,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[command(flatten)]
    drivers: DriverArgs,

    /// Grid spacing in metres, merged with the critical positions.
    #[arg(long, default_value_t = 500.0)]
    step: f64,

    /// Print one JSON object per line instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct StationsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Evaluation<'a> {
    position: f64,
    regime: String,
    conditions: &'a Conditions,
    #[serde(flatten)]
    sample: WaterQualitySample,
}

#[derive(Serialize)]
struct Topology<'a> {
    stations: &'a [Station],
    critical_positions: &'a [CriticalPosition],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let config = EngineConfig::from_env().context("reading engine configuration")?;
    debug!(?config, "engine configuration");
    let engine = WaterQualityEngine::with_config(config);

    match cli.command {
        Commands::Evaluate(args) => evaluate(&engine, args),
        Commands::Profile(args) => profile(&engine, args),
        Commands::Stations(args) => stations(args),
    }
}

fn evaluate(engine: &WaterQualityEngine, args: EvaluateArgs) -> Result<()> {
    let conditions = args.drivers.conditions()?;
    let position = clamp_position(args.position);
    if position != args.position {
        info!(requested = args.position, position, "position clamped to river");
    }
    let sample = engine.evaluate_at(position, &conditions);
    let regime = classify(position).to_string();

    let mut out = io::stdout().lock();
    if args.json {
        let row = Evaluation { position, regime, conditions: &conditions, sample };
        serde_json::to_writer(&mut out, &row).context("encoding evaluation")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Position:    {position} m ({regime})")?;
    writeln!(out, "Rainfall:    {} mm/hr", conditions.rainfall)?;
    writeln!(out, "Temperature: {} °C", conditions.temperature)?;
    writeln!(out)?;
    for indicator in Indicator::ALL {
        writeln!(out, "{:<8} {:>8.2} mg/L", indicator.label(), sample.get(indicator))?;
    }
    Ok(())
}

fn profile(engine: &WaterQualityEngine, args: ProfileArgs) -> Result<()> {
    let conditions = args.drivers.conditions()?;
    let positions = profile_positions(args.step);
    let rows = build_profile(engine, &conditions, &positions);
    info!(points = rows.len(), "profile sampled");

    let mut out = io::stdout().lock();
    if args.json {
        for row in &rows {
            serde_json::to_writer(&mut out, row).context("encoding profile row")?;
            writeln!(out)?;
        }
        return Ok(());
    }

    write!(out, "{:>8}  ", "Z (m)")?;
    for indicator in Indicator::ALL {
        write!(out, "{:>8}", indicator.label())?;
    }
    writeln!(out, "  Location")?;
    for row in &rows {
        write_profile_row(&mut out, row)?;
    }
    Ok(())
}

fn write_profile_row(out: &mut impl Write, row: &ProfilePoint) -> io::Result<()> {
    write!(out, "{:>8.0}  ", row.position)?;
    for indicator in Indicator::ALL {
        write!(out, "{:>8.2}", row.sample.get(indicator))?;
    }
    writeln!(out, "  {}", row.label.as_deref().unwrap_or(""))
}

fn stations(args: StationsArgs) -> Result<()> {
    let critical = critical_positions();
    let mut out = io::stdout().lock();
    if args.json {
        let topology = Topology { stations: &STATIONS, critical_positions: &critical };
        serde_json::to_writer_pretty(&mut out, &topology).context("encoding stations")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Stations:")?;
    for s in &STATIONS {
        writeln!(out, "  {:>6.0} m  {}", s.position, s.name)?;
    }
    writeln!(out, "Critical positions:")?;
    for c in &critical {
        writeln!(out, "  {:>6.0} m  {}", c.position, c.label)?;
    }
    Ok(())
}

/// Initialize the tracing subscriber on stderr, keeping stdout for results.
fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .init(),
    }
}
