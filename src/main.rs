//! erfsynth CLI - earthquake rupture forecast synthesizer.
//!
//! Turns fault systems described in TOML into moment-balanced MFD branches
//! and rupture rates.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use erfsynth::pipeline::{
    synthesize, synthesize_batch, BatchSpec, FaultSystemSpec, Forecast, ForecastConfig,
    ForecastContext, PipelineError,
};

/// Earthquake rupture forecast synthesizer.
#[derive(Parser)]
#[command(name = "erfsynth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize every fault system in a TOML batch file.
    Synth {
        /// Batch file with an optional [config] table and [[system]] entries.
        input: PathBuf,

        /// Print the forecasts as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Synthesize a single straight strike-slip fault.
    Demo {
        /// Fault length in km.
        #[arg(short, long, default_value = "100")]
        length: f64,

        /// Uniform slip rate in mm/yr.
        #[arg(short, long, default_value = "20")]
        slip: f64,

        /// Keep raw rates instead of reducing them to mainshocks.
        #[arg(long)]
        no_aftershock_filter: bool,

        /// Print the forecast as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Synth { input, json } => run_synth(input, json),
        Commands::Demo {
            length,
            slip,
            no_aftershock_filter,
            json,
        } => run_demo(length, slip, no_aftershock_filter, json),
    }
}

fn run_synth(input: PathBuf, json: bool) {
    let text = match std::fs::read_to_string(&input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };
    let batch: BatchSpec = match toml::from_str(&text) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Error parsing {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };
    let ctx = context(batch.config);

    let start = Instant::now();
    let results = synthesize_batch(&batch.systems, &ctx);
    let elapsed = start.elapsed();

    let mut forecasts = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (spec, result) in batch.systems.iter().zip(results) {
        match result {
            Ok(forecast) => forecasts.push(forecast),
            Err(e) => {
                eprintln!("Error in fault system '{}': {}", spec.name, e);
                failed += 1;
            }
        }
    }

    if json {
        print_json(&forecasts);
    } else {
        println!("erfsynth - Rupture Forecast Synthesis");
        println!("=====================================");
        println!("Input: {}", input.display());
        println!("Systems: {} ok, {} failed", forecasts.len(), failed);
        println!("Completed in {:.2?}", elapsed);
        for forecast in &forecasts {
            print_summary(forecast);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_demo(length: f64, slip: f64, no_aftershock_filter: bool, json: bool) {
    let config = ForecastConfig {
        apply_aftershock_filter: !no_aftershock_filter,
        ..Default::default()
    };
    let ctx = context(config);

    let forecast = FaultSystemSpec::demo(length, slip, &ctx.config.sections)
        .and_then(|spec| spec.to_fault_system(&ctx.config.sections))
        .map_err(PipelineError::from)
        .and_then(|system| synthesize(system, &ctx));
    let forecast = match forecast {
        Ok(forecast) => forecast,
        Err(e) => {
            eprintln!("Error during synthesis: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        print_json(&forecast);
    } else {
        print_summary(&forecast);
    }
}

fn context(config: ForecastConfig) -> ForecastContext {
    match ForecastContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error in configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error serializing forecast: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(forecast: &Forecast) {
    println!("\n{}", forecast.name);
    println!("  Sections: {}", forecast.section_count);
    println!("  Moment rate: {:.4e} N·m/yr", forecast.moment_rate);
    for fault in &forecast.faults {
        println!(
            "  {}: {} branches, area {:.1} km², moment {:.4e}",
            fault.fault,
            fault.branches.len(),
            fault.area_km2,
            fault.moment_rate
        );
        for branch in &fault.branches {
            println!(
                "    {:<40} w={:.4} rate={:.4e}/yr mean M0={:.3e} N·m",
                branch.label(),
                branch.weight,
                branch.total_rate(),
                branch.mean_moment()
            );
        }
    }
    println!(
        "  Ruptures: {} across {} branches, total rate {:.4e}/yr{}",
        forecast.ruptures.len(),
        forecast.ruptures.branch_count(),
        forecast.ruptures.total_rate(),
        if forecast.aftershock_filtered { " (mainshocks)" } else { "" }
    );
    if !forecast.report.skipped_bins.is_empty() {
        println!(
            "  Skipped {} magnitude bins longer than their fault ({:.4e}/yr)",
            forecast.report.skipped_bins.len(),
            forecast.report.skipped_rate
        );
    }
}
