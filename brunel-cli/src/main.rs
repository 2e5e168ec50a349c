//! brunel: run a balanced LIF network and write its spikes as `step<TAB>neuron` lines.

mod config;
mod prompt;
mod report;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use brunel_core::{Simulation, TsvWriter};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "brunel")]
#[command(version)]
#[command(about = "Brunel balanced network of leaky integrate-and-fire neurons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the network and run it, writing the spike log
    Run(RunArgs),
    /// Print the effective configuration as TOML
    PrintConfig(Overrides),
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    overrides: Overrides,

    /// Prompt for duration, eta, g and population sizes
    #[arg(short, long)]
    interactive: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => {
            args.overrides.apply(&mut config);
            run(config, args.interactive, args.no_progress)
        }
        Commands::PrintConfig(overrides) => {
            overrides.apply(&mut config);
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} steps ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn run(mut config: Config, interactive: bool, no_progress: bool) -> Result<()> {
    if interactive {
        prompt::prompt_run(&mut config.run)?;
    }

    let mut sim = Simulation::new(config.params, &config.run).context("Invalid simulation setup")?;

    let path = config.output.path.clone();
    let file = File::create(&path)
        .with_context(|| format!("Failed to create spike log {}", path.display()))?;
    let mut sink = TsvWriter::new(file);

    let pb = progress_bar(sim.run_steps(), no_progress)?;
    let every = (sim.run_steps() / 200).max(1);
    let result = sim.run_with_progress(&mut sink, every, |done, _| pb.set_position(done));

    let summary = match result {
        Ok(summary) => {
            pb.finish_and_clear();
            summary
        }
        Err(e) => {
            pb.abandon();
            error!(step = sim.clock(), path = %path.display(), "run aborted; spike log is incomplete");
            return Err(e).context("Simulation aborted");
        }
    };
    info!(written = sink.written(), "spike log closed");

    println!("{}", report::render(&summary, &config.params, sim.seed(), &path));
    Ok(())
}
