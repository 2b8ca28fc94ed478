use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use cluster_sim::domain::cluster_model::config::SimulationConfig;
use cluster_sim::domain::cluster_model::policy_type::PolicyType;
use cluster_sim::{load_config, logger, run_simulation};

/// Discrete-event simulation of job scheduling on a dynamic cluster.
#[derive(Debug, Parser)]
#[command(name = "cluster-sim", version, about)]
struct Cli {
    /// Scheduling policy: `ar` (advance reservation) or `mixed`.
    #[arg(short, long)]
    policy: Option<PolicyType>,

    /// JSON config file. Missing fields use the defaults of the policy.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the random source. Omit for a random seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Snapshot output file.
    #[arg(short, long)]
    output: Option<String>,

    /// Wall-clock delay between two ticks, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop once this many jobs completed.
    #[arg(long)]
    max_completions: Option<u64>,

    /// Stop after this many ticks even if the completion target was not reached.
    #[arg(long)]
    max_ticks: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init();

    let mut config = match &cli.config {
        Some(path) => load_config(path, cli.policy).with_context(|| format!("loading config '{}'", path.display()))?,
        None => SimulationConfig::for_policy(cli.policy.unwrap_or(PolicyType::AdvanceReservation)),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(output) = cli.output {
        config.output_file = Some(output);
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.tick_interval_ms = interval_ms;
    }
    if let Some(max_completions) = cli.max_completions {
        config.max_completions = max_completions;
    }
    if cli.max_ticks.is_some() {
        config.max_ticks = cli.max_ticks;
    }
    config.validate().context("invalid command line overrides")?;

    let summary = run_simulation(config);
    println!("{}", summary);

    Ok(())
}
