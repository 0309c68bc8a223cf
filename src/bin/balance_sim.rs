//! Balance simulator entry point.
//!
//! ```text
//! balance_sim --enemy "Stone Warden" --battles 5000
//! balance_sim --enemy goblin --sweep agility --values 0,1,2,3,4
//! RUST_LOG=ether_battle=debug balance_sim --battles 1
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ether_battle::catalog::Catalog;
use ether_battle::sim::{BalanceSimulator, SimConfig, StatKind};

#[derive(Parser, Debug)]
#[command(version, about = "Replay seeded battles and report win rates and card balance")]
struct Args {
    /// Encounter name (case-insensitive)
    #[arg(short, long, default_value = "Goblin")]
    enemy: String,

    /// Number of battles; overrides the config file
    #[arg(short, long)]
    battles: Option<u32>,

    /// Seed offset; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// SimConfig JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON file; the built-in set when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Sweep one player stat instead of a single batch
    #[arg(long)]
    sweep: Option<StatKind>,

    /// Stat values for --sweep
    #[arg(long, value_delimiter = ',', default_values_t = [0, 1, 2, 3, 4, 5])]
    values: Vec<i32>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::standard(),
    };
    let mut config: SimConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if let Some(battles) = args.battles {
        config.battles = battles;
    }
    if let Some(seed) = args.seed {
        config.seed_offset = seed;
    }

    let sim = BalanceSimulator::new(Arc::new(catalog), config);
    let enemy = sim.encounter(&args.enemy)?;

    let report = match args.sweep {
        Some(stat) => serde_json::to_value(sim.sweep_stat(&enemy, stat, &args.values))?,
        None => serde_json::to_value(sim.run(&enemy))?,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
