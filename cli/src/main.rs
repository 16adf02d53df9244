//! System contract simulator
//!
//! Replays JSON action scripts against an in-memory host, saves the
//! resulting state and prints contract tables.

mod display;
mod script;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use sys_contract::{SystemConfig, SystemContract, SystemState};
use sys_core::MemoryHost;
use sys_storage::Storage;

use crate::script::Script;

const STATE_SNAPSHOT: &str = "state";
const HOST_SNAPSHOT: &str = "host";

#[derive(Parser)]
#[command(name = "syscontract")]
#[command(about = "System contract simulator", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding state snapshots
    #[arg(short, long, value_name = "DIR", default_value = "syscontract-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an action script and save the resulting state
    Replay {
        /// JSON script with genesis and steps
        script: PathBuf,
    },

    /// Print a table from the saved state
    Show {
        #[arg(value_enum)]
        table: TableName,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableName {
    Global,
    Market,
    Ram,
    Resources,
    Delegations,
    Refunds,
    Producers,
    Voters,
    Bids,
    Balances,
}

fn load_config(path: Option<&PathBuf>) -> Result<SystemConfig> {
    match path {
        Some(path) => SystemConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SystemConfig::default()),
    }
}

fn replay(config: SystemConfig, script_path: &PathBuf, storage: &Storage) -> Result<()> {
    let script = Script::load(script_path)?;
    let mut contract = script.build_contract(config)?;
    info!(
        "replaying {} steps from {}",
        script.steps.len(),
        script_path.display()
    );

    let reports = script.replay(&mut contract);
    display::step_reports(&reports);

    let (state, host) = contract.into_parts();
    storage.save_snapshot(STATE_SNAPSHOT, &state)?;
    storage.save_snapshot(HOST_SNAPSHOT, &host)?;
    println!(
        "  state saved to {}",
        storage.data_dir().display().to_string().bright_black()
    );
    println!();
    Ok(())
}

fn show(config: SystemConfig, table: TableName, storage: &Storage) -> Result<()> {
    if !storage.has_snapshot(STATE_SNAPSHOT) {
        bail!(
            "no saved state in {}, run `replay` first",
            storage.data_dir().display()
        );
    }
    let state: SystemState = storage.load_snapshot(STATE_SNAPSHOT)?;
    let host: MemoryHost = storage.load_snapshot(HOST_SNAPSHOT)?;
    let contract = SystemContract::with_state(state, host, config);
    let state = contract.state();

    match table {
        TableName::Global => display::global(state),
        TableName::Market => display::market(state),
        TableName::Ram => display::ram(state),
        TableName::Resources => display::resources(state),
        TableName::Delegations => display::delegations(state),
        TableName::Refunds => display::refunds(state),
        TableName::Producers => display::producers(state),
        TableName::Voters => display::voters(state),
        TableName::Bids => display::bids(state),
        TableName::Balances => display::balances(state, contract.host()),
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Replay { script } => {
            let storage = Storage::open(&cli.data_dir)?;
            replay(config, &script, &storage)
        }
        Commands::Show { table } => {
            let storage = Storage::open(&cli.data_dir)?;
            show(config, table, &storage)
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
