use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use ricefield::{
    Action, Engine, GameConfig, GameSnapshot, PolicyKind, SaveError, Side, load_game,
    load_statistics, render_map, save_game, save_statistics, session_path,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;
mod saves;

use report::{print_report, print_statistics, print_status};
use saves::{SavesCommand, run_saves};

#[derive(Parser)]
#[command(
    name = "ricefield",
    version,
    about = "Turn-based rice farming and territory game against a scripted opponent",
    long_about = None
)]
pub struct Cli {
    /// Directory holding config, the current session and save slots
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start a new game, replacing nothing unless --force is given
    New {
        /// RNG seed for the map and the opponent; kept in config.json for later turns
        #[arg(long)]
        seed: Option<u64>,
        /// Opponent behaviour; kept in config.json for later games
        #[arg(long, value_enum)]
        policy: Option<PolicyKind>,
        /// Overwrite a game in progress
        #[arg(long)]
        force: bool,
    },
    /// Play one or more days; each action ends a day. Stops at the first rejection
    Act {
        /// collect | water | explore:X,Y | build
        #[arg(required = true)]
        actions: Vec<String>,
    },
    /// Show day, resources and territory
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print the map
    Map,
    /// Describe a single tile
    Tile {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Show the recorded resource history
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Manage named save slots
    #[command(subcommand)]
    Saves(SavesCommand),
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(ricefield::modules::config::DEFAULT_DATA_DIR));
    let config = GameConfig::load_from_dir(&data_dir)?;
    init_tracing(&config.log_filter);

    match cli.command {
        Command::New {
            seed,
            policy,
            force,
        } => run_new(config, seed, policy, force),
        Command::Act { actions } => run_act(&config, &actions),
        Command::Status { json } => run_status(&config, json),
        Command::Map => run_map(&config),
        Command::Tile { x, y } => run_tile(&config, x, y),
        Command::Stats { json } => run_stats(&config, json),
        Command::Saves(cmd) => run_saves(&config, cmd),
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(fallback: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ricefield::modules::config::CONFIG_FILE)
}

/// Loads the game in progress along with its recorded history.
pub(crate) fn open_session(config: &GameConfig) -> Result<Engine> {
    let path = session_path(&config.data_dir);
    let bundle = match load_game(&path) {
        Ok(bundle) => bundle,
        Err(SaveError::NotFound(_)) => bail!("no game in progress; run `ricefield new` first"),
        Err(err) => return Err(err).context("failed to load the current session"),
    };

    let mut engine = Engine::resume(bundle, config)?;
    let stats = load_statistics(&config.data_dir)?;
    if stats.total_days() > 0 {
        engine.resume_statistics(stats);
    }
    Ok(engine)
}

pub(crate) fn store_session(config: &GameConfig, engine: &Engine) -> Result<()> {
    save_game(&session_path(&config.data_dir), &engine.export_bundle())?;
    save_statistics(&config.data_dir, engine.statistics())?;
    Ok(())
}

fn run_new(
    mut config: GameConfig,
    seed: Option<u64>,
    policy: Option<PolicyKind>,
    force: bool,
) -> Result<()> {
    let session = session_path(&config.data_dir);
    if session.exists() && !force {
        bail!(
            "a game is already in progress at {}; pass --force to replace it",
            session.display()
        );
    }

    if config.apply_overrides(seed, policy) {
        config
            .save(&config_path(&config.data_dir))
            .context("failed to write config")?;
    }

    let engine = Engine::new(&config);
    store_session(&config, &engine)?;
    info!(data_dir = %config.data_dir.display(), "session created");

    println!(
        "New game on a {}x{} map against the {} opponent.",
        engine.state().grid().width(),
        engine.state().grid().height(),
        engine.policy_name()
    );
    print_status(&engine);
    Ok(())
}

fn run_act(config: &GameConfig, inputs: &[String]) -> Result<()> {
    let actions = inputs
        .iter()
        .map(|raw| raw.parse::<Action>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    let mut engine = open_session(config)?;
    let outcome = engine.play_with_hook(actions, |engine, report| print_report(engine, report));
    if let Err((action, err)) = outcome {
        println!("Rejected {}: {}", action, err);
    }
    store_session(config, &engine)?;

    if let Some(winner) = engine.winner() {
        let who = &engine.agent(winner).name;
        match winner {
            Side::Player => println!("{} wins the valley. Start over with `ricefield new --force`.", who),
            Side::Opponent => println!("{} has taken the valley. Game over.", who),
        }
    }
    Ok(())
}

fn run_status(config: &GameConfig, json: bool) -> Result<()> {
    let engine = open_session(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&GameSnapshot::of(&engine))?);
    } else {
        print_status(&engine);
    }
    Ok(())
}

fn run_map(config: &GameConfig) -> Result<()> {
    let engine = open_session(config)?;
    print!("{}", render_map(engine.state().grid()));
    Ok(())
}

fn run_tile(config: &GameConfig, x: i32, y: i32) -> Result<()> {
    let engine = open_session(config)?;
    println!("{}", engine.tile_description(x, y));
    Ok(())
}

fn run_stats(config: &GameConfig, json: bool) -> Result<()> {
    let engine = open_session(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(engine.statistics())?);
    } else {
        print_statistics(&engine);
    }
    Ok(())
}
