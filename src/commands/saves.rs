use anyhow::{Result, bail};
use clap::Subcommand;
use ricefield::{
    Engine, GameConfig, SaveBundle, delete_save, list_saves, load_game, save_exists, save_game, slot_path,
};

use super::{open_session, store_session};

#[derive(Subcommand)]
pub enum SavesCommand {
    /// List save slots
    List,
    /// Save the current game to a slot
    Save {
        name: String,
        /// Overwrite an existing slot
        #[arg(long)]
        force: bool,
    },
    /// Replace the current game with a slot
    Load { name: String },
    /// Remove a slot
    Delete { name: String },
}

pub(super) fn run_saves(config: &GameConfig, cmd: SavesCommand) -> Result<()> {
    let data_dir = &config.data_dir;

    match cmd {
        SavesCommand::List => {
            let names = list_saves(data_dir)?;
            if names.is_empty() {
                println!("No saves.");
            }
            for name in names {
                let path = slot_path(data_dir, &name)?;
                match load_game(&path) {
                    Ok(bundle) => println!(
                        "{}  day {}  saved {}",
                        name,
                        bundle.state.day(),
                        bundle.saved_at
                    ),
                    Err(err) => println!("{}  unreadable: {}", name, err),
                }
            }
        }
        SavesCommand::Save { name, force } => {
            if save_exists(data_dir, &name) && !force {
                bail!("save {} already exists; pass --force to overwrite", name);
            }
            let engine = open_session(config)?;
            let bundle: SaveBundle = engine.export_bundle();
            save_game(&slot_path(data_dir, &name)?, &bundle)?;
            println!("Saved day {} to {}", bundle.state.day(), name);
        }
        SavesCommand::Load { name } => {
            let bundle = load_game(&slot_path(data_dir, &name)?)?;
            let mut engine = Engine::new(config);
            engine.import(bundle)?;
            store_session(config, &engine)?;
            println!("Loaded {} (day {})", name, engine.day());
        }
        SavesCommand::Delete { name } => {
            delete_save(data_dir, &name)?;
            println!("Deleted {}", name);
        }
    }

    Ok(())
}
