pub mod modules;

pub use modules::action::{Action, ActionError};
pub use modules::agent::{Agent, Side};
pub use modules::config::{ConfigError, GameConfig};
pub use modules::engine::{DayReport, Engine, Event};
pub use modules::grid::{Coord, Grid, Tile, can_capture, tile_value};
pub use modules::policy::{GreedyPolicy, OpponentPolicy, PolicyKind, RandomPolicy};
pub use modules::resource::{Amount, Ledger, ResourceKind};
pub use modules::rules;
pub use modules::save::{
    self, SaveBundle, SaveError, delete_save, list_saves, load_game, load_statistics,
    save_exists, save_game, save_statistics, session_path, slot_path,
};
pub use modules::state::GameState;
pub use modules::stats::{ActionStats, AgentSample, GameStatistics};
pub use modules::structure::{Building, BuildingKind};
pub use modules::view::{AgentView, BuildingView, GameSnapshot, TileView, render_map};
