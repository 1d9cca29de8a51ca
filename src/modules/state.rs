use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::modules::agent::{Agent, Side};
use crate::modules::grid::Grid;
use crate::modules::rules::{MAP_HEIGHT, MAP_WIDTH};
use crate::modules::structure::Building;

/// Everything that defines a game in progress. This is also the unit that is
/// exported and imported by persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) day: u32,
    pub(crate) player: Agent,
    pub(crate) opponent: Agent,
    pub(crate) grid: Grid,
    pub(crate) buildings: Vec<Building>,
    #[serde(default)]
    pub(crate) winner: Option<Side>,
}

impl GameState {
    /// Day 1 on a freshly generated map. The player starts in the far corner,
    /// the opponent at the origin.
    pub fn new(player_name: &str, opponent_name: &str, rng: &mut impl Rng) -> Self {
        let grid = Grid::generate(MAP_WIDTH, MAP_HEIGHT, rng);
        Self::with_grid(player_name, opponent_name, grid)
    }

    pub fn with_grid(player_name: &str, opponent_name: &str, mut grid: Grid) -> Self {
        let mut player = Agent::new(Side::Player, player_name);
        let mut opponent = Agent::new(Side::Opponent, opponent_name);

        let (far_x, far_y) = (grid.width() - 1, grid.height() - 1);
        if let Some(tile) = grid.tile_mut(far_x, far_y) {
            tile.grant(&mut player);
        }
        if let Some(tile) = grid.tile_mut(0, 0) {
            tile.grant(&mut opponent);
        }

        Self {
            day: 1,
            player,
            opponent,
            grid,
            buildings: Vec::new(),
            winner: None,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn agent(&self, side: Side) -> &Agent {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn agent_mut(&mut self, side: Side) -> &mut Agent {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Mutable access to one agent and the map at the same time.
    pub(crate) fn agent_and_grid_mut(&mut self, side: Side) -> (&mut Agent, &mut Grid) {
        let agent = match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        };
        (agent, &mut self.grid)
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Share of the map held by `side`, in `0.0..=1.0`.
    pub fn control_ratio(&self, side: Side) -> f64 {
        let total = self.grid.total_tiles();
        if total == 0 {
            return 0.0;
        }
        self.agent(side).controlled_tiles() as f64 / total as f64
    }

    pub(crate) fn next_building_id(&self) -> u64 {
        self.buildings
            .iter()
            .map(|b| b.id)
            .max()
            .map(|id| id.saturating_add(1))
            .unwrap_or(1)
    }

    /// Structural checks for a state that came from outside the engine.
    pub fn validate(&self) -> Result<(), String> {
        if self.day == 0 {
            return Err("day counter must start at 1".into());
        }
        self.grid.validate()?;

        for side in Side::BOTH {
            let agent = self.agent(side);
            if agent.side != side {
                return Err(format!(
                    "{} slot holds an agent labelled {}",
                    side, agent.side
                ));
            }
            let owned = self.grid.owned_by(side);
            if owned != agent.controlled_tiles() as usize {
                return Err(format!(
                    "{} claims {} tiles but owns {} on the map",
                    side,
                    agent.controlled_tiles(),
                    owned
                ));
            }
        }

        if self.buildings.iter().any(|b| b.id == u64::MAX) {
            return Err("building id leaves no room for another building".into());
        }
        let mut ids: Vec<u64> = self.buildings.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.buildings.len() {
            return Err("building ids must be unique".into());
        }

        Ok(())
    }
}
