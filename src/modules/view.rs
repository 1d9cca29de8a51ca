use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::modules::agent::{Agent, Side};
use crate::modules::engine::Engine;
use crate::modules::grid::{Coord, Grid};
use crate::modules::resource::Amount;
use crate::modules::structure::BuildingKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub side: Side,
    pub name: String,
    pub rice: Amount,
    pub water: Amount,
    pub peasants: Amount,
    pub tiles: u32,
    /// Share of the map, in percent.
    pub control_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub coord: Coord,
    pub capture_cost: Amount,
    pub owner: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingView {
    pub id: u64,
    pub kind: BuildingKind,
    pub owner: Side,
}

/// Read-only picture of a game, for `status --json` and external tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub day: u32,
    pub width: i32,
    pub height: i32,
    pub winner: Option<Side>,
    pub policy: String,
    pub agents: Vec<AgentView>,
    pub tiles: Vec<TileView>,
    pub buildings: Vec<BuildingView>,
}

impl GameSnapshot {
    pub fn of(engine: &Engine) -> Self {
        let state = engine.state();
        let grid = state.grid();

        let agents = Side::BOTH
            .iter()
            .map(|&side| agent_view(state.agent(side), state.control_ratio(side)))
            .collect();
        let tiles = grid
            .tiles()
            .map(|tile| TileView {
                coord: tile.coord,
                capture_cost: tile.capture_cost(),
                owner: tile.owner(),
            })
            .collect();
        let mut buildings: Vec<BuildingView> = state
            .buildings()
            .iter()
            .map(|b| BuildingView {
                id: b.id,
                kind: b.kind,
                owner: b.owner,
            })
            .collect();
        buildings.sort_by_key(|b| b.id);

        Self {
            day: state.day(),
            width: grid.width(),
            height: grid.height(),
            winner: state.winner(),
            policy: engine.policy_name().to_string(),
            agents,
            tiles,
            buildings,
        }
    }
}

fn agent_view(agent: &Agent, ratio: f64) -> AgentView {
    AgentView {
        side: agent.side,
        name: agent.name.clone(),
        rice: agent.ledger.rice,
        water: agent.ledger.water,
        peasants: agent.ledger.peasants,
        tiles: agent.controlled_tiles(),
        control_percent: ratio * 100.0,
    }
}

/// Text map, row `y = 0` on top. `P` and `O` mark owned tiles, digits are
/// capture costs of free ones.
pub fn render_map(grid: &Grid) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for x in 0..grid.width() {
        let _ = write!(out, "{:>2}", x % 10);
    }
    out.push('\n');

    for y in 0..grid.height() {
        let _ = write!(out, "{:>2} ", y);
        for x in 0..grid.width() {
            let cell = match grid.tile(x, y) {
                Some(tile) => match tile.owner() {
                    Some(Side::Player) => 'P',
                    Some(Side::Opponent) => 'O',
                    None => char::from_digit(tile.capture_cost(), 10).unwrap_or('?'),
                },
                None => ' ',
            };
            let _ = write!(out, " {cell}");
        }
        out.push('\n');
    }
    out
}
