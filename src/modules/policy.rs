use std::fmt;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::modules::action::Action;
use crate::modules::agent::Side;
use crate::modules::grid::{Tile, can_capture, tile_value};
use crate::modules::rules::{OPPONENT_HOUSE_PEASANT_LIMIT, OPPONENT_LOW_WATER, WATER_RICE_COST};
use crate::modules::state::GameState;
use crate::modules::structure::BuildingKind;

/// How many random coordinates the random policy probes before giving up on exploring.
const RANDOM_EXPLORE_ATTEMPTS: usize = 10;

/// Decides what a scripted agent does with its day. The engine applies the
/// returned action; a rejected action simply forfeits the turn.
pub trait OpponentPolicy: fmt::Debug {
    fn name(&self) -> &'static str;

    fn choose(&mut self, state: &GameState, side: Side, rng: &mut dyn RngCore) -> Action;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Fixed priority chain: build, capture, collect, water
    #[default]
    Greedy,
    /// Any of the four actions, picked at random
    Random,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn OpponentPolicy> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::Random => Box::new(RandomPolicy),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PolicyKind::Greedy => "greedy",
            PolicyKind::Random => "random",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Myopic opponent: no lookahead, and the capture target is a uniform pick
/// among affordable tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl OpponentPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose(&mut self, state: &GameState, side: Side, rng: &mut dyn RngCore) -> Action {
        let me = state.agent(side);
        let house = BuildingKind::PeasantHouse;

        if me.ledger.first_shortfall(&house.costs()).is_none()
            && me.peasants() < OPPONENT_HOUSE_PEASANT_LIMIT
        {
            return Action::BuildPeasantHouse;
        }

        let candidates: Vec<&Tile> = state
            .grid()
            .tiles()
            .filter(|tile| can_capture(tile, me))
            .collect();
        if let Some(target) = candidates.choose(rng) {
            debug!(
                side = %side,
                tile = %target.coord,
                candidates = candidates.len(),
                value = tile_value(target, state.grid()),
                "opponent picked capture target"
            );
            return Action::ExploreTile {
                x: target.coord.x,
                y: target.coord.y,
            };
        }

        if me.ledger.water < OPPONENT_LOW_WATER {
            return Action::CollectWater;
        }

        if me.ledger.water >= WATER_RICE_COST {
            return Action::WaterRice;
        }

        Action::CollectWater
    }
}

/// Picks one of the four actions at random without checking affordability.
/// Exploring probes a handful of random tiles and settles for the first one
/// it could take.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl OpponentPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, state: &GameState, side: Side, rng: &mut dyn RngCore) -> Action {
        match rng.gen_range(0..4) {
            0 => Action::CollectWater,
            1 => Action::WaterRice,
            2 => {
                let grid = state.grid();
                let me = state.agent(side);
                let mut last = Action::ExploreTile { x: 0, y: 0 };
                for _ in 0..RANDOM_EXPLORE_ATTEMPTS {
                    let x = rng.gen_range(0..grid.width());
                    let y = rng.gen_range(0..grid.height());
                    last = Action::ExploreTile { x, y };
                    if grid.tile(x, y).is_some_and(|tile| can_capture(tile, me)) {
                        break;
                    }
                }
                last
            }
            _ => Action::BuildPeasantHouse,
        }
    }
}
