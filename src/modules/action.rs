use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::agent::Side;
use crate::modules::grid::Coord;
use crate::modules::resource::{Amount, ResourceKind};

/// The four things an agent may do with its day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CollectWater,
    WaterRice,
    ExploreTile { x: i32, y: i32 },
    BuildPeasantHouse,
}

impl Action {
    pub const fn label(&self) -> &'static str {
        match self {
            Action::CollectWater => "collect_water",
            Action::WaterRice => "water_rice",
            Action::ExploreTile { .. } => "explore_tile",
            Action::BuildPeasantHouse => "build_peasant_house",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ExploreTile { x, y } => write!(f, "explore_tile({}, {})", x, y),
            other => write!(f, "{}", other.label()),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    /// Accepts `collect`, `water`, `explore:X,Y` and `build`, plus the long labels.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (verb, rest) = match trimmed.split_once(':') {
            Some((verb, rest)) => (verb.trim().to_lowercase(), Some(rest)),
            None => (trimmed.to_lowercase(), None),
        };

        match verb.as_str() {
            "collect" | "collect_water" => Ok(Action::CollectWater),
            "water" | "water_rice" => Ok(Action::WaterRice),
            "build" | "build_house" | "build_peasant_house" => Ok(Action::BuildPeasantHouse),
            "explore" | "explore_tile" => {
                let coords = rest.ok_or("explore requires x,y e.g. explore:3,4")?;
                let parts: Vec<_> = coords.split(',').collect();
                if parts.len() != 2 {
                    return Err("explore requires exactly two coordinates".into());
                }
                let x = parts[0]
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| "x must be an integer")?;
                let y = parts[1]
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| "y must be an integer")?;
                Ok(Action::ExploreTile { x, y })
            }
            other => Err(format!(
                "unknown action '{}'; use collect | water | explore:X,Y | build",
                other
            )),
        }
    }
}

/// Why an action was refused. A refused action leaves the game untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,
    #[error("tile ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
    #[error("tile {coord} already belongs to the {owner}")]
    TileOwned { coord: Coord, owner: Side },
    #[error("{side} has insufficient {kind}: required {required}, available {available}")]
    InsufficientResource {
        side: Side,
        kind: ResourceKind,
        required: Amount,
        available: Amount,
    },
}
