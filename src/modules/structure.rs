use std::fmt;

use serde::{Deserialize, Serialize};

use crate::modules::agent::Side;
use crate::modules::resource::{Amount, ResourceKind};
use crate::modules::rules::{
    HOUSE_PEASANT_COST, HOUSE_PEASANT_PRODUCTION, HOUSE_RICE_COST, HOUSE_WATER_COST,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    PeasantHouse,
}

impl BuildingKind {
    /// Construction costs in the order they are charged: rice, water, peasants.
    pub const fn costs(self) -> [(ResourceKind, Amount); 3] {
        match self {
            BuildingKind::PeasantHouse => [
                (ResourceKind::Rice, HOUSE_RICE_COST),
                (ResourceKind::Water, HOUSE_WATER_COST),
                (ResourceKind::Peasants, HOUSE_PEASANT_COST),
            ],
        }
    }

    /// What one building of this kind yields for its owner every day.
    pub const fn daily_yield(self) -> (ResourceKind, Amount) {
        match self {
            BuildingKind::PeasantHouse => (ResourceKind::Peasants, HOUSE_PEASANT_PRODUCTION),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BuildingKind::PeasantHouse => "peasant house",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: u64,
    pub kind: BuildingKind,
    pub owner: Side,
}
