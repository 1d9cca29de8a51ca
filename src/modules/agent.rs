use std::fmt;

use serde::{Deserialize, Serialize};

use crate::modules::resource::{Amount, Ledger, ResourceKind};

/// Which of the two competitors an agent, tile or building belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub const fn label(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Opponent => "opponent",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One competitor. The human player and the scripted opponent share this type;
/// only the engine decides who chooses its actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub side: Side,
    pub name: String,
    pub ledger: Ledger,
    pub(crate) controlled_tiles: u32,
}

impl Agent {
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
            ledger: Ledger::starting(),
            controlled_tiles: 0,
        }
    }

    pub fn resource(&self, kind: ResourceKind) -> Amount {
        self.ledger.get(kind)
    }

    pub fn peasants(&self) -> Amount {
        self.ledger.peasants
    }

    /// Number of tiles this agent owns. Kept in step with the grid by tile capture.
    pub fn controlled_tiles(&self) -> u32 {
        self.controlled_tiles
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: rice={}, water={}, peasants={}, tiles={}",
            self.name, self.ledger.rice, self.ledger.water, self.ledger.peasants, self.controlled_tiles
        )
    }
}
