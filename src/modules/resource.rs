use std::fmt;

use serde::{Deserialize, Serialize};

use crate::modules::rules::{INITIAL_PEASANTS, INITIAL_RICE, INITIAL_WATER};

pub type Amount = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Peasants,
    Rice,
    Water,
}

impl ResourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Peasants => "peasants",
            ResourceKind::Rice => "rice",
            ResourceKind::Water => "water",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Stock of every resource kind held by one agent.
///
/// Quantities are unsigned; [`Ledger::deduct`] refuses to go below zero
/// instead of clamping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub peasants: Amount,
    pub rice: Amount,
    pub water: Amount,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::starting()
    }
}

impl Ledger {
    pub const fn new(peasants: Amount, rice: Amount, water: Amount) -> Self {
        Self {
            peasants,
            rice,
            water,
        }
    }

    pub const fn starting() -> Self {
        Self::new(INITIAL_PEASANTS, INITIAL_RICE, INITIAL_WATER)
    }

    pub fn get(&self, kind: ResourceKind) -> Amount {
        match kind {
            ResourceKind::Peasants => self.peasants,
            ResourceKind::Rice => self.rice,
            ResourceKind::Water => self.water,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: Amount) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    pub fn has(&self, kind: ResourceKind, amount: Amount) -> bool {
        self.get(kind) >= amount
    }

    /// Removes `amount` of `kind`. Returns the shortfall as `Err((required, available))`
    /// and leaves the ledger untouched when the stock is too small.
    pub fn deduct(&mut self, kind: ResourceKind, amount: Amount) -> Result<(), (Amount, Amount)> {
        let slot = self.slot_mut(kind);
        if *slot < amount {
            return Err((amount, *slot));
        }
        *slot -= amount;
        Ok(())
    }

    /// First resource in `costs` that the ledger cannot cover, in the order given.
    pub fn first_shortfall(&self, costs: &[(ResourceKind, Amount)]) -> Option<(ResourceKind, Amount)> {
        costs
            .iter()
            .copied()
            .find(|(kind, amount)| !self.has(*kind, *amount))
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut Amount {
        match kind {
            ResourceKind::Peasants => &mut self.peasants,
            ResourceKind::Rice => &mut self.rice,
            ResourceKind::Water => &mut self.water,
        }
    }
}
