use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::modules::agent::{Agent, Side};
use crate::modules::resource::{Amount, ResourceKind};
use crate::modules::rules::{MAX_CAPTURE_COST, MIN_CAPTURE_COST};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One capturable cell. Ownership is the single source of truth for control
/// and only ever moves from unowned to owned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: Coord,
    capture_cost: Amount,
    owner: Option<Side>,
}

impl Tile {
    pub fn new(coord: Coord, capture_cost: Amount) -> Self {
        Self {
            coord,
            capture_cost,
            owner: None,
        }
    }

    pub fn capture_cost(&self) -> Amount {
        self.capture_cost
    }

    pub fn owner(&self) -> Option<Side> {
        self.owner
    }

    pub fn is_controlled(&self) -> bool {
        self.owner.is_some()
    }

    /// Hands a tile to `agent` without charging for it. Used for starting territory.
    pub(crate) fn grant(&mut self, agent: &mut Agent) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(agent.side);
        agent.controlled_tiles += 1;
        true
    }

    pub fn describe(&self, owner_name: Option<&str>) -> String {
        format!(
            "tile {}: capture cost {} peasants, held by {}",
            self.coord,
            self.capture_cost,
            owner_name.unwrap_or("nobody")
        )
    }
}

/// True when the tile is unowned and the agent has enough peasants to take it.
pub fn can_capture(tile: &Tile, agent: &Agent) -> bool {
    !tile.is_controlled() && agent.ledger.has(ResourceKind::Peasants, tile.capture_cost)
}

/// Takes the tile for `agent`, paying its capture cost in peasants.
/// Re-checks [`can_capture`] and does nothing when it fails.
pub fn capture(tile: &mut Tile, agent: &mut Agent) -> bool {
    if !can_capture(tile, agent) {
        return false;
    }
    if agent
        .ledger
        .deduct(ResourceKind::Peasants, tile.capture_cost)
        .is_err()
    {
        return false;
    }
    tile.owner = Some(agent.side);
    agent.controlled_tiles += 1;
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    // Column-major: all of x = 0 first, then x = 1, ...
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a fresh map with capture costs drawn uniformly from the rule range.
    pub fn generate(width: i32, height: i32, rng: &mut impl Rng) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut tiles = Vec::with_capacity((width as usize).saturating_mul(height as usize));
        for x in 0..width {
            for y in 0..height {
                let cost = rng.gen_range(MIN_CAPTURE_COST..=MAX_CAPTURE_COST);
                tiles.push(Tile::new(Coord::new(x, y), cost));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Builds a map from explicit costs, indexed `costs[x][y]`.
    pub fn from_costs(costs: &[Vec<Amount>]) -> Self {
        let width = costs.len() as i32;
        let height = costs.first().map(|col| col.len()).unwrap_or(0) as i32;
        let tiles = costs
            .iter()
            .enumerate()
            .flat_map(|(x, col)| {
                col.iter()
                    .enumerate()
                    .map(move |(y, cost)| Tile::new(Coord::new(x as i32, y as i32), *cost))
            })
            .collect();
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (x * self.height + y) as usize)
    }

    /// Tile at `(x, y)`, or `None` outside the map.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).and_then(|idx| self.tiles.get(idx))
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).and_then(move |idx| self.tiles.get_mut(idx))
    }

    /// Every tile, x ascending then y ascending.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn owned_by(&self, side: Side) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.owner == Some(side))
            .count()
    }

    pub fn owned_total(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_controlled()).count()
    }

    /// Checks the layout a deserialised grid claims to have.
    pub fn validate(&self) -> Result<(), String> {
        if self.width <= 0 || self.height <= 0 {
            return Err(format!(
                "grid dimensions must be positive (got {}x{})",
                self.width, self.height
            ));
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| format!("grid {}x{} is too large", self.width, self.height))?
            as usize;
        if self.tiles.len() != expected {
            return Err(format!(
                "grid {}x{} should hold {} tiles, found {}",
                self.width,
                self.height,
                expected,
                self.tiles.len()
            ));
        }
        for (idx, tile) in self.tiles.iter().enumerate() {
            let x = idx as i32 / self.height;
            let y = idx as i32 % self.height;
            if tile.coord != Coord::new(x, y) {
                return Err(format!(
                    "tile at slot {} claims coordinates {}, expected ({}, {})",
                    idx, tile.coord, x, y
                ));
            }
            if !(MIN_CAPTURE_COST..=MAX_CAPTURE_COST).contains(&tile.capture_cost) {
                return Err(format!(
                    "tile {} has capture cost {} outside {}..={}",
                    tile.coord, tile.capture_cost, MIN_CAPTURE_COST, MAX_CAPTURE_COST
                ));
            }
        }
        Ok(())
    }
}

/// Heuristic worth of a tile: closer to the centre and cheaper is better.
/// Reported for diagnostics only; no decision reads it.
pub fn tile_value(tile: &Tile, grid: &Grid) -> f64 {
    let center_x = (grid.width() / 2) as f64;
    let center_y = (grid.height() / 2) as f64;
    let dx = tile.coord.x as f64 - center_x;
    let dy = tile.coord.y as f64 - center_y;
    let distance = (dx * dx + dy * dy).sqrt();
    let proximity = (grid.width() as f64 - distance) * 10.0;
    let cheapness = (10.0 - tile.capture_cost() as f64) * 5.0;
    proximity + cheapness
}
