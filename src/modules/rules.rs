use crate::modules::resource::Amount;

/// Width of the map in tiles.
pub const MAP_WIDTH: i32 = 10;
/// Height of the map in tiles.
pub const MAP_HEIGHT: i32 = 10;

pub const INITIAL_RICE: Amount = 50;
pub const INITIAL_WATER: Amount = 50;
pub const INITIAL_PEASANTS: Amount = 3;

/// Water gathered per peasant by a collect action.
pub const WATER_PER_PEASANT: Amount = 10;
/// Flat water cost of watering the rice field.
pub const WATER_RICE_COST: Amount = 10;
/// Rice every agent gains at the end of each day.
pub const RICE_GROWTH_PER_DAY: Amount = 5;

pub const HOUSE_RICE_COST: Amount = 20;
pub const HOUSE_WATER_COST: Amount = 10;
pub const HOUSE_PEASANT_COST: Amount = 1;
/// Peasants a house produces for its owner each day.
pub const HOUSE_PEASANT_PRODUCTION: Amount = 1;

/// Inclusive bounds for the peasant cost of capturing a tile.
pub const MIN_CAPTURE_COST: Amount = 1;
pub const MAX_CAPTURE_COST: Amount = 5;

/// Fraction of the map an agent must hold to win.
pub const WIN_RATIO: f64 = 0.5;

/// The opponent only builds houses while it has fewer peasants than this.
pub const OPPONENT_HOUSE_PEASANT_LIMIT: Amount = 10;
/// The opponent collects water when its stock drops below this.
pub const OPPONENT_LOW_WATER: Amount = 20;
