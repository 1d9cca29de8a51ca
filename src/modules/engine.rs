use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::modules::action::{Action, ActionError};
use crate::modules::agent::{Agent, Side};
use crate::modules::config::GameConfig;
use crate::modules::grid::{Coord, Tile, capture};
use crate::modules::policy::OpponentPolicy;
use crate::modules::resource::{Amount, Ledger, ResourceKind};
use crate::modules::rules::{RICE_GROWTH_PER_DAY, WATER_PER_PEASANT, WATER_RICE_COST, WIN_RATIO};
use crate::modules::save::{SaveBundle, SaveError};
use crate::modules::state::GameState;
use crate::modules::stats::GameStatistics;
use crate::modules::structure::{Building, BuildingKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    DayStarted {
        day: u32,
    },
    WaterCollected {
        side: Side,
        amount: Amount,
    },
    RiceWatered {
        side: Side,
        water_spent: Amount,
    },
    TileCaptured {
        side: Side,
        coord: Coord,
        cost: Amount,
    },
    BuildingBuilt {
        side: Side,
        kind: BuildingKind,
        building_id: u64,
    },
    ResourceProduced {
        side: Side,
        kind: ResourceKind,
        amount: Amount,
        building_id: u64,
    },
    RiceGrown {
        side: Side,
        amount: Amount,
    },
    OpponentActed {
        action: Action,
    },
    OpponentRejected {
        action: Action,
        error: ActionError,
    },
    GameWon {
        winner: Side,
        tiles: u32,
        total_tiles: usize,
    },
    DayCompleted {
        day: u32,
    },
}

/// What happened during one completed day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayReport {
    /// The day that just ended.
    pub day: u32,
    pub player_action: Action,
    pub opponent_action: Action,
    pub opponent_error: Option<ActionError>,
    pub events: Vec<Event>,
    pub winner: Option<Side>,
}

/// The turn engine. Each successful player action completes one day:
/// building output, rice growth, the opponent's move, statistics and the
/// victory check all happen before the call returns.
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    policy: Box<dyn OpponentPolicy>,
    rng: StdRng,
    seed: Option<u64>,
    stats: GameStatistics,
}

impl Engine {
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = seeded_rng(config.seed);
        let state = GameState::new(&config.player_name, &config.opponent_name, &mut rng);
        info!(
            width = state.grid().width(),
            height = state.grid().height(),
            policy = %config.policy,
            "new game initialised"
        );
        Self::assemble(state, config.policy.build(), rng, config.seed)
    }

    /// Wraps an existing state, typically one built by hand for a scenario.
    pub fn with_state(state: GameState, policy: Box<dyn OpponentPolicy>, seed: u64) -> Self {
        Self::assemble(state, policy, StdRng::seed_from_u64(seed), Some(seed))
    }

    /// Builds an engine around a previously exported game.
    pub fn resume(bundle: SaveBundle, config: &GameConfig) -> Result<Self, SaveError> {
        let mut engine = Self::new(config);
        engine.import(bundle)?;
        Ok(engine)
    }

    fn assemble(
        state: GameState,
        policy: Box<dyn OpponentPolicy>,
        rng: StdRng,
        seed: Option<u64>,
    ) -> Self {
        let mut engine = Self {
            state,
            policy,
            rng,
            seed,
            stats: GameStatistics::default(),
        };
        engine.record_statistics();
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn day(&self) -> u32 {
        self.state.day()
    }

    pub fn agent(&self, side: Side) -> &Agent {
        self.state.agent(side)
    }

    /// Direct access to an agent's stock. Tiles and buildings stay engine-owned.
    pub fn ledger_mut(&mut self, side: Side) -> &mut Ledger {
        &mut self.state.agent_mut(side).ledger
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.state.grid().tile(x, y)
    }

    pub fn tile_description(&self, x: i32, y: i32) -> String {
        match self.tile(x, y) {
            None => "unknown territory".to_string(),
            Some(tile) => {
                let owner = tile.owner().map(|side| self.agent(side).name.as_str());
                tile.describe(owner)
            }
        }
    }

    pub fn buildings(&self) -> &[Building] {
        self.state.buildings()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.stats
    }

    /// Carries a history recorded by an earlier process over to this engine.
    pub fn resume_statistics(&mut self, stats: GameStatistics) {
        self.stats = stats;
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Applies `action` for the player and, on success, runs the rest of the day.
    /// A `false` return means nothing changed.
    pub fn perform_action(&mut self, action: Action) -> bool {
        match self.try_action(action) {
            Ok(_) => true,
            Err(err) => {
                warn!(action = %action, "action rejected: {}", err);
                false
            }
        }
    }

    pub fn try_action(&mut self, action: Action) -> Result<DayReport, ActionError> {
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }

        let mut events = vec![Event::DayStarted {
            day: self.state.day,
        }];
        events.extend(self.apply(Side::Player, action)?);
        self.stats.record_action(Side::Player, &action);
        Ok(self.end_day(action, events))
    }

    /// Plays `actions` in order and hands every completed day to `hook`.
    /// Stops at the first rejected action and returns it with the reason;
    /// otherwise returns the number of days played.
    pub fn play_with_hook<I, F>(&mut self, actions: I, mut hook: F) -> Result<usize, (Action, ActionError)>
    where
        I: IntoIterator<Item = Action>,
        F: FnMut(&Engine, &DayReport),
    {
        let mut played = 0;
        for action in actions {
            let report = self.try_action(action).map_err(|err| (action, err))?;
            hook(self, &report);
            played += 1;
        }
        Ok(played)
    }

    /// Validates `action` for `side` and only then mutates. Every rejection
    /// leaves the state as it was.
    fn apply(&mut self, side: Side, action: Action) -> Result<Vec<Event>, ActionError> {
        let mut events = Vec::new();

        match action {
            Action::CollectWater => {
                let agent = self.state.agent_mut(side);
                let amount = agent.peasants().saturating_mul(WATER_PER_PEASANT);
                agent.ledger.add(ResourceKind::Water, amount);
                events.push(Event::WaterCollected { side, amount });
            }
            Action::WaterRice => {
                let agent = self.state.agent_mut(side);
                agent
                    .ledger
                    .deduct(ResourceKind::Water, WATER_RICE_COST)
                    .map_err(|(required, available)| ActionError::InsufficientResource {
                        side,
                        kind: ResourceKind::Water,
                        required,
                        available,
                    })?;
                events.push(Event::RiceWatered {
                    side,
                    water_spent: WATER_RICE_COST,
                });
            }
            Action::ExploreTile { x, y } => {
                let (agent, grid) = self.state.agent_and_grid_mut(side);
                let tile = grid
                    .tile_mut(x, y)
                    .ok_or(ActionError::OutOfBounds { x, y })?;
                if let Some(owner) = tile.owner() {
                    return Err(ActionError::TileOwned {
                        coord: tile.coord,
                        owner,
                    });
                }
                let cost = tile.capture_cost();
                let insufficient = ActionError::InsufficientResource {
                    side,
                    kind: ResourceKind::Peasants,
                    required: cost,
                    available: agent.peasants(),
                };
                if !capture(tile, agent) {
                    return Err(insufficient);
                }
                events.push(Event::TileCaptured {
                    side,
                    coord: tile.coord,
                    cost,
                });
            }
            Action::BuildPeasantHouse => {
                let kind = BuildingKind::PeasantHouse;
                let costs = kind.costs();
                let agent = self.state.agent_mut(side);
                if let Some((resource, required)) = agent.ledger.first_shortfall(&costs) {
                    return Err(ActionError::InsufficientResource {
                        side,
                        kind: resource,
                        required,
                        available: agent.resource(resource),
                    });
                }
                for (resource, amount) in costs {
                    agent
                        .ledger
                        .deduct(resource, amount)
                        .map_err(|(required, available)| ActionError::InsufficientResource {
                            side,
                            kind: resource,
                            required,
                            available,
                        })?;
                }

                let building_id = self.state.next_building_id();
                self.state.buildings.push(Building {
                    id: building_id,
                    kind,
                    owner: side,
                });
                events.push(Event::BuildingBuilt {
                    side,
                    kind,
                    building_id,
                });
            }
        }

        for event in &events {
            debug!(?event, "applied");
        }
        Ok(events)
    }

    fn end_day(&mut self, player_action: Action, mut events: Vec<Event>) -> DayReport {
        let day = self.state.day;

        for building in &self.state.buildings {
            let (kind, amount) = building.kind.daily_yield();
            let owner = match building.owner {
                Side::Player => &mut self.state.player,
                Side::Opponent => &mut self.state.opponent,
            };
            owner.ledger.add(kind, amount);
            events.push(Event::ResourceProduced {
                side: building.owner,
                kind,
                amount,
                building_id: building.id,
            });
        }

        for side in Side::BOTH {
            self.state
                .agent_mut(side)
                .ledger
                .add(ResourceKind::Rice, RICE_GROWTH_PER_DAY);
            events.push(Event::RiceGrown {
                side,
                amount: RICE_GROWTH_PER_DAY,
            });
        }

        let opponent_action = self
            .policy
            .choose(&self.state, Side::Opponent, &mut self.rng);
        let opponent_error = match self.apply(Side::Opponent, opponent_action) {
            Ok(mut applied) => {
                self.stats.record_action(Side::Opponent, &opponent_action);
                events.push(Event::OpponentActed {
                    action: opponent_action,
                });
                events.append(&mut applied);
                None
            }
            Err(error) => {
                debug!(action = %opponent_action, "opponent action rejected: {}", error);
                events.push(Event::OpponentRejected {
                    action: opponent_action,
                    error: error.clone(),
                });
                Some(error)
            }
        };

        self.record_statistics();

        if let Some(event) = self.check_victory() {
            events.push(event);
        }

        self.state.day += 1;
        events.push(Event::DayCompleted { day });
        info!(
            day,
            player_action = %player_action,
            opponent_action = %opponent_action,
            "day completed"
        );

        DayReport {
            day,
            player_action,
            opponent_action,
            opponent_error,
            events,
            winner: self.state.winner,
        }
    }

    fn record_statistics(&mut self) {
        self.stats.record_snapshot(&self.state.player);
        self.stats.record_snapshot(&self.state.opponent);
    }

    /// Ends the game when either side holds at least the winning share of the
    /// map. The player is checked first. A finished game stays finished.
    fn check_victory(&mut self) -> Option<Event> {
        if self.state.is_over() {
            return None;
        }

        let total_tiles = self.state.grid().total_tiles();
        for side in Side::BOTH {
            let ratio = self.state.control_ratio(side);
            if ratio >= WIN_RATIO {
                self.state.winner = Some(side);
                let tiles = self.state.agent(side).controlled_tiles();
                info!(
                    winner = %side,
                    tiles,
                    total_tiles,
                    percent = ratio * 100.0,
                    "game won"
                );
                return Some(Event::GameWon {
                    winner: side,
                    tiles,
                    total_tiles,
                });
            }
        }
        None
    }

    pub fn export(&self) -> GameState {
        self.state.clone()
    }

    pub fn export_bundle(&self) -> SaveBundle {
        SaveBundle::new(self.export())
    }

    /// Verifies `bundle` and restores its state.
    pub fn import(&mut self, bundle: SaveBundle) -> Result<(), SaveError> {
        if let Err(err) = bundle.verify() {
            warn!("save rejected: {}", err);
            return Err(err);
        }
        self.restore(bundle.state)
    }

    /// Replaces the whole game with `state` in one step. The state is checked
    /// first; on error the engine is left exactly as it was. Afterwards the
    /// winner is recomputed from the restored tile counts and statistics
    /// restart from the restored day.
    pub fn restore(&mut self, state: GameState) -> Result<(), SaveError> {
        if let Err(reason) = state.validate() {
            warn!("state rejected: {}", reason);
            return Err(SaveError::Invalid(reason));
        }

        self.state = state;
        self.state.winner = None;
        self.rng = seeded_rng(self.seed.map(|seed| seed.wrapping_add(self.state.day as u64)));
        self.check_victory();
        self.stats = GameStatistics::default();
        self.record_statistics();
        info!(day = self.state.day, winner = ?self.state.winner, "game restored");
        Ok(())
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::grid::Grid;
    use crate::modules::policy::{GreedyPolicy, PolicyKind};

    fn new_engine(seed: u64) -> Engine {
        Engine::new(&GameConfig::default().with_seed(seed))
    }

    fn flat_engine(cost: Amount) -> Engine {
        let grid = Grid::from_costs(&vec![vec![cost; 10]; 10]);
        let state = GameState::with_grid("Player", "Computer", grid);
        Engine::with_state(state, Box::new(GreedyPolicy), 11)
    }

    /// Hands `count` extra unowned tiles to `side` without charging.
    fn grant_tiles(state: &mut GameState, side: Side, count: usize) {
        let (agent, grid) = state.agent_and_grid_mut(side);
        let mut granted = 0;
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                if granted == count {
                    return;
                }
                if let Some(tile) = grid.tile_mut(x, y) {
                    if tile.grant(agent) {
                        granted += 1;
                    }
                }
            }
        }
    }

    #[test]
    fn initial_state() {
        let engine = new_engine(1);
        assert_eq!(engine.day(), 1);
        let player = engine.agent(Side::Player);
        assert_eq!(player.resource(ResourceKind::Rice), 50);
        assert_eq!(player.resource(ResourceKind::Water), 50);
        assert_eq!(player.resource(ResourceKind::Peasants), 3);
        assert_eq!(engine.state().grid().owned_by(Side::Player), 1);
        assert_eq!(engine.state().grid().owned_by(Side::Opponent), 1);
        assert!(!engine.is_over());
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.statistics().total_days(), 1);
    }

    #[test]
    fn watering_success_spends_water_and_ends_the_day() {
        let mut engine = new_engine(2);
        engine.ledger_mut(Side::Player).water = 20;

        assert!(engine.perform_action(Action::WaterRice));
        assert_eq!(engine.agent(Side::Player).resource(ResourceKind::Water), 10);
        assert_eq!(engine.day(), 2);
    }

    #[test]
    fn watering_failure_changes_nothing() {
        let mut engine = new_engine(3);
        engine.ledger_mut(Side::Player).water = 5;
        let before = engine.export();

        assert!(!engine.perform_action(Action::WaterRice));
        assert_eq!(engine.agent(Side::Player).resource(ResourceKind::Water), 5);
        assert_eq!(engine.day(), 1);
        assert_eq!(engine.export(), before);
        assert_eq!(engine.statistics().total_days(), 1);
    }

    #[test]
    fn building_a_house_charges_and_registers_it() {
        let mut engine = new_engine(4);
        let ledger = engine.ledger_mut(Side::Player);
        ledger.rice = 50;
        ledger.water = 50;
        ledger.peasants = 10;

        let report = engine.try_action(Action::BuildPeasantHouse).unwrap();
        let player = engine.agent(Side::Player);
        assert_eq!(player.resource(ResourceKind::Rice), 35);
        assert_eq!(player.resource(ResourceKind::Water), 40);
        // 10 - 1 for the house + 1 produced by it the same evening
        assert_eq!(player.resource(ResourceKind::Peasants), 10);
        assert_eq!(engine.buildings()[0].owner, Side::Player);
        assert_eq!(engine.buildings()[0].kind, BuildingKind::PeasantHouse);
        assert!(report.events.iter().any(|e| matches!(
            e,
            Event::BuildingBuilt { side: Side::Player, .. }
        )));
    }

    #[test]
    fn house_build_is_all_or_nothing() {
        let mut engine = new_engine(5);
        let ledger = engine.ledger_mut(Side::Player);
        ledger.rice = 50;
        ledger.water = 5;
        ledger.peasants = 10;
        let before = engine.export();

        let err = engine.try_action(Action::BuildPeasantHouse).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientResource {
                side: Side::Player,
                kind: ResourceKind::Water,
                required: 10,
                available: 5,
            }
        );
        assert_eq!(engine.export(), before);
        assert!(engine.buildings().is_empty());
    }

    #[test]
    fn out_of_bounds_exploration_always_fails() {
        let mut engine = new_engine(6);
        engine.ledger_mut(Side::Player).peasants = 1_000;
        let before = engine.export();

        assert!(!engine.perform_action(Action::ExploreTile { x: -1, y: -1 }));
        assert!(!engine.perform_action(Action::ExploreTile { x: 10, y: 0 }));
        assert_eq!(
            engine.try_action(Action::ExploreTile { x: 0, y: 10 }),
            Err(ActionError::OutOfBounds { x: 0, y: 10 })
        );
        assert_eq!(engine.export(), before);
    }

    #[test]
    fn exploring_captures_the_tile() {
        let mut engine = flat_engine(2);
        assert!(engine.perform_action(Action::ExploreTile { x: 5, y: 5 }));

        let tile = engine.tile(5, 5).unwrap();
        assert_eq!(tile.owner(), Some(Side::Player));
        let player = engine.agent(Side::Player);
        assert_eq!(player.controlled_tiles(), 2);
        assert_eq!(player.peasants(), 1);
        assert!(engine.state().validate().is_ok());
    }

    #[test]
    fn owned_tiles_cannot_be_explored() {
        let mut engine = flat_engine(1);
        engine.ledger_mut(Side::Player).peasants = 50;

        assert_eq!(
            engine.try_action(Action::ExploreTile { x: 0, y: 0 }),
            Err(ActionError::TileOwned {
                coord: Coord::new(0, 0),
                owner: Side::Opponent
            })
        );
        assert_eq!(engine.tile(0, 0).and_then(|t| t.owner()), Some(Side::Opponent));
        assert_eq!(engine.agent(Side::Player).peasants(), 50);
    }

    #[test]
    fn exploring_without_enough_peasants_fails() {
        let mut engine = flat_engine(4);
        assert!(matches!(
            engine.try_action(Action::ExploreTile { x: 3, y: 3 }),
            Err(ActionError::InsufficientResource {
                kind: ResourceKind::Peasants,
                required: 4,
                available: 3,
                ..
            })
        ));
        assert_eq!(engine.tile(3, 3).and_then(|t| t.owner()), None);
    }

    #[test]
    fn collecting_with_no_peasants_still_ends_the_day() {
        let mut engine = new_engine(7);
        engine.ledger_mut(Side::Player).peasants = 0;
        let water = engine.agent(Side::Player).resource(ResourceKind::Water);

        let report = engine.try_action(Action::CollectWater).unwrap();
        assert_eq!(engine.agent(Side::Player).resource(ResourceKind::Water), water);
        assert_eq!(engine.day(), 2);
        assert!(report.events.contains(&Event::WaterCollected {
            side: Side::Player,
            amount: 0
        }));
    }

    #[test]
    fn collecting_scales_with_peasants() {
        let mut engine = new_engine(8);
        assert!(engine.perform_action(Action::CollectWater));
        assert_eq!(engine.agent(Side::Player).resource(ResourceKind::Water), 80);
        assert_eq!(engine.agent(Side::Player).resource(ResourceKind::Rice), 55);
    }

    #[test]
    fn opponent_moves_once_per_day() {
        let mut engine = flat_engine(1);
        let report = engine.try_action(Action::CollectWater).unwrap();

        // 50/50/3 and fewer than 10 peasants: the greedy opponent builds.
        assert_eq!(report.opponent_action, Action::BuildPeasantHouse);
        assert_eq!(report.opponent_error, None);
        assert_eq!(engine.statistics().actions(Side::Opponent).build_count, 1);
        assert_eq!(engine.buildings().len(), 1);
        assert_eq!(engine.buildings()[0].owner, Side::Opponent);
        assert_eq!(
            report.events.last(),
            Some(&Event::DayCompleted { day: 1 })
        );
    }

    #[test]
    fn statistics_grow_by_one_sample_per_day() {
        let mut engine = new_engine(9);
        for _ in 0..4 {
            assert!(engine.perform_action(Action::CollectWater));
        }
        assert!(!engine.perform_action(Action::ExploreTile { x: -5, y: 0 }));

        let stats = engine.statistics();
        assert_eq!(stats.history(Side::Player).len(), 5);
        assert_eq!(stats.history(Side::Opponent).len(), 5);
        assert_eq!(stats.actions(Side::Player).collect_count, 4);
        let latest = stats.latest(Side::Player).unwrap();
        assert_eq!(latest.water, engine.agent(Side::Player).resource(ResourceKind::Water));
    }

    #[test]
    fn victory_needs_half_of_the_map() {
        let mut state = GameState::with_grid(
            "Player",
            "Computer",
            Grid::from_costs(&vec![vec![1; 10]; 10]),
        );
        grant_tiles(&mut state, Side::Player, 48);
        let mut engine = Engine::with_state(state, Box::new(GreedyPolicy), 5);
        assert_eq!(engine.agent(Side::Player).controlled_tiles(), 49);

        assert!(engine.perform_action(Action::CollectWater));
        assert!(!engine.is_over());

        let (x, y) = engine
            .state()
            .grid()
            .tiles()
            .find(|t| t.owner().is_none())
            .map(|t| (t.coord.x, t.coord.y))
            .unwrap();
        let report = engine.try_action(Action::ExploreTile { x, y }).unwrap();
        assert_eq!(engine.agent(Side::Player).controlled_tiles(), 50);
        assert!(engine.is_over());
        assert_eq!(engine.winner(), Some(Side::Player));
        assert_eq!(report.winner, Some(Side::Player));
        assert_eq!(engine.day(), 3);
        assert!(report.events.iter().any(|e| matches!(
            e,
            Event::GameWon { winner: Side::Player, tiles: 50, total_tiles: 100 }
        )));
    }

    #[test]
    fn player_wins_a_simultaneous_majority() {
        let mut state = GameState::with_grid(
            "Player",
            "Computer",
            Grid::from_costs(&vec![vec![1; 10]; 10]),
        );
        grant_tiles(&mut state, Side::Player, 49);
        grant_tiles(&mut state, Side::Opponent, 49);
        let mut engine = Engine::with_state(state, Box::new(GreedyPolicy), 5);

        assert!(engine.check_victory().is_some());
        assert_eq!(engine.winner(), Some(Side::Player));
    }

    #[test]
    fn opponent_majority_ends_the_game() {
        let mut state = GameState::with_grid(
            "Player",
            "Computer",
            Grid::from_costs(&vec![vec![1; 10]; 10]),
        );
        grant_tiles(&mut state, Side::Opponent, 49);
        let mut engine = Engine::with_state(state, Box::new(GreedyPolicy), 5);

        assert!(engine.check_victory().is_some());
        assert_eq!(engine.winner(), Some(Side::Opponent));
        assert!(engine.check_victory().is_none());
    }

    #[test]
    fn finished_game_refuses_actions() {
        let mut state = GameState::with_grid(
            "Player",
            "Computer",
            Grid::from_costs(&vec![vec![1; 10]; 10]),
        );
        grant_tiles(&mut state, Side::Player, 49);
        state.winner = Some(Side::Player);
        let mut engine = Engine::with_state(state, Box::new(GreedyPolicy), 5);
        let before = engine.export();

        assert_eq!(engine.try_action(Action::CollectWater), Err(ActionError::GameOver));
        assert!(!engine.perform_action(Action::CollectWater));
        assert_eq!(engine.export(), before);
    }

    #[test]
    fn restore_rejects_inconsistent_state_and_keeps_current_game() {
        let mut engine = new_engine(10);
        assert!(engine.perform_action(Action::CollectWater));
        let before = engine.export();

        let mut broken = before.clone();
        broken.player.controlled_tiles = 7;
        assert!(matches!(engine.restore(broken), Err(SaveError::Invalid(_))));
        assert_eq!(engine.export(), before);
    }

    #[test]
    fn restore_rechecks_victory() {
        let mut state = GameState::with_grid(
            "Player",
            "Computer",
            Grid::from_costs(&vec![vec![1; 10]; 10]),
        );
        grant_tiles(&mut state, Side::Player, 49);
        state.day = 12;

        let mut engine = new_engine(11);
        engine.restore(state).unwrap();
        assert_eq!(engine.day(), 12);
        assert_eq!(engine.winner(), Some(Side::Player));
        assert_eq!(engine.statistics().total_days(), 1);
    }

    #[test]
    fn restore_clears_a_winner_the_map_does_not_support() {
        let mut state = new_engine(14).export();
        state.winner = Some(Side::Opponent);

        let mut engine = new_engine(15);
        engine.import(SaveBundle::new(state)).unwrap();
        assert!(!engine.is_over());
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.agent(Side::Opponent).controlled_tiles(), 1);
        assert!(engine.perform_action(Action::CollectWater));
    }

    #[test]
    fn resume_builds_an_engine_from_a_bundle() {
        let mut original = new_engine(16);
        assert!(original.perform_action(Action::CollectWater));
        let config = GameConfig::default().with_seed(16);

        let resumed = Engine::resume(original.export_bundle(), &config).unwrap();
        assert_eq!(resumed.export(), original.export());

        let mut tampered = original.export_bundle();
        tampered.checksum.clear();
        assert!(matches!(
            Engine::resume(tampered, &config),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn same_seed_same_game() {
        let config = GameConfig::default().with_seed(99).with_policy(PolicyKind::Greedy);
        let mut a = Engine::new(&config);
        let mut b = Engine::new(&config);
        for action in [
            Action::CollectWater,
            Action::WaterRice,
            Action::BuildPeasantHouse,
            Action::CollectWater,
        ] {
            assert_eq!(a.perform_action(action), b.perform_action(action));
        }
        assert_eq!(a.export(), b.export());
    }

    #[test]
    fn hook_sees_every_day_until_a_rejection() {
        let mut engine = new_engine(12);
        engine.ledger_mut(Side::Player).water = 10;
        let mut days = Vec::new();

        let result = engine.play_with_hook(
            [
                Action::CollectWater,
                Action::WaterRice,
                Action::ExploreTile { x: 42, y: 0 },
                Action::CollectWater,
            ],
            |engine, report| days.push((report.day, engine.day())),
        );

        assert_eq!(
            result,
            Err((
                Action::ExploreTile { x: 42, y: 0 },
                ActionError::OutOfBounds { x: 42, y: 0 }
            ))
        );
        assert_eq!(days, vec![(1, 2), (2, 3)]);
        assert_eq!(engine.day(), 3);
    }

    #[test]
    fn day_report_opens_with_day_started() {
        let mut engine = new_engine(13);
        let report = engine.try_action(Action::CollectWater).unwrap();
        assert_eq!(report.events.first(), Some(&Event::DayStarted { day: 1 }));
    }

    #[test]
    fn tile_description_handles_unknown_coordinates() {
        let engine = flat_engine(3);
        assert_eq!(engine.tile_description(-1, 4), "unknown territory");
        assert_eq!(
            engine.tile_description(0, 0),
            "tile (0, 0): capture cost 3 peasants, held by Computer"
        );
    }
}
