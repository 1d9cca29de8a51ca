use serde::{Deserialize, Serialize};

use crate::modules::action::Action;
use crate::modules::agent::{Agent, Side};
use crate::modules::resource::Amount;

/// One row of an agent's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSample {
    pub rice: Amount,
    pub water: Amount,
    pub peasants: Amount,
    pub tiles: u32,
}

impl AgentSample {
    pub fn of(agent: &Agent) -> Self {
        Self {
            rice: agent.ledger.rice,
            water: agent.ledger.water,
            peasants: agent.ledger.peasants,
            tiles: agent.controlled_tiles(),
        }
    }
}

/// Count of successful actions per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStats {
    pub collect_count: u64,
    pub water_count: u64,
    pub explore_count: u64,
    pub build_count: u64,
}

impl ActionStats {
    pub fn record(&mut self, action: &Action) {
        match action {
            Action::CollectWater => self.collect_count = self.collect_count.saturating_add(1),
            Action::WaterRice => self.water_count = self.water_count.saturating_add(1),
            Action::ExploreTile { .. } => self.explore_count = self.explore_count.saturating_add(1),
            Action::BuildPeasantHouse => self.build_count = self.build_count.saturating_add(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.collect_count + self.water_count + self.explore_count + self.build_count
    }
}

/// Per-side resource history, one sample per recorded day, plus action tallies.
/// Consumed by charting and reports outside the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub player: Vec<AgentSample>,
    pub opponent: Vec<AgentSample>,
    #[serde(default)]
    pub player_actions: ActionStats,
    #[serde(default)]
    pub opponent_actions: ActionStats,
}

impl GameStatistics {
    /// Appends the agent's current stock to its own series.
    pub fn record_snapshot(&mut self, agent: &Agent) {
        let sample = AgentSample::of(agent);
        match agent.side {
            Side::Player => self.player.push(sample),
            Side::Opponent => self.opponent.push(sample),
        }
    }

    pub fn record_action(&mut self, side: Side, action: &Action) {
        match side {
            Side::Player => self.player_actions.record(action),
            Side::Opponent => self.opponent_actions.record(action),
        }
    }

    pub fn history(&self, side: Side) -> &[AgentSample] {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn actions(&self, side: Side) -> &ActionStats {
        match side {
            Side::Player => &self.player_actions,
            Side::Opponent => &self.opponent_actions,
        }
    }

    /// Number of days with a recorded sample.
    pub fn total_days(&self) -> usize {
        self.player.len()
    }

    pub fn latest(&self, side: Side) -> Option<&AgentSample> {
        self.history(side).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_go_to_the_agent_series() {
        let mut stats = GameStatistics::default();
        let mut player = Agent::new(Side::Player, "Player");
        let opponent = Agent::new(Side::Opponent, "Computer");

        stats.record_snapshot(&player);
        player.ledger.rice = 77;
        stats.record_snapshot(&player);
        stats.record_snapshot(&opponent);

        assert_eq!(stats.history(Side::Player).len(), 2);
        assert_eq!(stats.history(Side::Opponent).len(), 1);
        assert_eq!(stats.latest(Side::Player).map(|s| s.rice), Some(77));
        assert_eq!(stats.total_days(), 2);
    }

    #[test]
    fn action_tallies_by_kind() {
        let mut stats = GameStatistics::default();
        stats.record_action(Side::Player, &Action::CollectWater);
        stats.record_action(Side::Player, &Action::ExploreTile { x: 1, y: 1 });
        stats.record_action(Side::Opponent, &Action::BuildPeasantHouse);

        assert_eq!(stats.actions(Side::Player).collect_count, 1);
        assert_eq!(stats.actions(Side::Player).explore_count, 1);
        assert_eq!(stats.actions(Side::Player).total(), 2);
        assert_eq!(stats.actions(Side::Opponent).build_count, 1);
    }
}
