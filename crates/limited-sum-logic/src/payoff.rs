//! The limited-sum payoff rule
//!
//! Both players pick an action in `0..actions`. If the sum of the two
//! actions stays under the threshold each player earns its own action,
//! otherwise both earn nothing.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::{Action, Payoff};

/// Size of the action range and the sum threshold of a game variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of actions; valid actions are `0..actions`
    pub actions: u8,
    /// Payoffs are zeroed once `a1 + a2 >= threshold`
    pub threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { actions: 6, threshold: 5 }
    }
}

/// A configured limited-sum game with its precomputed payoff table
#[derive(Clone, Debug, PartialEq)]
pub struct LimitedSumGame {
    config: GameConfig,
    /// Row-major `actions × actions` table, entry `a1 * actions + a2`
    table: Vec<(Payoff, Payoff)>,
}

impl LimitedSumGame {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        if config.actions == 0 {
            return Err(GameError::EmptyActionRange);
        }
        Ok(Self::build(config))
    }

    /// Actions `0..=5`, threshold 5
    pub fn standard() -> Self {
        Self::build(GameConfig::default())
    }

    fn build(config: GameConfig) -> Self {
        let mut game = Self { config, table: Vec::new() };
        let n = config.actions as usize;
        let mut table = Vec::with_capacity(n * n);
        for a1 in game.actions() {
            for a2 in game.actions() {
                table.push(game.evaluate(a1, a2));
            }
        }
        game.table = table;
        game
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn action_count(&self) -> u8 {
        self.config.actions
    }

    pub fn max_action(&self) -> Action {
        self.config.actions - 1
    }

    pub fn threshold(&self) -> u32 {
        self.config.threshold
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> {
        0..self.config.actions
    }

    pub fn contains(&self, action: Action) -> bool {
        action < self.config.actions
    }

    /// Apply the payoff rule to an ordered pair of actions.
    ///
    /// # Panics
    /// If either action is outside the game's range. Callers validate
    /// strategy output before it reaches the rule.
    pub fn evaluate(&self, a1: Action, a2: Action) -> (Payoff, Payoff) {
        assert!(
            self.contains(a1) && self.contains(a2),
            "actions ({}, {}) outside 0..{}",
            a1,
            a2,
            self.config.actions
        );
        if (a1 as u32) + (a2 as u32) < self.config.threshold {
            (a1 as Payoff, a2 as Payoff)
        } else {
            (0.0, 0.0)
        }
    }

    /// Table lookup of [`evaluate`](Self::evaluate); same panics.
    pub fn payoff(&self, a1: Action, a2: Action) -> (Payoff, Payoff) {
        assert!(
            self.contains(a1) && self.contains(a2),
            "actions ({}, {}) outside 0..{}",
            a1,
            a2,
            self.config.actions
        );
        self.table[a1 as usize * self.config.actions as usize + a2 as usize]
    }

    /// Dense payoff matrix, indexed `[a1][a2]`
    pub fn payoff_matrix(&self) -> Vec<Vec<(Payoff, Payoff)>> {
        self.table
            .chunks(self.config.actions as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl Default for LimitedSumGame {
    fn default() -> Self {
        Self::standard()
    }
}
