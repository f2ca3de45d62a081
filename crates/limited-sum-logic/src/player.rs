//! Named participants and their action histories

use std::fmt;

use crate::error::GameError;
use crate::payoff::LimitedSumGame;
use crate::random::SeededRng;
use crate::strategy::{RoundView, Strategy};
use crate::{Action, Payoff};

/// A named player: a strategy plus the actions it has played this match.
///
/// `Clone` is a deep copy, strategy state included.
#[derive(Clone)]
pub struct Participant {
    name: String,
    strategy: Box<dyn Strategy>,
    /// One entry per completed round, append-only within a match
    history: Vec<Action>,
}

impl Participant {
    pub fn new(name: impl Into<String>, strategy: impl Strategy + 'static) -> Self {
        Self::from_boxed(name, Box::new(strategy))
    }

    pub fn from_boxed(name: impl Into<String>, strategy: Box<dyn Strategy>) -> Self {
        Self { name: name.into(), strategy, history: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> &[Action] {
        &self.history
    }

    pub fn last_action(&self) -> Option<Action> {
        self.history.last().copied()
    }

    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }

    /// Ask the strategy for this round's intended action.
    ///
    /// The view exposes both histories as they stand before the round.
    /// Output outside the game's range is rejected, never clamped.
    pub fn decide(
        &mut self,
        opponent: &Participant,
        game: &LimitedSumGame,
        rng: &mut SeededRng,
    ) -> Result<Action, GameError> {
        let view = RoundView {
            game,
            round: self.history.len() as u32,
            own: &self.history,
            opponent: &opponent.history,
        };
        let action = self.strategy.decide(&view, rng);
        if !game.contains(action) {
            return Err(GameError::ActionOutOfRange {
                participant: self.name.clone(),
                action,
                action_count: game.action_count(),
            });
        }
        Ok(action)
    }

    pub(crate) fn record(&mut self, action: Action) {
        self.history.push(action);
    }

    /// Forget the current match: empty history, fresh strategy state
    pub fn clean_history(&mut self) {
        self.history.clear();
        self.strategy.reset();
    }

    /// Independent deep copy ready for a new match
    pub fn fresh_copy(&self) -> Participant {
        let mut copy = self.clone();
        copy.clean_history();
        copy
    }

    /// Payoffs of the latest round as `(mine, opponent's)`.
    /// `None` until both players have played at least once.
    pub fn compute_scores(
        &self,
        opponent: &Participant,
        game: &LimitedSumGame,
    ) -> Option<(Payoff, Payoff)> {
        let mine = self.last_action()?;
        let theirs = opponent.last_action()?;
        Some(game.payoff(mine, theirs))
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player: {}", self.name)
    }
}
