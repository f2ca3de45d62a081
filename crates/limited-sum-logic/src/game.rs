//! Match execution engine

use serde::{Deserialize, Serialize};

use crate::error::{check_probability, GameError};
use crate::payoff::LimitedSumGame;
use crate::player::Participant;
use crate::random::SeededRng;
use crate::{Action, Payoff};

/// Length of a match and the per-player action error probability
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub n_rounds: u32,
    /// Chance (0-1) that a player's intended action is replaced by a
    /// uniformly random one, drawn independently per player and round
    pub error: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { n_rounds: 100, error: 0.0 }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.n_rounds == 0 {
            return Err(GameError::InvalidRounds);
        }
        check_probability(self.error)
    }
}

/// Lifecycle of a [`Match`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    NotStarted,
    Running { round: u32 },
    Completed,
}

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    /// What each strategy asked for
    pub intended_1: Action,
    pub intended_2: Action,
    /// What was recorded and scored, after noise
    pub action_1: Action,
    pub action_2: Action,
    pub perturbed_1: bool,
    pub perturbed_2: bool,
    pub score_1: Payoff,
    pub score_2: Payoff,
    pub cumulative_1: Payoff,
    pub cumulative_2: Payoff,
}

/// Result of a complete match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub rounds: Vec<RoundResult>,
    pub score: (Payoff, Payoff),
    pub round_count: u32,
}

/// One repeated interaction between two participants
#[derive(Debug)]
pub struct Match<'g> {
    game: &'g LimitedSumGame,
    player_1: Participant,
    player_2: Participant,
    config: MatchConfig,
    state: MatchState,
    score: (Payoff, Payoff),
}

impl<'g> Match<'g> {
    pub fn new(
        game: &'g LimitedSumGame,
        player_1: Participant,
        player_2: Participant,
        config: MatchConfig,
    ) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            game,
            player_1,
            player_2,
            config,
            state: MatchState::NotStarted,
            score: (0.0, 0.0),
        })
    }

    pub fn play(&mut self, rng: &mut SeededRng) -> Result<MatchResult, GameError> {
        self.play_observed(rng, |_| {})
    }

    /// Play every round, reporting each finished round to `observer`.
    ///
    /// Histories are cleared first, so a completed match can be replayed.
    /// On error the match falls back to `NotStarted` with a zero score.
    pub fn play_observed<F>(
        &mut self,
        rng: &mut SeededRng,
        mut observer: F,
    ) -> Result<MatchResult, GameError>
    where
        F: FnMut(&RoundResult),
    {
        let mut rounds = Vec::with_capacity(self.config.n_rounds as usize);
        let score = self.run_rounds(rng, |result| {
            observer(&result);
            rounds.push(result);
        })?;
        Ok(MatchResult { rounds, score, round_count: self.config.n_rounds })
    }

    /// Play every round keeping only the running totals.
    ///
    /// Same protocol and random stream as [`Match::play`], so the score is
    /// identical to `play(rng)?.score`.
    pub fn play_score(&mut self, rng: &mut SeededRng) -> Result<(Payoff, Payoff), GameError> {
        self.run_rounds(rng, |_| {})
    }

    fn run_rounds<F>(
        &mut self,
        rng: &mut SeededRng,
        mut sink: F,
    ) -> Result<(Payoff, Payoff), GameError>
    where
        F: FnMut(RoundResult),
    {
        self.player_1.clean_history();
        self.player_2.clean_history();
        self.score = (0.0, 0.0);
        self.state = MatchState::NotStarted;

        let mut total_1: Payoff = 0.0;
        let mut total_2: Payoff = 0.0;

        for round in 0..self.config.n_rounds {
            self.state = MatchState::Running { round };

            let intended_1 = self.player_1.decide(&self.player_2, self.game, rng);
            let intended_2 = self.player_2.decide(&self.player_1, self.game, rng);
            let (intended_1, intended_2) = match (intended_1, intended_2) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(e), _) | (_, Err(e)) => {
                    self.state = MatchState::NotStarted;
                    return Err(e);
                }
            };

            let (action_1, perturbed_1) = self.perturb(intended_1, rng);
            let (action_2, perturbed_2) = self.perturb(intended_2, rng);

            self.player_1.record(action_1);
            self.player_2.record(action_2);

            let (score_1, score_2) = self.game.payoff(action_1, action_2);
            total_1 += score_1;
            total_2 += score_2;

            let result = RoundResult {
                round,
                intended_1,
                intended_2,
                action_1,
                action_2,
                perturbed_1,
                perturbed_2,
                score_1,
                score_2,
                cumulative_1: total_1,
                cumulative_2: total_2,
            };
            log::trace!(
                "round {}: {} chose {}, {} chose {}, score {} - {}",
                round + 1,
                self.player_1.name(),
                action_1,
                self.player_2.name(),
                action_2,
                total_1,
                total_2
            );
            sink(result);
        }

        self.score = (total_1, total_2);
        self.state = MatchState::Completed;
        Ok(self.score)
    }

    /// With probability `error`, override the intended action with a
    /// uniform draw over the full range.
    fn perturb(&self, intended: Action, rng: &mut SeededRng) -> (Action, bool) {
        if rng.next_unit() < self.config.error {
            (rng.next_action(self.game.action_count()), true)
        } else {
            (intended, false)
        }
    }

    /// Final score; `(0, 0)` until the match has completed
    pub fn score(&self) -> (Payoff, Payoff) {
        self.score
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    pub fn player_1(&self) -> &Participant {
        &self.player_1
    }

    pub fn player_2(&self) -> &Participant {
        &self.player_2
    }

    pub fn into_players(self) -> (Participant, Participant) {
        (self.player_1, self.player_2)
    }
}

/// Run a complete match on fresh copies of two participants
///
/// # Arguments
/// * `game` - Payoff rule and action range
/// * `player_1` - First participant (left untouched)
/// * `player_2` - Second participant (left untouched)
/// * `config` - Round count and error probability
/// * `rng` - Random source for strategies and noise
///
/// # Returns
/// Complete match result with round-by-round details
pub fn run_match(
    game: &LimitedSumGame,
    player_1: &Participant,
    player_2: &Participant,
    config: MatchConfig,
    rng: &mut SeededRng,
) -> Result<MatchResult, GameError> {
    let mut game_match = Match::new(game, player_1.fresh_copy(), player_2.fresh_copy(), config)?;
    game_match.play(rng)
}

/// Like [`run_match`] but returns only the final score, without a round log
pub fn run_match_score(
    game: &LimitedSumGame,
    player_1: &Participant,
    player_2: &Participant,
    config: MatchConfig,
    rng: &mut SeededRng,
) -> Result<(Payoff, Payoff), GameError> {
    let mut game_match = Match::new(game, player_1.fresh_copy(), player_2.fresh_copy(), config)?;
    game_match.play_score(rng)
}
