//! Strategy definitions and execution

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::payoff::LimitedSumGame;
use crate::random::SeededRng;
use crate::Action;

/// What a strategy may observe when choosing its next action.
///
/// Both histories cover the rounds completed so far; the opponent's
/// action for the current round is never visible.
#[derive(Clone, Copy, Debug)]
pub struct RoundView<'a> {
    pub game: &'a LimitedSumGame,
    /// Current round number (0-indexed)
    pub round: u32,
    pub own: &'a [Action],
    pub opponent: &'a [Action],
}

/// A decision policy for one participant.
///
/// Implementations may keep private state between rounds of one match,
/// and must drop all of it in [`reset`](Strategy::reset).
pub trait Strategy: Send + Sync {
    fn decide(&mut self, view: &RoundView<'_>, rng: &mut SeededRng) -> Action;

    fn reset(&mut self);

    fn boxed_clone(&self) -> Box<dyn Strategy>;
}

impl Clone for Box<dyn Strategy> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Clamp a signed target into `lo..=max_action`, never above the range.
fn clamp_action(target: i64, lo: i64, game: &LimitedSumGame) -> Action {
    target.max(lo).min(game.max_action() as i64) as Action
}

/// Play the complement of `action` with respect to the threshold
fn complement(action: Action, lo: i64, game: &LimitedSumGame) -> Action {
    clamp_action(game.threshold() as i64 - action as i64, lo, game)
}

/// Sample an action index from weights restricted to the game's range.
/// Falls back to a uniform draw when no weight is positive.
fn sample_weighted(weights: &[f64], game: &LimitedSumGame, rng: &mut SeededRng) -> Action {
    let count = game.action_count() as usize;
    let truncated = &weights[..weights.len().min(count)];
    match WeightedIndex::new(truncated) {
        Ok(dist) => dist.sample(rng) as Action,
        Err(_) => rng.next_action(game.action_count()),
    }
}

/// Sample from the empirical distribution of observed actions
fn sample_empirical(observed: &[Action], game: &LimitedSumGame, rng: &mut SeededRng) -> Action {
    let mut counts = vec![0.0f64; game.action_count() as usize];
    for &action in observed {
        if let Some(slot) = counts.get_mut(action as usize) {
            *slot += 1.0;
        }
    }
    sample_weighted(&counts, game, rng)
}

fn last_k(actions: &[Action], k: usize) -> &[Action] {
    &actions[actions.len().saturating_sub(k.max(1))..]
}

/// Always plays the same action
#[derive(Clone, Debug)]
pub struct Constant {
    pub action: Action,
}

impl Strategy for Constant {
    fn decide(&mut self, _view: &RoundView<'_>, _rng: &mut SeededRng) -> Action {
        self.action
    }

    fn reset(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Uniform choice over the whole action range each round
#[derive(Clone, Debug, Default)]
pub struct UniformRandom;

impl Strategy for UniformRandom {
    fn decide(&mut self, view: &RoundView<'_>, rng: &mut SeededRng) -> Action {
        rng.next_action(view.game.action_count())
    }

    fn reset(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Tries to settle on actions summing to the threshold.
///
/// Opens with 2, then answers `threshold - last` while the opponent stays
/// under the threshold and plays at random otherwise.
#[derive(Clone, Debug, Default)]
pub struct Focal;

impl Strategy for Focal {
    fn decide(&mut self, view: &RoundView<'_>, rng: &mut SeededRng) -> Action {
        let game = view.game;
        match view.opponent.last() {
            None => clamp_action(2, 0, game),
            Some(&last) if (last as u32) < game.threshold() => complement(last, 0, game),
            Some(_) => rng.next_action(game.action_count()),
        }
    }

    fn reset(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Tit-for-tat for the limited-sum game: mirrors modest actions (below 3)
/// and answers greedier ones with their complement.
#[derive(Clone, Debug, Default)]
pub struct TitForTat;

impl Strategy for TitForTat {
    fn decide(&mut self, view: &RoundView<'_>, _rng: &mut SeededRng) -> Action {
        let game = view.game;
        match view.opponent.last() {
            None => clamp_action(2, 0, game),
            Some(&last) if last < 3 => last,
            Some(&last) => complement(last, 0, game),
        }
    }

    fn reset(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Opening weights for the Indian strategies, favouring 3
pub const INDIAN_OPENING_WEIGHTS: [f64; 6] = [0.0, 0.1, 0.2, 0.6, 0.1, 0.0];

/// Burn-in with fixed opening weights, then predicts the opponent's next
/// action from its last `k` actions and plays the complement (at least 1).
#[derive(Clone, Debug)]
pub struct Indian {
    pub k: usize,
    pub burnout: usize,
    pub opening_weights: Vec<f64>,
}

impl Indian {
    pub fn new(k: usize, burnout: usize) -> Self {
        Self { k, burnout, opening_weights: INDIAN_OPENING_WEIGHTS.to_vec() }
    }
}

impl Default for Indian {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

impl Strategy for Indian {
    fn decide(&mut self, view: &RoundView<'_>, rng: &mut SeededRng) -> Action {
        let game = view.game;
        if view.opponent.len() <= self.burnout {
            return sample_weighted(&self.opening_weights, game, rng);
        }
        let predicted = sample_empirical(last_k(view.opponent, self.k), game, rng);
        complement(predicted, 1, game)
    }

    fn reset(&mut self) {}

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Indian variant that conditions its prediction on its own previous action.
///
/// `responses[a]` holds every action the opponent played right after this
/// strategy played `a`. Empty rows fall back to the opponent's last `k`.
#[derive(Clone, Debug)]
pub struct IndianGreedy {
    pub k: usize,
    pub burnout: usize,
    pub opening_weights: Vec<f64>,
    responses: Vec<Vec<Action>>,
}

impl IndianGreedy {
    pub fn new(game: &LimitedSumGame, k: usize, burnout: usize) -> Self {
        Self {
            k,
            burnout,
            opening_weights: INDIAN_OPENING_WEIGHTS.to_vec(),
            responses: vec![Vec::new(); game.action_count() as usize],
        }
    }

    pub fn responses_to(&self, action: Action) -> &[Action] {
        self.responses.get(action as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    fn observe(&mut self, own: &[Action], opponent: &[Action]) {
        if own.len() < 2 || opponent.is_empty() {
            return;
        }
        let mine = own[own.len() - 2] as usize;
        if mine >= self.responses.len() {
            self.responses.resize(mine + 1, Vec::new());
        }
        self.responses[mine].push(opponent[opponent.len() - 1]);
    }
}

impl Strategy for IndianGreedy {
    fn decide(&mut self, view: &RoundView<'_>, rng: &mut SeededRng) -> Action {
        let game = view.game;
        self.observe(view.own, view.opponent);

        if view.opponent.len() <= self.burnout {
            return sample_weighted(&self.opening_weights, game, rng);
        }

        let row = view.own.last().map(|&mine| self.responses_to(mine)).unwrap_or(&[]);
        let window = if row.is_empty() { last_k(view.opponent, self.k) } else { last_k(row, self.k) };
        let predicted = sample_empirical(window, game, rng);
        complement(predicted, 1, game)
    }

    fn reset(&mut self) {
        for row in &mut self.responses {
            row.clear();
        }
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

/// Coordinates on the threshold, punishes sustained greed with two rounds
/// of 0, then offers 2 to recover cooperation.
#[derive(Clone, Debug, Default)]
pub struct Punisher {
    cooperation_score: i32,
    punishment_mode: bool,
    punishment_rounds: u32,
}

impl Punisher {
    /// +1 per opponent action of at most 3, -2 per greedier one
    pub fn cooperation_score(&self) -> i32 {
        self.cooperation_score
    }

    pub fn is_punishing(&self) -> bool {
        self.punishment_mode
    }
}

impl Strategy for Punisher {
    fn decide(&mut self, view: &RoundView<'_>, _rng: &mut SeededRng) -> Action {
        let game = view.game;
        let Some(&last) = view.opponent.last() else {
            return clamp_action(2, 0, game);
        };

        if last <= 3 {
            self.cooperation_score += 1;
        } else {
            self.cooperation_score -= 2;
        }

        let recent = last_k(view.opponent, 5);
        let avg_recent = recent.iter().map(|&a| a as f64).sum::<f64>() / recent.len() as f64;

        if self.punishment_mode {
            self.punishment_rounds += 1;
            if self.punishment_rounds <= 2 {
                return 0;
            }
            self.punishment_mode = false;
            self.punishment_rounds = 0;
            return clamp_action(2, 0, game);
        }

        if last > 3 && avg_recent > 3.5 {
            self.punishment_mode = true;
            self.punishment_rounds = 0;
            return 0;
        }

        if last <= 3 {
            return complement(last, 0, game);
        }

        clamp_action(2, 0, game)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

fn default_k() -> usize {
    10
}

fn default_burnout() -> usize {
    20
}

/// Serializable name of a built-in strategy and its parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Always the same action.
    Constant { action: Action },
    /// Uniform random action each round.
    UniformRandom,
    /// Aim for actions summing to the threshold.
    Focal,
    /// Mirror modest actions, answer greedy ones with the complement.
    TitForTat,
    /// Predict from the opponent's recent actions.
    Indian {
        #[serde(default = "default_k")]
        k: usize,
        #[serde(default = "default_burnout")]
        burnout: usize,
    },
    /// Predict from the opponent's responses to our own last action.
    IndianGreedy {
        #[serde(default = "default_k")]
        k: usize,
        #[serde(default = "default_burnout")]
        burnout: usize,
    },
    /// Coordinate, punish sustained greed, forgive.
    Punisher,
}

impl StrategyKind {
    /// Instantiate the strategy for a particular game
    pub fn build(&self, game: &LimitedSumGame) -> Box<dyn Strategy> {
        match *self {
            StrategyKind::Constant { action } => Box::new(Constant { action }),
            StrategyKind::UniformRandom => Box::new(UniformRandom),
            StrategyKind::Focal => Box::new(Focal),
            StrategyKind::TitForTat => Box::new(TitForTat),
            StrategyKind::Indian { k, burnout } => Box::new(Indian::new(k, burnout)),
            StrategyKind::IndianGreedy { k, burnout } => {
                Box::new(IndianGreedy::new(game, k, burnout))
            }
            StrategyKind::Punisher => Box::new(Punisher::default()),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::Constant { .. } => "constant",
            StrategyKind::UniformRandom => "uniform_random",
            StrategyKind::Focal => "focal",
            StrategyKind::TitForTat => "tit_for_tat",
            StrategyKind::Indian { .. } => "indian",
            StrategyKind::IndianGreedy { .. } => "indian_greedy",
            StrategyKind::Punisher => "punisher",
        }
    }

    /// Human-readable description of a strategy
    pub fn describe(&self) -> String {
        match self {
            StrategyKind::Constant { action } => format!("Always plays {}.", action),
            StrategyKind::UniformRandom => "Plays a uniformly random action each round.".to_string(),
            StrategyKind::Focal => {
                "Opens with 2, then aims for a sum equal to the threshold.".to_string()
            }
            StrategyKind::TitForTat => {
                "Opens with 2, mirrors actions below 3 and answers greed with the complement."
                    .to_string()
            }
            StrategyKind::Indian { k, burnout } => format!(
                "Random opening for {} rounds, then counters a prediction from the opponent's last {} actions.",
                burnout, k
            ),
            StrategyKind::IndianGreedy { k, burnout } => format!(
                "Random opening for {} rounds, then counters the opponent's last {} responses to its own previous action.",
                burnout, k
            ),
            StrategyKind::Punisher => {
                "Coordinates on the threshold, punishes sustained greed with 0 for two rounds, then forgives."
                    .to_string()
            }
        }
    }

    /// Every built-in with default parameters
    pub fn catalog() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Constant { action: 0 },
            StrategyKind::Constant { action: 3 },
            StrategyKind::UniformRandom,
            StrategyKind::Focal,
            StrategyKind::TitForTat,
            StrategyKind::Indian { k: default_k(), burnout: default_burnout() },
            StrategyKind::IndianGreedy { k: default_k(), burnout: default_burnout() },
            StrategyKind::Punisher,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rng() -> SeededRng {
        SeededRng::new(&[42u8; 32], 0)
    }

    fn decide(strategy: &mut dyn Strategy, own: &[Action], opponent: &[Action]) -> Action {
        let game = LimitedSumGame::standard();
        let view = RoundView { game: &game, round: own.len() as u32, own, opponent };
        strategy.decide(&view, &mut make_rng())
    }

    #[test]
    fn test_constant() {
        let mut strategy = Constant { action: 3 };
        for _ in 0..10 {
            assert_eq!(decide(&mut strategy, &[3, 3], &[0, 5]), 3);
        }
    }

    #[test]
    fn test_uniform_random_in_range() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let mut strategy = UniformRandom;
        let view = RoundView { game: &game, round: 0, own: &[], opponent: &[] };
        for _ in 0..200 {
            assert!(game.contains(strategy.decide(&view, &mut rng)));
        }
    }

    #[test]
    fn test_focal() {
        let mut strategy = Focal;
        assert_eq!(decide(&mut strategy, &[], &[]), 2);
        assert_eq!(decide(&mut strategy, &[2], &[1]), 4);
        assert_eq!(decide(&mut strategy, &[2], &[4]), 1);
        assert_eq!(decide(&mut strategy, &[2], &[0]), 5);
    }

    #[test]
    fn test_focal_random_after_greed() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let view = RoundView { game: &game, round: 1, own: &[2], opponent: &[5] };
        for _ in 0..50 {
            assert!(game.contains(Focal.decide(&view, &mut rng)));
        }
    }

    #[test]
    fn test_tit_for_tat() {
        let mut strategy = TitForTat;
        assert_eq!(decide(&mut strategy, &[], &[]), 2);
        assert_eq!(decide(&mut strategy, &[2], &[1]), 1);
        assert_eq!(decide(&mut strategy, &[2], &[2]), 2);
        assert_eq!(decide(&mut strategy, &[2], &[3]), 2);
        assert_eq!(decide(&mut strategy, &[2], &[5]), 0);
    }

    #[test]
    fn test_indian_opening_never_plays_zero_or_five() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let mut strategy = Indian::default();
        let view = RoundView { game: &game, round: 0, own: &[], opponent: &[] };
        for _ in 0..500 {
            let action = strategy.decide(&view, &mut rng);
            assert!((1..=4).contains(&action), "opening drew {}", action);
        }
    }

    #[test]
    fn test_indian_counters_constant_opponent() {
        let mut strategy = Indian::new(5, 2);
        // Opponent always played 1: prediction is 1, complement is 4
        assert_eq!(decide(&mut strategy, &[3, 3, 3], &[1, 1, 1]), 4);
        // Opponent always played 5: complement is 0, floored at 1
        assert_eq!(decide(&mut strategy, &[3, 3, 3], &[5, 5, 5]), 1);
    }

    #[test]
    fn test_indian_greedy_learns_responses() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let mut strategy = IndianGreedy::new(&game, 10, 0);
        let own = [3, 3, 3, 3];
        let opponent = [0, 2, 2, 2];

        // Feed rounds one at a time, as a match would
        for len in 1..=own.len() {
            let view = RoundView {
                game: &game,
                round: len as u32,
                own: &own[..len],
                opponent: &opponent[..len],
            };
            let action = strategy.decide(&view, &mut rng);
            if len >= 2 {
                // Opponent always answered 3 with 2
                assert_eq!(action, 3);
            }
        }
        assert_eq!(strategy.responses_to(3), &[2, 2, 2]);

        strategy.reset();
        assert!(strategy.responses_to(3).is_empty());
    }

    #[test]
    fn test_indian_greedy_falls_back_to_window() {
        let game = LimitedSumGame::standard();
        let mut strategy = IndianGreedy::new(&game, 10, 0);
        let view = RoundView { game: &game, round: 1, own: &[4], opponent: &[1] };
        assert_eq!(strategy.decide(&view, &mut make_rng()), 4);
    }

    #[test]
    fn test_punisher_cooperates() {
        let mut strategy = Punisher::default();
        assert_eq!(decide(&mut strategy, &[], &[]), 2);
        assert_eq!(decide(&mut strategy, &[2], &[2]), 3);
        assert_eq!(strategy.cooperation_score(), 1);
    }

    #[test]
    fn test_punisher_punishes_then_forgives() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let mut strategy = Punisher::default();
        let own = [2u8, 2, 2, 2, 2];
        let opponent = [5u8, 5, 5, 5, 5];

        let mut actions = Vec::new();
        for len in 1..=4 {
            let view = RoundView {
                game: &game,
                round: len as u32,
                own: &own[..len],
                opponent: &opponent[..len],
            };
            actions.push(strategy.decide(&view, &mut rng));
        }
        // Trigger, two punishment rounds, then recovery
        assert_eq!(actions, vec![0, 0, 0, 2]);
        assert!(strategy.cooperation_score() < 0);

        strategy.reset();
        assert_eq!(strategy.cooperation_score(), 0);
        assert!(!strategy.is_punishing());
    }

    #[test]
    fn test_small_game_clamps() {
        let game = LimitedSumGame::new(crate::GameConfig { actions: 2, threshold: 5 }).unwrap();
        let mut rng = make_rng();
        let view = RoundView { game: &game, round: 0, own: &[], opponent: &[] };
        assert_eq!(Focal.decide(&view, &mut rng), 1);
        assert_eq!(TitForTat.decide(&view, &mut rng), 1);
        assert_eq!(Punisher::default().decide(&view, &mut rng), 1);
        for _ in 0..50 {
            assert!(game.contains(Indian::default().decide(&view, &mut rng)));
        }
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let mut original: Box<dyn Strategy> = Box::new(Punisher::default());
        let view = RoundView { game: &game, round: 1, own: &[2], opponent: &[5] };
        original.decide(&view, &mut rng);

        let mut copy = original.clone();
        copy.reset();
        // The original is still mid-punishment, the copy starts over
        let next = RoundView { game: &game, round: 2, own: &[2, 0], opponent: &[5, 1] };
        assert_eq!(original.decide(&next, &mut rng), 0);
        assert_eq!(copy.decide(&next, &mut rng), 4);
    }

    #[test]
    fn test_kind_json() {
        let kind: StrategyKind = serde_json::from_str(r#"{"kind": "indian"}"#).unwrap();
        assert_eq!(kind, StrategyKind::Indian { k: 10, burnout: 20 });

        let kind: StrategyKind = serde_json::from_str(r#"{"kind": "constant", "action": 3}"#).unwrap();
        assert_eq!(kind, StrategyKind::Constant { action: 3 });

        let json = serde_json::to_string(&StrategyKind::TitForTat).unwrap();
        assert_eq!(json, r#"{"kind":"tit_for_tat"}"#);
    }

    #[test]
    fn test_catalog_builds() {
        let game = LimitedSumGame::standard();
        let mut rng = make_rng();
        let view = RoundView { game: &game, round: 0, own: &[], opponent: &[] };
        for kind in StrategyKind::catalog() {
            let mut strategy = kind.build(&game);
            assert!(game.contains(strategy.decide(&view, &mut rng)), "{}", kind.id());
            assert!(!kind.describe().is_empty());
        }
    }
}
