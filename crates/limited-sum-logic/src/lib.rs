//! Match Logic for the Limited-Sum Arena
//!
//! Core game logic for repeated two-player limited-sum games: each player
//! picks an integer, both are paid their own pick when the sum stays under
//! the threshold, nothing otherwise. Strategies meet in noisy fixed-length
//! matches and an all-pairs tournament ranks them by total score.
//! This crate is compiled to:
//! - Native (for the `limited-sum-arena` driver)
//! - WASM (for frontend match replay)

mod config;
mod error;
mod game;
mod pairing;
mod payoff;
mod player;
mod random;
mod strategy;
mod tournament;

#[cfg(feature = "wasm")]
mod wasm;

/// An integer choice in `0..action_count`
pub type Action = u8;

/// Per-round reward
pub type Payoff = f64;

pub use config::{ArenaConfig, ParticipantSpec};
pub use error::GameError;
pub use game::{
    run_match, run_match_score, Match, MatchConfig, MatchResult, MatchState, RoundResult,
};
pub use pairing::{
    calculate_match_count, generate_all_pairings, get_pairing_for_match, pair_count, Pairing,
};
pub use payoff::{GameConfig, LimitedSumGame};
pub use player::Participant;
pub use random::{expand_seed, random_seed, SeededRng};
pub use strategy::{
    Constant, Focal, Indian, IndianGreedy, Punisher, RoundView, Strategy, StrategyKind, TitForTat,
    UniformRandom, INDIAN_OPENING_WEIGHTS,
};
pub use tournament::{Ranking, RankingEntry, Tournament, TournamentConfig, TournamentEvent};
