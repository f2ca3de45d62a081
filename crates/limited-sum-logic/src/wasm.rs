//! WASM bindings for frontend match replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::pairing::{calculate_match_count, get_pairing_for_match};
use crate::{
    run_match, ArenaConfig, GameConfig, LimitedSumGame, RankingEntry, SeededRng, StrategyKind,
    Tournament, TournamentEvent,
};

fn parse_seed(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))
}

fn parse_config(config_json: &str) -> Result<ArenaConfig, JsError> {
    ArenaConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid arena config: {}", e)))
}

/// Replay one tournament match with full round-by-round details
///
/// # Arguments
/// * `config_json` - JSON serialized ArenaConfig of the tournament
/// * `seed` - 32-byte tournament seed
/// * `match_index` - Index of this match in the schedule
///
/// # Returns
/// MatchResult, identical to the one the tournament played
#[wasm_bindgen]
pub fn replay_match(config_json: &str, seed: &[u8], match_index: u32) -> Result<JsValue, JsError> {
    let config = parse_config(config_json)?;
    let seed_arr = parse_seed(seed)?;
    let game = LimitedSumGame::new(config.game)?;

    let participant_count = u32::try_from(config.participants.len())
        .map_err(|_| JsError::new("Too many participants"))?;
    let pairing =
        get_pairing_for_match(participant_count, config.tournament.repetitions, match_index)
            .ok_or_else(|| JsError::new(&format!("No match with index {}", match_index)))?;

    let player_a = config.participants[pairing.a as usize].build(&game);
    let player_b = config.participants[pairing.b as usize].build(&game);
    let mut rng = SeededRng::new(&seed_arr, match_index);
    let result = run_match(
        &game,
        &player_a,
        &player_b,
        config.tournament.match_config(),
        &mut rng,
    )?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct TournamentSummary {
    seed: Vec<u8>,
    ranking: Vec<RankingEntry>,
}

/// Run a whole tournament and return the seed used with the final ranking
#[wasm_bindgen]
pub fn run_tournament(config_json: &str) -> Result<JsValue, JsError> {
    let mut tournament = parse_config(config_json)?.build()?;
    tournament.play()?;
    summarize(&tournament)
}

/// Like `run_tournament`, calling `on_match(completed, total)` after every match
#[wasm_bindgen]
pub fn run_tournament_with_progress(
    config_json: &str,
    on_match: &js_sys::Function,
) -> Result<JsValue, JsError> {
    let mut tournament = parse_config(config_json)?.build()?;
    let total = JsValue::from(tournament.match_count());
    let mut completed = 0u32;
    tournament.play_observed(|event| {
        if let TournamentEvent::MatchCompleted { .. } = event {
            completed += 1;
            let outcome = on_match.call2(&JsValue::NULL, &JsValue::from(completed), &total);
            check_callback(outcome, completed);
        }
    })?;
    summarize(&tournament)
}

/// Progress callbacks never abort the tournament; failures are logged
fn check_callback<T, E: std::fmt::Debug>(outcome: Result<T, E>, completed: u32) -> bool {
    match outcome {
        Ok(_) => true,
        Err(err) => {
            log::warn!("progress callback failed after match {}: {:?}", completed, err);
            false
        }
    }
}

fn summarize(tournament: &Tournament) -> Result<JsValue, JsError> {
    let summary = TournamentSummary {
        seed: tournament.seed().to_vec(),
        ranking: tournament.ranking().entries().to_vec(),
    };
    serde_wasm_bindgen::to_value(&summary)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Payoff table `[a1][a2] -> (score_1, score_2)` for a game variant
#[wasm_bindgen]
pub fn get_payoff_matrix(actions: u8, threshold: u32) -> Result<JsValue, JsError> {
    let game = LimitedSumGame::new(GameConfig { actions, threshold })?;
    serde_wasm_bindgen::to_value(&game.payoff_matrix())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get human-readable description of a strategy
#[wasm_bindgen]
pub fn get_strategy_description(strategy_json: &str) -> Result<String, JsError> {
    let strategy: StrategyKind = serde_json::from_str(strategy_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy: {}", e)))?;

    Ok(strategy.describe())
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: &'static str,
    description: String,
    defaults: StrategyKind,
}

/// Get all built-in strategies with their default parameters
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = StrategyKind::catalog()
        .into_iter()
        .map(|kind| StrategyInfo { id: kind.id(), description: kind.describe(), defaults: kind })
        .collect();

    serde_wasm_bindgen::to_value(&types)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get total match count for a tournament
#[wasm_bindgen]
pub fn get_match_count(participant_count: u32, repetitions: u32) -> Result<u32, JsError> {
    calculate_match_count(participant_count, repetitions)
        .ok_or_else(|| JsError::new("Schedule exceeds the maximum match count"))
}
