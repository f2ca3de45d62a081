//! File configuration for a whole tournament

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::payoff::{GameConfig, LimitedSumGame};
use crate::player::Participant;
use crate::strategy::StrategyKind;
use crate::tournament::{Tournament, TournamentConfig};

/// A named roster entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub name: String,
    pub strategy: StrategyKind,
}

impl ParticipantSpec {
    pub fn new(name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self { name: name.into(), strategy }
    }

    pub fn build(&self, game: &LimitedSumGame) -> Participant {
        Participant::from_boxed(self.name.clone(), self.strategy.build(game))
    }
}

/// Game variant, tournament parameters and roster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub tournament: TournamentConfig,
    pub participants: Vec<ParticipantSpec>,
}

impl ArenaConfig {
    /// Four basic strategies, 100 rounds, 1% error, two repetitions
    pub fn example() -> Self {
        Self {
            game: GameConfig::default(),
            tournament: TournamentConfig {
                n_rounds: 100,
                error: 0.01,
                repetitions: 2,
                seed: None,
            },
            participants: vec![
                ParticipantSpec::new("always0", StrategyKind::Constant { action: 0 }),
                ParticipantSpec::new("always3", StrategyKind::Constant { action: 3 }),
                ParticipantSpec::new("uniform_random", StrategyKind::UniformRandom),
                ParticipantSpec::new("focal5", StrategyKind::Focal),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate everything and assemble a ready-to-play tournament
    pub fn build(&self) -> Result<Tournament, GameError> {
        let game = LimitedSumGame::new(self.game)?;
        let participants = self.participants.iter().map(|spec| spec.build(&game)).collect();
        Tournament::new(game, participants, self.tournament)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_roster() {
        let config = ArenaConfig::example();
        let tournament = config.build().unwrap();
        let names: Vec<_> = tournament.participants().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["always0", "always3", "uniform_random", "focal5"]);
        assert_eq!(tournament.match_count(), 12);
    }

    #[test]
    fn test_json_roundtrip_of_example() {
        let config = ArenaConfig::example();
        let json = config.to_json().unwrap();
        assert_eq!(ArenaConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "participants": [
                {"name": "tft", "strategy": {"kind": "tit_for_tat"}},
                {"name": "indian", "strategy": {"kind": "indian", "k": 5}}
            ]
        }"#;
        let config = ArenaConfig::from_json(json).unwrap();
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.tournament, TournamentConfig::default());
        assert_eq!(config.participants[1].strategy, StrategyKind::Indian { k: 5, burnout: 20 });
    }

    #[test]
    fn test_played_from_config() {
        let json = r#"{
            "game": {"actions": 6, "threshold": 5},
            "tournament": {"n_rounds": 10, "repetitions": 1, "seed": 3},
            "participants": [
                {"name": "low", "strategy": {"kind": "constant", "action": 1}},
                {"name": "high", "strategy": {"kind": "constant", "action": 3}}
            ]
        }"#;
        let mut tournament = ArenaConfig::from_json(json).unwrap().build().unwrap();
        let ranking = tournament.play().unwrap();
        assert_eq!(
            ranking.standings(),
            vec![("high".to_string(), 30.0), ("low".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(ArenaConfig::from_json("{"), Err(GameError::InvalidConfig(_))));

        let mut config = ArenaConfig::example();
        config.game.actions = 0;
        assert_eq!(config.build().unwrap_err(), GameError::EmptyActionRange);

        let mut config = ArenaConfig::example();
        config.participants.clear();
        assert_eq!(config.build().unwrap_err(), GameError::NoParticipants);

        assert!(matches!(
            ArenaConfig::from_path("/nonexistent/arena.json"),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
