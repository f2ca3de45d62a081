//! All-against-all tournament and its ranking
//!
//! Every pair of participants plays `repetitions` matches, each on fresh
//! copies of both participants so no history or strategy state carries
//! over between repetitions. Points go to the original participants'
//! ranking entries once a match has completed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{check_probability, GameError};
use crate::game::{run_match_score, MatchConfig};
use crate::pairing::{calculate_match_count, get_pairing_for_match, Pairing};
use crate::payoff::LimitedSumGame;
use crate::player::Participant;
use crate::random::{expand_seed, random_seed, SeededRng};
use crate::Payoff;

/// Tournament parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Rounds in each match
    pub n_rounds: u32,
    /// Per-player, per-round action error probability (0-1)
    pub error: f64,
    /// Matches each pair plays
    pub repetitions: u32,
    /// Fixed seed for bit-exact replays; drawn from entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self { n_rounds: 100, error: 0.0, repetitions: 2, seed: None }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.n_rounds == 0 {
            return Err(GameError::InvalidRounds);
        }
        if self.repetitions == 0 {
            return Err(GameError::InvalidRepetitions);
        }
        check_probability(self.error)
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig { n_rounds: self.n_rounds, error: self.error }
    }
}

/// Accumulated points of one participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Position in the original roster; breaks ties
    pub seed: usize,
    pub score: Payoff,
}

/// Participants sorted by accumulated score, highest first.
///
/// Equal scores keep roster order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(seed, name)| RankingEntry { name: name.to_string(), seed, score: 0.0 })
            .collect();
        Self { entries }
    }

    fn add(&mut self, seed: usize, points: Payoff) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.seed == seed) {
            entry.score += points;
        }
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|x, y| y.score.total_cmp(&x.score).then(x.seed.cmp(&y.seed)));
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.score = 0.0;
        }
        self.entries.sort_by_key(|e| e.seed);
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<Payoff> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    pub fn winner(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }

    /// `(name, score)` pairs in ranked order, for display
    pub fn standings(&self) -> Vec<(String, Payoff)> {
        self.entries.iter().map(|e| (e.name.clone(), e.score)).collect()
    }

    pub fn total(&self) -> Payoff {
        self.entries.iter().map(|e| e.score).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Progress notifications emitted while a tournament plays
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentEvent<'a> {
    /// Sent before the pair's first repetition is played. Under the
    /// `parallel` feature, before its result is applied.
    PairStarted {
        a: &'a str,
        b: &'a str,
    },
    MatchCompleted {
        a: &'a str,
        b: &'a str,
        repetition: u32,
        score: (Payoff, Payoff),
    },
    PairCompleted {
        a: &'a str,
        b: &'a str,
        ranking: &'a Ranking,
    },
}

/// All-against-all tournament
#[derive(Debug)]
pub struct Tournament {
    game: LimitedSumGame,
    participants: Vec<Participant>,
    config: TournamentConfig,
    seed: [u8; 32],
    ranking: Ranking,
    /// Roster size and schedule length, checked to fit match indices
    participant_count: u32,
    match_count: u32,
    matches_completed: u32,
}

impl Tournament {
    pub fn new(
        game: LimitedSumGame,
        participants: Vec<Participant>,
        config: TournamentConfig,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if participants.is_empty() {
            return Err(GameError::NoParticipants);
        }
        let mut names = HashSet::new();
        for participant in &participants {
            if !names.insert(participant.name()) {
                return Err(GameError::DuplicateParticipant(participant.name().to_string()));
            }
        }

        let schedule = u32::try_from(participants.len())
            .ok()
            .and_then(|n| Some((n, calculate_match_count(n, config.repetitions)?)));
        let Some((participant_count, match_count)) = schedule else {
            return Err(GameError::InvalidConfig(format!(
                "{} participants with {} repetitions exceed {} matches",
                participants.len(),
                config.repetitions,
                u32::MAX
            )));
        };

        let seed = config.seed.map(expand_seed).unwrap_or_else(random_seed);
        let ranking = Ranking::new(participants.iter().map(Participant::name));
        Ok(Self {
            game,
            participants,
            config,
            seed,
            ranking,
            participant_count,
            match_count,
            matches_completed: 0,
        })
    }

    /// Replace the tournament seed
    pub fn with_seed(mut self, seed: [u8; 32]) -> Self {
        self.seed = seed;
        self
    }

    pub fn play(&mut self) -> Result<&Ranking, GameError> {
        self.play_observed(|_| {})
    }

    /// Run every scheduled match and rebuild the ranking from scratch.
    ///
    /// The ranking is updated (and re-sorted) once per completed match.
    /// If a match fails, the error is returned and the ranking keeps the
    /// points of every match completed before it.
    pub fn play_observed<F>(&mut self, mut observer: F) -> Result<&Ranking, GameError>
    where
        F: FnMut(TournamentEvent<'_>),
    {
        self.ranking.reset();
        self.matches_completed = 0;

        let total = self.match_count();
        log::info!(
            "tournament: {} participants, {} matches of {} rounds, error {}",
            self.participants.len(),
            total,
            self.config.n_rounds,
            self.config.error
        );

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let outcomes: Vec<_> = (0..total)
                .into_par_iter()
                .map(|match_index| -> Result<_, GameError> {
                    let pairing = self.pairing(match_index)?;
                    Ok((pairing, self.run_pairing(pairing, match_index)))
                })
                .collect::<Result<_, GameError>>()?;
            for (pairing, score) in outcomes {
                if pairing.repetition == 0 {
                    self.announce(pairing, &mut observer);
                }
                self.apply(pairing, score?, &mut observer);
            }
        }

        #[cfg(not(feature = "parallel"))]
        for match_index in 0..total {
            let pairing = self.pairing(match_index)?;
            if pairing.repetition == 0 {
                self.announce(pairing, &mut observer);
            }
            let score = self.run_pairing(pairing, match_index)?;
            self.apply(pairing, score, &mut observer);
        }

        Ok(&self.ranking)
    }

    fn pairing(&self, match_index: u32) -> Result<Pairing, GameError> {
        get_pairing_for_match(self.participant_count, self.config.repetitions, match_index)
            .ok_or_else(|| GameError::InvalidConfig(format!("no match with index {}", match_index)))
    }

    /// Play one scheduled match on fresh copies of its two participants
    fn run_pairing(
        &self,
        pairing: Pairing,
        match_index: u32,
    ) -> Result<(Payoff, Payoff), GameError> {
        let mut rng = SeededRng::new(&self.seed, match_index);
        run_match_score(
            &self.game,
            &self.participants[pairing.a as usize],
            &self.participants[pairing.b as usize],
            self.config.match_config(),
            &mut rng,
        )
    }

    fn announce<F>(&self, pairing: Pairing, observer: &mut F)
    where
        F: FnMut(TournamentEvent<'_>),
    {
        let a = self.participants[pairing.a as usize].name();
        let b = self.participants[pairing.b as usize].name();
        log::info!("Match between {} and {}", a, b);
        observer(TournamentEvent::PairStarted { a, b });
    }

    fn apply<F>(&mut self, pairing: Pairing, score: (Payoff, Payoff), observer: &mut F)
    where
        F: FnMut(TournamentEvent<'_>),
    {
        let (a, b) = (pairing.a as usize, pairing.b as usize);
        self.ranking.add(a, score.0);
        self.ranking.add(b, score.1);
        self.ranking.sort();
        self.matches_completed += 1;

        observer(TournamentEvent::MatchCompleted {
            a: self.participants[a].name(),
            b: self.participants[b].name(),
            repetition: pairing.repetition,
            score,
        });

        if pairing.repetition + 1 == self.config.repetitions {
            log::debug!("standings: {:?}", self.ranking.standings());
            observer(TournamentEvent::PairCompleted {
                a: self.participants[a].name(),
                b: self.participants[b].name(),
                ranking: &self.ranking,
            });
        }
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn standings(&self) -> Vec<(String, Payoff)> {
        self.ranking.standings()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn game(&self) -> &LimitedSumGame {
        &self.game
    }

    pub fn config(&self) -> TournamentConfig {
        self.config
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    pub fn matches_completed(&self) -> u32 {
        self.matches_completed
    }

    pub fn match_count(&self) -> u32 {
        self.match_count
    }
}
