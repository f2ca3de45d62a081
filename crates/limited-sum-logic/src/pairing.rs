//! Deterministic all-pairs schedule for tournament matches
//!
//! Every unordered pair of distinct participants plays `repetitions`
//! matches. Matches are numbered so that a match index alone identifies
//! the pair, the repetition, and (through `SeededRng::new(seed, index)`)
//! the random stream, which lets any worker run any match.

use serde::{Deserialize, Serialize};

/// One scheduled match: participants `a < b` and the repetition number
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub a: u32,
    pub b: u32,
    pub repetition: u32,
}

/// Number of distinct unordered pairs, `C(n, 2)`.
/// `None` when the count does not fit in a `u32`.
pub fn pair_count(participant_count: u32) -> Option<u32> {
    let n = u64::from(participant_count);
    if n < 2 {
        return Some(0);
    }
    u32::try_from(n * (n - 1) / 2).ok()
}

/// Total number of matches in the schedule.
/// `None` when the schedule does not fit in a `u32` match index.
pub fn calculate_match_count(participant_count: u32, repetitions: u32) -> Option<u32> {
    pair_count(participant_count)?.checked_mul(repetitions)
}

/// Generate all pairs in lexicographic order: (0,1), (0,2), …, (1,2), …
///
/// Index ordering is `a < b`; self-pairings never occur.
pub fn generate_all_pairings(participant_count: u32) -> Vec<(u32, u32)> {
    let n = participant_count;
    let mut pairs = Vec::with_capacity(pair_count(n).unwrap_or(0) as usize);
    for a in 0..n {
        for b in (a + 1)..n {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Get the pairing for a specific match index
///
/// Repetitions of one pair are consecutive: index `rank * repetitions + r`.
pub fn get_pairing_for_match(
    participant_count: u32,
    repetitions: u32,
    match_index: u32,
) -> Option<Pairing> {
    if match_index >= calculate_match_count(participant_count, repetitions)? {
        return None;
    }
    let (a, b) = unrank_pair(match_index / repetitions, participant_count);
    Some(Pairing { a, b, repetition: match_index % repetitions })
}

/// Lexicographic combination unranking: rank → (a, b) with a < b.
///
/// Row `a` holds `n - 1 - a` pairs.
fn unrank_pair(rank: u32, n: u32) -> (u32, u32) {
    let mut rest = rank;
    let mut a = 0;
    while a + 1 < n {
        let row = n - 1 - a;
        if rest < row {
            return (a, a + 1 + rest);
        }
        rest -= row;
        a += 1;
    }
    unreachable!("rank {} out of range for {} participants", rank, n)
}
