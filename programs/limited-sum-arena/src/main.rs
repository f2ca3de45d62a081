mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use limited_sum_logic::{random_seed, Ranking, TournamentEvent};

use crate::cli::CliArgs;

const BAR_WIDTH: usize = 40;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    if let Some(path) = &args.write_example {
        let json = limited_sum_logic::ArenaConfig::example().to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write example config: {}", path.display()))?;
        println!("Example config written to {}", path.display());
        return Ok(());
    }

    let mut config = args.load()?;
    // Always run with an explicit u64 seed, printed below
    let seed = match config.tournament.seed {
        Some(seed) => seed,
        None => u64::from_le_bytes(random_seed()[..8].try_into()?),
    };
    config.tournament.seed = Some(seed);

    let mut tournament = config.build().context("Invalid arena config")?;
    let trace_matches = args.trace_matches;
    tournament
        .play_observed(|event| {
            if let TournamentEvent::MatchCompleted { a, b, repetition, score } = event {
                if trace_matches {
                    log::info!("{} vs {} #{}: {} - {}", a, b, repetition, score.0, score.1);
                }
            }
        })
        .context("Tournament aborted")?;

    if args.json {
        let output = serde_json::json!({
            "seed": seed,
            "ranking": tournament.ranking().entries(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Seed: {}", seed);
        print!("{}", render_ranking(tournament.ranking()));
    }

    Ok(())
}

/// Bar proportional to `score / best`
fn render_bar(score: f64, best: f64) -> String {
    if best <= 0.0 || score <= 0.0 {
        return String::new();
    }
    let filled = ((score / best) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

fn render_ranking(ranking: &Ranking) -> String {
    let best = ranking.winner().map(|e| e.score).unwrap_or(0.0);
    let name_width = ranking.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (place, entry) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<width$} {:>10.1} {}\n",
            place + 1,
            entry.name,
            entry.score,
            render_bar(entry.score, best),
            width = name_width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use limited_sum_logic::{Constant, LimitedSumGame, Participant, Tournament, TournamentConfig};

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(render_bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(render_bar(0.0, 10.0), "");
        assert_eq!(render_bar(0.0, 0.0), "");
    }

    #[test]
    fn test_render_ranking() {
        let roster = vec![
            Participant::new("low", Constant { action: 1 }),
            Participant::new("high", Constant { action: 3 }),
        ];
        let config = TournamentConfig { n_rounds: 10, error: 0.0, repetitions: 1, seed: Some(1) };
        let mut tournament = Tournament::new(LimitedSumGame::standard(), roster, config).unwrap();
        tournament.play().unwrap();

        let table = render_ranking(tournament.ranking());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. high"));
        assert!(lines[0].contains("30.0"));
        assert!(lines[1].starts_with("  2. low "));
        assert!(lines[1].ends_with(&"#".repeat(13)));
    }
}
