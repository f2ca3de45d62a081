use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use limited_sum_logic::ArenaConfig;

/// Round-robin tournament of limited-sum game strategies
#[derive(Parser, Debug)]
#[command(name = "limited-sum-arena", version, about)]
pub struct CliArgs {
    /// Path to JSON arena config (built-in example roster when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the example config to this path and exit
    #[arg(long, conflicts_with = "config")]
    pub write_example: Option<PathBuf>,

    /// Print the final ranking as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every completed match
    #[arg(long)]
    pub trace_matches: bool,

    // --- Overrides ---
    #[arg(long)]
    pub rounds: Option<u32>,

    #[arg(long)]
    pub error: Option<f64>,

    #[arg(long)]
    pub repetitions: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Load the arena config and apply command-line overrides
    pub fn load(&self) -> Result<ArenaConfig> {
        let mut config = match &self.config {
            Some(path) => ArenaConfig::from_path(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ArenaConfig::example(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ArenaConfig) {
        if let Some(rounds) = self.rounds {
            config.tournament.n_rounds = rounds;
        }
        if let Some(error) = self.error {
            config.tournament.error = error;
        }
        if let Some(repetitions) = self.repetitions {
            config.tournament.repetitions = repetitions;
        }
        if let Some(seed) = self.seed {
            config.tournament.seed = Some(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_example() {
        let args = CliArgs::parse_from(["limited-sum-arena"]);
        assert_eq!(args.load().unwrap(), ArenaConfig::example());
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::parse_from([
            "limited-sum-arena",
            "--rounds",
            "20",
            "--error",
            "0.1",
            "--repetitions",
            "5",
            "--seed",
            "7",
        ]);
        let config = args.load().unwrap();
        assert_eq!(config.tournament.n_rounds, 20);
        assert_eq!(config.tournament.error, 0.1);
        assert_eq!(config.tournament.repetitions, 5);
        assert_eq!(config.tournament.seed, Some(7));
        assert_eq!(config.participants, ArenaConfig::example().participants);
    }

    #[test]
    fn test_missing_config_file() {
        let args = CliArgs::parse_from(["limited-sum-arena", "--config", "/nonexistent/arena.json"]);
        let err = args.load().unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_write_example_conflicts_with_config() {
        let parsed = CliArgs::try_parse_from([
            "limited-sum-arena",
            "--config",
            "a.json",
            "--write-example",
            "b.json",
        ]);
        assert!(parsed.is_err());
    }
}
