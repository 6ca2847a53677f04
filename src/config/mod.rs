pub mod tournament;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use clap::{Args, Parser, Subcommand};

pub use tournament::TournamentPlan;

pub const DEFAULT_ROUNDS: u32 = 10;

#[derive(Debug, Clone, Parser)]
#[command(name = "run_tournament")]
#[command(about = "Play a stockfish vs stockfish tournament with cutechess-cli")]
pub struct LauncherArgs {
    /// Number of rounds to play
    #[arg(short = 'r', value_name = "ROUNDS", default_value_t = DEFAULT_ROUNDS,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// PGN file the games are written to; must not exist yet
    pub pgn_out: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Validate for LauncherArgs {
    fn validate(&self) -> Result<()> {
        validate_positive_number("rounds", self.rounds, 1)?;
        validate_path("pgn_out", &self.pgn_out)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sum_times")]
#[command(about = "Sum every move time (e.g. 0.45s) found in a PGN file")]
pub struct AggregatorArgs {
    /// PGN file to scan
    pub pgn_file: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Validate for AggregatorArgs {
    fn validate(&self) -> Result<()> {
        validate_path("pgn_file", &self.pgn_file)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cara", version)]
#[command(about = "Tool for studying chess adjudication rules")]
#[command(arg_required_else_help = true)]
pub struct AnalyzerArgs {
    #[command(subcommand)]
    pub command: AnalyzerCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AnalyzerCommand {
    /// Applies <RESIGN_RULE> and <DRAW_RULE> on <FILE>
    Test(RuleTestArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RuleTestArgs {
    /// The PGN file to analyze
    pub file: String,

    /// The resign rule in format <eval>/<count> or 'none'
    pub resign_rule: String,

    /// The draw rule in format <move_number>:<eval>/<count> or 'none'
    pub draw_rule: String,

    /// Print one line per game before the summary
    #[arg(long)]
    pub verbose: bool,

    /// Also write the per-game lines as CSV to this file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Validate for RuleTestArgs {
    fn validate(&self) -> Result<()> {
        validate_path("file", &self.file)?;
        validate_non_empty_string("resign_rule", &self.resign_rule)?;
        validate_non_empty_string("draw_rule", &self.draw_rule)?;
        if let Some(csv) = &self.csv {
            validate_path("csv", csv)?;
        }
        Ok(())
    }
}
