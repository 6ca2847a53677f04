use crate::domain::model::Invocation;
use std::path::{Path, PathBuf};

pub const TOURNAMENT_RUNNER: &str = "cutechess-cli";
pub const ENGINE: &str = "stockfish";
pub const OPENING_BOOK_FILE: &str = "openings.pgn";

/// Fixed tournament parameters handed to the tournament runner.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentPlan {
    pub runner: String,
    pub engine: String,
    pub engine_names: [String; 2],
    pub opening_book: PathBuf,
    pub opening_order: String,
    pub hash_mb: u32,
    pub protocol: String,
    pub time_control: String,
    pub threads: u32,
    pub concurrency: u32,
}

impl TournamentPlan {
    /// 開局庫放在啟動程式旁邊
    pub fn with_book_dir(book_dir: &Path) -> Self {
        Self {
            opening_book: book_dir.join(OPENING_BOOK_FILE),
            ..Self::default()
        }
    }

    /// Executables that must be on the search path before anything runs.
    pub fn required_executables(&self) -> [&str; 2] {
        [self.runner.as_str(), self.engine.as_str()]
    }

    pub fn invocation(&self, rounds: u32, pgn_out: &str) -> Invocation {
        let mut invocation = Invocation::new(&self.runner)
            .arg("-openings")
            .arg(format!("file={}", self.opening_book.to_string_lossy()))
            .arg("format=pgn")
            .arg(format!("order={}", self.opening_order));

        for name in &self.engine_names {
            invocation = invocation
                .arg("-engine")
                .arg(format!("cmd={}", self.engine))
                .arg(format!("name={}", name))
                .arg(format!("option.Hash={}", self.hash_mb));
        }

        invocation
            .arg("-each")
            .arg(format!("proto={}", self.protocol))
            .arg(format!("tc={}", self.time_control))
            .arg(format!("option.Threads={}", self.threads))
            .arg("-rounds")
            .arg(rounds.to_string())
            .arg("-pgnout")
            .arg(pgn_out)
            .arg("-concurrency")
            .arg(self.concurrency.to_string())
    }
}

impl Default for TournamentPlan {
    fn default() -> Self {
        Self {
            runner: TOURNAMENT_RUNNER.to_string(),
            engine: ENGINE.to_string(),
            engine_names: [format!("{}-1", ENGINE), format!("{}-2", ENGINE)],
            opening_book: PathBuf::from(OPENING_BOOK_FILE),
            opening_order: "random".to_string(),
            hash_mb: 16,
            protocol: "uci".to_string(),
            time_control: "10+0.1".to_string(),
            threads: 1,
            concurrency: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_carries_fixed_parameters() {
        let plan = TournamentPlan::with_book_dir(Path::new("/opt/cara"));
        let invocation = plan.invocation(4, "games.pgn");

        assert_eq!(invocation.program, "cutechess-cli");
        let book = Path::new("/opt/cara").join("openings.pgn");
        let book_arg = format!("file={}", book.to_string_lossy());
        assert_eq!(invocation.value_of("-openings"), Some(book_arg.as_str()));
        assert!(invocation.args.contains(&"order=random".to_string()));
        assert_eq!(
            invocation.args.iter().filter(|arg| *arg == "cmd=stockfish").count(),
            2
        );
        assert_eq!(
            invocation.args.iter().filter(|arg| *arg == "option.Hash=16").count(),
            2
        );
        assert_eq!(invocation.value_of("-each"), Some("proto=uci"));
        assert!(invocation.args.contains(&"tc=10+0.1".to_string()));
        assert!(invocation.args.contains(&"option.Threads=1".to_string()));
        assert_eq!(invocation.value_of("-rounds"), Some("4"));
        assert_eq!(invocation.value_of("-pgnout"), Some("games.pgn"));
        assert_eq!(invocation.value_of("-concurrency"), Some("1"));
    }

    #[test]
    fn test_engines_have_distinct_names() {
        let plan = TournamentPlan::default();
        assert_ne!(plan.engine_names[0], plan.engine_names[1]);
        assert_eq!(plan.required_executables(), ["cutechess-cli", "stockfish"]);
    }
}
