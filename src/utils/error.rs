use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaraError {
    #[error("required executable not found on PATH: {executable}")]
    DependencyMissing { executable: String },

    #[error("output file already exists: {path}")]
    OutputAlreadyExists { path: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("cannot write {path}: {source}")]
    ReportWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("no time values found in {path}")]
    EmptyInput { path: String },

    #[error("Can't parse pgn file: {message}")]
    PgnParse { message: String },

    #[error("Game {game_number}{error}")]
    GameMapping { game_number: u32, error: GameError },

    #[error(transparent)]
    RuleFormat(#[from] RuleFormatError),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },
}

/// Problems with a single game while turning it into per-move data.
///
/// Rendered as a suffix of the `Game <n>` prefix carried by
/// [`CaraError::GameMapping`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(" has unknown result")]
    UnknownGameTermination,

    #[error(", Ply {ply} - Missing comment")]
    MissingComment { ply: u32 },

    #[error(", Ply {ply} - Bad comment format")]
    BadComment { ply: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFormatError {
    #[error("Resign rule has bad format")]
    ResignBadFormat,

    #[error("Resign rule evaluation must be positive")]
    ResignNonPositiveEval,

    #[error("Resign rule count must be positive")]
    ResignNonPositiveCount,

    #[error("Draw rule has bad format")]
    DrawBadFormat,

    #[error("Draw rule move from must be positive")]
    DrawNonPositiveFromMove,

    #[error("Draw rule evaluation must be positive")]
    DrawNonPositiveEval,

    #[error("Draw rule count must be positive")]
    DrawNonPositiveCount,
}

impl CaraError {
    /// 根據錯誤類型決定退出碼 (與 clap 的用法錯誤一致)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CaraError>;
