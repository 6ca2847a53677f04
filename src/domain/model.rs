use bigdecimal::BigDecimal;

/// A `<digits>.<digits>` value found in front of a literal `s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeToken {
    pub value: BigDecimal,
}

impl TimeToken {
    /// Number of digits after the decimal point, as written.
    pub fn scale(&self) -> i64 {
        self.value.as_bigint_and_exponent().1
    }
}

/// One external process call: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Value following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }
}

/// Exit status of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Code to exit with so callers see the child's status.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// How a game ended according to its movetext result token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTermination {
    WhiteWins,
    BlackWins,
    DrawnGame,
    Unknown,
}

impl GameTermination {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(Self::WhiteWins),
            "0-1" => Some(Self::BlackWins),
            "1/2-1/2" => Some(Self::DrawnGame),
            "*" => Some(Self::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnMove {
    pub san: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<PgnMove>,
    pub termination: GameTermination,
}

/// The evaluation, in centipawns, of the engine after the move and the
/// time taken in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveData {
    pub eval: i32,
    pub time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameData {
    // Scores are stored as 10x the usual values and scaled down for display.
    // 1-0 => 10, 1/2-1/2 => 5, 0-1 => 0
    pub score10: u32,
    pub move_data: Vec<MoveData>,
}
