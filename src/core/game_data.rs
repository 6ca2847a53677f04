use crate::domain::model::{Game, GameData, GameTermination, MoveData};
use crate::utils::error::{CaraError, GameError, Result};
use regex::{Captures, Regex};

pub const MATE_EVAL: i32 = 10000;

/// Turns parsed games into per-move eval/time data.
///
/// Every move must carry a tournament-manager comment such as
/// `+0.18/15 0.45s`; the first game that does not is reported with its
/// 1-based number.
pub fn map_game_data(games: &[Game]) -> Result<Vec<GameData>> {
    let comment_parser = CommentParser::new();

    games
        .iter()
        .enumerate()
        .map(|(index, game)| {
            map_single_game_data(game, &comment_parser).map_err(|error| CaraError::GameMapping {
                game_number: (index + 1) as u32,
                error,
            })
        })
        .collect()
}

fn map_single_game_data(
    game: &Game,
    comment_parser: &CommentParser,
) -> std::result::Result<GameData, GameError> {
    let score10 = match game.termination {
        GameTermination::WhiteWins => 10,
        GameTermination::DrawnGame => 5,
        GameTermination::BlackWins => 0,
        GameTermination::Unknown => return Err(GameError::UnknownGameTermination),
    };

    let move_data = game
        .moves
        .iter()
        .enumerate()
        .map(|(index, pgn_move)| {
            let ply = (index + 1) as u32;
            let comment = pgn_move
                .comment
                .as_deref()
                .ok_or(GameError::MissingComment { ply })?;
            comment_parser
                .parse(comment)
                .ok_or(GameError::BadComment { ply })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(GameData { score10, move_data })
}

pub struct CommentParser {
    re: Regex,
}

impl CommentParser {
    pub fn new() -> Self {
        let re = Regex::new(
            r"(?x)
                ^(?P<sign>[-+]?)
                (?:(?P<mate>M\d+)|(?P<eval>\d+)\.(?P<eval_dec>\d{2}))
                /\d+\s
                (?P<time>\d+)(?:\.(?P<time_dec>\d{1,3}))?s
            ",
        )
        .expect("comment regex is valid");

        Self { re }
    }

    pub fn parse(&self, comment: &str) -> Option<MoveData> {
        let captures = self.re.captures(comment)?;
        Some(MoveData {
            eval: Self::eval(&captures)?,
            time: Self::time(&captures)?,
        })
    }

    fn eval(captures: &Captures) -> Option<i32> {
        let magnitude = if captures.name("mate").is_some() {
            MATE_EVAL
        } else {
            let whole: i32 = captures.name("eval")?.as_str().parse().ok()?;
            let hundredths: i32 = captures.name("eval_dec")?.as_str().parse().ok()?;
            whole.checked_mul(100)?.checked_add(hundredths)?
        };

        match captures.name("sign").map(|m| m.as_str()) {
            Some("-") => Some(-magnitude),
            _ => Some(magnitude),
        }
    }

    fn time(captures: &Captures) -> Option<u32> {
        let seconds: u32 = captures.name("time")?.as_str().parse().ok()?;
        let millis = match captures.name("time_dec") {
            Some(fraction) => {
                let digits = fraction.as_str();
                let value: u32 = digits.parse().ok()?;
                value * 10u32.pow(3 - digits.len() as u32)
            }
            None => 0,
        };
        seconds.checked_mul(1000)?.checked_add(millis)
    }
}

impl Default for CommentParser {
    fn default() -> Self {
        Self::new()
    }
}
