//! Replaying finished games against resign and draw adjudication rules.

use crate::domain::model::GameData;
use crate::utils::error::RuleFormatError;
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

/// An engine resigns once its eval is at or below `-eval` for `count` of
/// its own consecutive moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResignRule {
    pub eval: i32,
    pub count: u32,
}

/// The game is drawn once the eval stays within `[-eval, eval]` for `count`
/// consecutive moves of each side, no earlier than move `from_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawRule {
    pub from_move: u32,
    pub eval: i32,
    pub count: u32,
}

/// `None` stands for the literal rule `none`: never applied.
pub fn parse_resign_rule(input: &str) -> Result<Option<ResignRule>, RuleFormatError> {
    input.parse::<RuleSpec<ResignRule>>().map(|spec| spec.0)
}

pub fn parse_draw_rule(input: &str) -> Result<Option<DrawRule>, RuleFormatError> {
    input.parse::<RuleSpec<DrawRule>>().map(|spec| spec.0)
}

struct RuleSpec<T>(Option<T>);

impl FromStr for RuleSpec<ResignRule> {
    type Err = RuleFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "none" {
            return Ok(Self(None));
        }

        let (eval, count) = input.split_once('/').ok_or(RuleFormatError::ResignBadFormat)?;
        let eval: i32 = eval.parse().map_err(|_| RuleFormatError::ResignBadFormat)?;
        if eval <= 0 {
            return Err(RuleFormatError::ResignNonPositiveEval);
        }

        let count: u32 = count.parse().map_err(|_| RuleFormatError::ResignBadFormat)?;
        if count == 0 {
            return Err(RuleFormatError::ResignNonPositiveCount);
        }

        Ok(Self(Some(ResignRule { eval, count })))
    }
}

impl FromStr for RuleSpec<DrawRule> {
    type Err = RuleFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "none" {
            return Ok(Self(None));
        }

        let (from_move, rest) = input.split_once(':').ok_or(RuleFormatError::DrawBadFormat)?;
        let from_move: u32 = from_move.parse().map_err(|_| RuleFormatError::DrawBadFormat)?;
        if from_move == 0 {
            return Err(RuleFormatError::DrawNonPositiveFromMove);
        }

        let (eval, count) = rest.split_once('/').ok_or(RuleFormatError::DrawBadFormat)?;
        let eval: i32 = eval.parse().map_err(|_| RuleFormatError::DrawBadFormat)?;
        if eval <= 0 {
            return Err(RuleFormatError::DrawNonPositiveEval);
        }

        let count: u32 = count.parse().map_err(|_| RuleFormatError::DrawBadFormat)?;
        if count == 0 {
            return Err(RuleFormatError::DrawNonPositiveCount);
        }

        Ok(Self(Some(DrawRule {
            from_move,
            eval,
            count,
        })))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleType {
    Resign,
    Draw,
}

impl RuleType {
    fn marker(rule: Option<RuleType>) -> &'static str {
        match rule {
            Some(RuleType::Resign) => "R",
            Some(RuleType::Draw) => "D",
            None => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub length: u32,
    pub time: u64,
    pub score10: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjudicationOutcome {
    pub actual: GameStats,
    pub rule_applied: Option<RuleType>,
    pub adjudicated: GameStats,
}

impl AdjudicationOutcome {
    pub fn correctly_adjudicated(&self) -> bool {
        self.actual.score10 == self.adjudicated.score10
    }

    /// Only correctly adjudicated games count as time saved.
    pub fn time_saved(&self) -> u64 {
        if self.correctly_adjudicated() {
            self.actual.time - self.adjudicated.time
        } else {
            0
        }
    }

    pub fn squared_error10(&self) -> u32 {
        self.actual.score10.abs_diff(self.adjudicated.score10).pow(2)
    }
}

pub fn adjudicate_game(
    game: &GameData,
    resign_rule: Option<&ResignRule>,
    draw_rule: Option<&DrawRule>,
) -> AdjudicationOutcome {
    let mut resign_counts: [u32; 2] = [0, 0];
    let mut draw_count = 0;

    let mut total_time = 0;
    let mut rule_applied = None;
    let mut adjudicated = None;

    for (ply0, move_data) in game.move_data.iter().enumerate() {
        total_time += u64::from(move_data.time);

        if adjudicated.is_some() {
            continue;
        }

        let ply = ply0 as u32 + 1;
        let side = ply0 % 2;

        if let Some(rule) = draw_rule {
            if move_data.eval.abs() <= rule.eval {
                draw_count += 1;
            } else {
                draw_count = 0;
            }

            if ply / 2 >= rule.from_move && draw_count >= 2 * rule.count {
                rule_applied = Some(RuleType::Draw);
                adjudicated = Some(GameStats {
                    length: ply,
                    time: total_time,
                    score10: 5,
                });
                continue;
            }
        }

        if let Some(rule) = resign_rule {
            if move_data.eval <= -rule.eval {
                resign_counts[side] += 1;
            } else {
                resign_counts[side] = 0;
            }

            if resign_counts[side] == rule.count {
                rule_applied = Some(RuleType::Resign);
                adjudicated = Some(GameStats {
                    length: ply,
                    time: total_time,
                    // white resigning loses the game, black resigning wins it for white
                    score10: [0, 10][side],
                });
            }
        }
    }

    let actual = GameStats {
        length: game.move_data.len() as u32,
        time: total_time,
        score10: game.score10,
    };

    AdjudicationOutcome {
        adjudicated: adjudicated.unwrap_or(actual),
        rule_applied,
        actual,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRow {
    pub game: usize,
    pub actual_length: u32,
    pub actual_time: u64,
    pub actual_score: f32,
    pub rule_applied: &'static str,
    pub adjudicated_length: u32,
    pub adjudicated_time: u64,
    pub adjudicated_score: f32,
}

impl GameRow {
    fn new(game: usize, outcome: &AdjudicationOutcome) -> Self {
        Self {
            game,
            actual_length: outcome.actual.length,
            actual_time: outcome.actual.time,
            actual_score: outcome.actual.score10 as f32 / 10.0,
            rule_applied: RuleType::marker(outcome.rule_applied),
            adjudicated_length: outcome.adjudicated.length,
            adjudicated_time: outcome.adjudicated.time,
            adjudicated_score: outcome.adjudicated.score10 as f32 / 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RuleTally {
    pub adjudicated: u32,
    pub wrong: u32,
    pub time_saved: u64,
    pub squared_error10: u64,
}

impl RuleTally {
    fn record(&mut self, outcome: &AdjudicationOutcome) {
        self.adjudicated += 1;
        self.wrong += u32::from(!outcome.correctly_adjudicated());
        self.time_saved += outcome.time_saved();
        self.squared_error10 += u64::from(outcome.squared_error10());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjudicationReport {
    pub resign_rule: Option<ResignRule>,
    pub draw_rule: Option<DrawRule>,
    pub games: Vec<GameRow>,
    pub actual_time: u64,
    pub adjudicated_time: u64,
    pub resign: RuleTally,
    pub draw: RuleTally,
}

pub fn test_rule(
    games: &[GameData],
    resign_rule: Option<&ResignRule>,
    draw_rule: Option<&DrawRule>,
) -> AdjudicationReport {
    let mut report = AdjudicationReport {
        resign_rule: resign_rule.copied(),
        draw_rule: draw_rule.copied(),
        games: Vec::with_capacity(games.len()),
        actual_time: 0,
        adjudicated_time: 0,
        resign: RuleTally::default(),
        draw: RuleTally::default(),
    };

    for (index, game) in games.iter().enumerate() {
        let outcome = adjudicate_game(game, resign_rule, draw_rule);

        match outcome.rule_applied {
            Some(RuleType::Resign) => report.resign.record(&outcome),
            Some(RuleType::Draw) => report.draw.record(&outcome),
            None => {}
        }

        report.actual_time += outcome.actual.time;
        report.adjudicated_time += outcome.adjudicated.time;
        report.games.push(GameRow::new(index + 1, &outcome));
    }

    tracing::debug!(
        "Adjudicated {} of {} games",
        report.resign.adjudicated + report.draw.adjudicated,
        games.len()
    );
    report
}

impl AdjudicationReport {
    pub fn time_saved(&self) -> u64 {
        self.resign.time_saved + self.draw.time_saved
    }

    fn percent_of_actual(&self, time: u64) -> f64 {
        if self.actual_time == 0 {
            return 0.0;
        }
        time as f64 / self.actual_time as f64 * 100.0
    }

    /// Mean squared score error in points², over all games.
    fn mse(&self, squared_error10: u64) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        squared_error10 as f64 / 100.0 / self.games.len() as f64
    }

    pub fn mean_squared_error(&self) -> f64 {
        self.mse(self.resign.squared_error10 + self.draw.squared_error10)
    }

    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_text(&mut out, verbose);
        out
    }

    fn write_text(&self, out: &mut String, verbose: bool) -> std::fmt::Result {
        if verbose {
            writeln!(
                out,
                "game, actual_length, actual_time, actual_score, \
                 rule_applied, adjudicated_length, adjudicated_time, adjudicated_score"
            )?;
            for row in &self.games {
                writeln!(
                    out,
                    "{}, {}, {}, {}, {}, {}, {}, {}",
                    row.game,
                    row.actual_length,
                    row.actual_time,
                    row.actual_score,
                    row.rule_applied,
                    row.adjudicated_length,
                    row.adjudicated_time,
                    row.adjudicated_score
                )?;
            }
            writeln!(out)?;
        }

        let adjudicated = self.resign.adjudicated + self.draw.adjudicated;
        let wrong = self.resign.wrong + self.draw.wrong;

        writeln!(out, "Games: {}", self.games.len())?;
        writeln!(out, "Adjudicated: {} ({} wrong)", adjudicated, wrong)?;
        writeln!(out, "  Resign: {} ({} wrong)", self.resign.adjudicated, self.resign.wrong)?;
        writeln!(out, "  Draw: {} ({} wrong)", self.draw.adjudicated, self.draw.wrong)?;
        writeln!(out)?;

        let time_saved = self.time_saved();
        writeln!(out, "Total Time: {}", format_time(self.actual_time))?;
        writeln!(out, "After Adjudication: {}", format_time(self.adjudicated_time))?;
        writeln!(
            out,
            "Time saved: {} ({:.2}%)",
            format_time(time_saved),
            self.percent_of_actual(time_saved)
        )?;
        writeln!(
            out,
            "  Resign: {} ({:.2}%)",
            format_time(self.resign.time_saved),
            self.percent_of_actual(self.resign.time_saved)
        )?;
        writeln!(
            out,
            "  Draw: {} ({:.2}%)",
            format_time(self.draw.time_saved),
            self.percent_of_actual(self.draw.time_saved)
        )?;
        writeln!(out, "Note: 'Time saved' excludes incorrectly adjudicated games")?;
        writeln!(out)?;

        let mse = self.mean_squared_error();
        writeln!(out, "Mean Squared Error: {:.6}", mse)?;
        writeln!(out, "  Resign: {:.6}", self.mse(self.resign.squared_error10))?;
        writeln!(out, "  Draw: {:.6}", self.mse(self.draw.squared_error10))?;
        writeln!(out, "Root MSE: {:.3}", mse.sqrt())
    }
}

/// `h:mm:ss.mmm` from milliseconds.
pub fn format_time(milliseconds: u64) -> String {
    let ms = milliseconds % 1000;
    let seconds = milliseconds / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60,
        ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MoveData;

    fn game(score10: u32, evals: &[i32]) -> GameData {
        GameData {
            score10,
            move_data: evals.iter().map(|&eval| MoveData { eval, time: 100 }).collect(),
        }
    }

    #[test]
    fn test_parse_resign_rule() {
        assert_eq!(parse_resign_rule("none"), Ok(None));
        assert_eq!(
            parse_resign_rule("250/3"),
            Ok(Some(ResignRule { eval: 250, count: 3 }))
        );
        assert_eq!(parse_resign_rule("250"), Err(RuleFormatError::ResignBadFormat));
        assert_eq!(parse_resign_rule("x/3"), Err(RuleFormatError::ResignBadFormat));
        assert_eq!(parse_resign_rule("0/3"), Err(RuleFormatError::ResignNonPositiveEval));
        assert_eq!(parse_resign_rule("-5/3"), Err(RuleFormatError::ResignNonPositiveEval));
        assert_eq!(parse_resign_rule("250/0"), Err(RuleFormatError::ResignNonPositiveCount));
    }

    #[test]
    fn test_parse_draw_rule() {
        assert_eq!(parse_draw_rule("none"), Ok(None));
        assert_eq!(
            parse_draw_rule("34:30/8"),
            Ok(Some(DrawRule { from_move: 34, eval: 30, count: 8 }))
        );
        assert_eq!(parse_draw_rule("30/8"), Err(RuleFormatError::DrawBadFormat));
        assert_eq!(parse_draw_rule("34:30"), Err(RuleFormatError::DrawBadFormat));
        assert_eq!(parse_draw_rule("0:30/8"), Err(RuleFormatError::DrawNonPositiveFromMove));
        assert_eq!(parse_draw_rule("34:0/8"), Err(RuleFormatError::DrawNonPositiveEval));
        assert_eq!(parse_draw_rule("34:30/0"), Err(RuleFormatError::DrawNonPositiveCount));
    }

    #[test]
    fn test_no_rules_leave_games_untouched() {
        let g = game(5, &[0, 0, 0, 0]);
        let outcome = adjudicate_game(&g, None, None);

        assert_eq!(outcome.rule_applied, None);
        assert_eq!(outcome.adjudicated, outcome.actual);
        assert_eq!(outcome.actual, GameStats { length: 4, time: 400, score10: 5 });
    }

    #[test]
    fn test_white_resigns() {
        // white's evals (even plies) sink below -300 twice in a row
        let g = game(0, &[-10, 20, -350, 360, -400, 420, -500, 510]);
        let rule = ResignRule { eval: 300, count: 2 };
        let outcome = adjudicate_game(&g, Some(&rule), None);

        assert_eq!(outcome.rule_applied, Some(RuleType::Resign));
        assert_eq!(outcome.adjudicated, GameStats { length: 5, time: 500, score10: 0 });
        assert!(outcome.correctly_adjudicated());
        assert_eq!(outcome.time_saved(), 300);
    }

    #[test]
    fn test_black_resigns_but_game_was_drawn() {
        let g = game(5, &[300, -300, 300, -300, 0, 0]);
        let rule = ResignRule { eval: 250, count: 2 };
        let outcome = adjudicate_game(&g, Some(&rule), None);

        assert_eq!(outcome.rule_applied, Some(RuleType::Resign));
        assert_eq!(outcome.adjudicated.score10, 10);
        assert_eq!(outcome.adjudicated.length, 4);
        assert!(!outcome.correctly_adjudicated());
        assert_eq!(outcome.time_saved(), 0);
        assert_eq!(outcome.squared_error10(), 25);
    }

    #[test]
    fn test_draw_rule_waits_for_from_move() {
        let g = game(5, &[0; 10]);
        let rule = DrawRule { from_move: 3, eval: 10, count: 1 };
        let outcome = adjudicate_game(&g, None, Some(&rule));

        // streak of 2 is reached at ply 2, but move 3 starts at ply 6
        assert_eq!(outcome.rule_applied, Some(RuleType::Draw));
        assert_eq!(outcome.adjudicated, GameStats { length: 6, time: 600, score10: 5 });
        assert_eq!(outcome.actual.time, 1000);
    }

    #[test]
    fn test_draw_streak_resets() {
        let g = game(10, &[0, 0, 0, 90, 0, 0, 0, 0]);
        let rule = DrawRule { from_move: 1, eval: 20, count: 2 };
        let outcome = adjudicate_game(&g, None, Some(&rule));

        assert_eq!(outcome.adjudicated.length, 8);
        assert_eq!(outcome.squared_error10(), 25);
    }

    #[test]
    fn test_draw_checked_before_resign() {
        let g = game(5, &[-50, -50]);
        let resign = ResignRule { eval: 40, count: 1 };
        let draw = DrawRule { from_move: 1, eval: 60, count: 1 };
        let outcome = adjudicate_game(&g, Some(&resign), Some(&draw));

        // ply 1: draw streak 1 is too short, white's resign streak fires
        assert_eq!(outcome.rule_applied, Some(RuleType::Resign));
        assert_eq!(outcome.adjudicated.length, 1);
    }

    #[test]
    fn test_time_totals_beyond_u32() {
        let long_game = GameData {
            score10: 5,
            move_data: vec![MoveData { eval: 0, time: u32::MAX }; 3],
        };

        let report = test_rule(&[long_game.clone(), long_game], None, None);

        assert_eq!(report.actual_time, 6 * u64::from(u32::MAX));
        assert_eq!(report.games[0].actual_time, 3 * u64::from(u32::MAX));
        assert!(report.render(false).contains("Total Time: 7158:16:43."));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00:00.000");
        assert_eq!(format_time(117_986), "0:01:57.986");
        assert_eq!(format_time(3_723_004), "1:02:03.004");
    }

    #[test]
    fn test_report_rendering() {
        let games = vec![
            game(0, &[-10, 20, -350, 360, -400, 420, -500, 510]),
            game(5, &[0, 0, 0, 0]),
        ];
        let rule = ResignRule { eval: 300, count: 2 };
        let report = test_rule(&games, Some(&rule), None);

        let expected = concat!(
            "game, actual_length, actual_time, actual_score, ",
            "rule_applied, adjudicated_length, adjudicated_time, adjudicated_score\n",
            "1, 8, 800, 0, R, 5, 500, 0\n",
            "2, 4, 400, 0.5, -, 4, 400, 0.5\n",
            "\n",
            "Games: 2\n",
            "Adjudicated: 1 (0 wrong)\n",
            "  Resign: 1 (0 wrong)\n",
            "  Draw: 0 (0 wrong)\n",
            "\n",
            "Total Time: 0:00:01.200\n",
            "After Adjudication: 0:00:00.900\n",
            "Time saved: 0:00:00.300 (25.00%)\n",
            "  Resign: 0:00:00.300 (25.00%)\n",
            "  Draw: 0:00:00.000 (0.00%)\n",
            "Note: 'Time saved' excludes incorrectly adjudicated games\n",
            "\n",
            "Mean Squared Error: 0.000000\n",
            "  Resign: 0.000000\n",
            "  Draw: 0.000000\n",
            "Root MSE: 0.000\n"
        );
        assert_eq!(report.render(true), expected);
        assert!(report.render(false).starts_with("Games: 2\n"));
    }

    #[test]
    fn test_empty_report_has_no_nan() {
        let report = test_rule(&[], None, None);
        let text = report.render(false);
        assert!(text.contains("Time saved: 0:00:00.000 (0.00%)"));
        assert!(text.contains("Root MSE: 0.000"));
    }
}
