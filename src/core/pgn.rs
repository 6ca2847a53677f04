//! Minimal PGN reader.
//!
//! Recovers tag pairs, the main line's moves with their `{}` comments, and the
//! result token of each game. Moves are taken as written; nothing is checked
//! against a board.

use crate::domain::model::{Game, GameTermination, PgnMove};
use crate::utils::error::{CaraError, Result};
use std::iter::Peekable;
use std::str::CharIndices;

pub fn read_games(text: &str) -> Result<Vec<Game>> {
    let mut reader = PgnReader::new(text);
    reader.read_all()?;
    Ok(reader.games)
}

#[derive(Default)]
struct GameBuilder {
    tags: Vec<(String, String)>,
    moves: Vec<PgnMove>,
}

impl GameBuilder {
    fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.moves.is_empty()
    }

    fn finish(self, termination: GameTermination) -> Game {
        Game {
            tags: self.tags,
            moves: self.moves,
            termination,
        }
    }
}

struct PgnReader<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    current: GameBuilder,
    games: Vec<Game>,
}

impl<'a> PgnReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
            line: 1,
            current: GameBuilder::default(),
            games: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> CaraError {
        CaraError::PgnParse {
            message: format!("line {}: {}", self.line, message.into()),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn at_line_start(&mut self) -> bool {
        match self.chars.peek() {
            Some(&(index, _)) => index == 0 || self.text[..index].ends_with('\n'),
            None => false,
        }
    }

    fn read_all(&mut self) -> Result<()> {
        // line breaks seen since the last token; two or more is a blank line
        let mut newlines = 0usize;

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                if c == '\n' {
                    newlines += 1;
                }
                self.next_char();
                continue;
            }

            let after_blank_line = std::mem::take(&mut newlines) >= 2;
            match c {
                '%' if self.at_line_start() => {
                    self.skip_line();
                    newlines = 1;
                }
                '[' => {
                    // a new tag section after movetext, or after a tag section
                    // that never got movetext, starts the next game
                    let unfinished = !self.current.moves.is_empty()
                        || (after_blank_line && !self.current.tags.is_empty());
                    if unfinished {
                        self.finish_game(None);
                    }
                    let tag = self.read_tag()?;
                    self.current.tags.push(tag);
                }
                '{' => {
                    let comment = self.read_comment()?;
                    self.attach_comment(comment);
                }
                ';' => {
                    self.skip_line();
                    newlines = 1;
                }
                '(' => self.skip_variation()?,
                '$' => {
                    self.next_char();
                    self.read_symbol();
                }
                ')' => return Err(self.error("unexpected ')'")),
                ']' => return Err(self.error("unexpected ']'")),
                '}' => return Err(self.error("unexpected '}'")),
                _ => {
                    let token = self.read_symbol();
                    self.handle_token(&token);
                }
            }
        }

        if !self.current.is_empty() {
            self.finish_game(None);
        }
        Ok(())
    }

    fn handle_token(&mut self, token: &str) {
        if let Some(termination) = GameTermination::from_token(token) {
            self.finish_game(Some(termination));
            return;
        }

        // standalone suffix annotations such as "!?" are not moves
        if token.chars().all(|c| c == '!' || c == '?') {
            return;
        }

        // move numbers: "12." "12..." or glued "12.e4"
        let san = token.trim_start_matches(|c: char| c.is_ascii_digit());
        let san = if san.len() < token.len() && san.starts_with('.') {
            san.trim_start_matches('.')
        } else {
            token
        };

        if !san.is_empty() {
            self.current.moves.push(PgnMove {
                san: san.to_string(),
                comment: None,
            });
        }
    }

    fn finish_game(&mut self, termination: Option<GameTermination>) {
        let builder = std::mem::take(&mut self.current);
        let termination = termination
            .or_else(|| {
                builder
                    .tags
                    .iter()
                    .find(|(key, _)| key == "Result")
                    .and_then(|(_, value)| GameTermination::from_token(value))
            })
            .unwrap_or(GameTermination::Unknown);
        self.games.push(builder.finish(termination));
    }

    fn attach_comment(&mut self, comment: String) {
        // comments before the first move belong to the game, not a move
        if let Some(last) = self.current.moves.last_mut() {
            last.comment = Some(match last.comment.take() {
                Some(existing) => format!("{} {}", existing, comment),
                None => comment,
            });
        }
    }

    fn read_symbol(&mut self) -> String {
        let mut symbol = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || "{}()[];$".contains(c) {
                break;
            }
            symbol.push(c);
            self.next_char();
        }
        symbol
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.next_char() {
            if c == '\n' {
                break;
            }
        }
    }

    fn read_tag(&mut self) -> Result<(String, String)> {
        self.next_char(); // '['
        self.skip_inline_whitespace();

        let name = self.read_symbol();
        if name.is_empty() {
            return Err(self.error("tag without a name"));
        }

        self.skip_inline_whitespace();
        if self.next_char() != Some('"') {
            return Err(self.error(format!("tag {} has no quoted value", name)));
        }

        let mut value = String::new();
        loop {
            match self.next_char() {
                Some('\\') => match self.next_char() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated tag value")),
                },
                Some('"') => break,
                Some('\n') | None => return Err(self.error("unterminated tag value")),
                Some(c) => value.push(c),
            }
        }

        self.skip_inline_whitespace();
        if self.next_char() != Some(']') {
            return Err(self.error(format!("tag {} is not closed", name)));
        }

        Ok((name, value))
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c == ' ' || c == '\t') {
            self.next_char();
        }
    }

    fn read_comment(&mut self) -> Result<String> {
        let start_line = self.line;
        self.next_char(); // '{'

        let mut comment = String::new();
        loop {
            match self.next_char() {
                Some('}') => break,
                Some(c) => comment.push(c),
                None => {
                    return Err(CaraError::PgnParse {
                        message: format!("line {}: unterminated comment", start_line),
                    })
                }
            }
        }

        Ok(comment.trim().to_string())
    }

    fn skip_variation(&mut self) -> Result<()> {
        let start_line = self.line;
        let mut depth = 0usize;

        while let Some(c) = self.peek_char() {
            match c {
                '(' => {
                    depth += 1;
                    self.next_char();
                }
                ')' => {
                    depth -= 1;
                    self.next_char();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '{' => {
                    self.read_comment()?;
                }
                ';' => self.skip_line(),
                _ => {
                    self.next_char();
                }
            }
        }

        Err(CaraError::PgnParse {
            message: format!("line {}: unterminated variation", start_line),
        })
    }
}
