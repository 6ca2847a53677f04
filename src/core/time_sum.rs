//! Exact summation of move times.
//!
//! Time tokens are `<digits>.<digits>s`; the `s` is dropped and the values are
//! added as arbitrary-precision decimals so long games never drift the way
//! binary floating point would.

use crate::domain::model::TimeToken;
use crate::utils::error::{CaraError, Result};
use bigdecimal::BigDecimal;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn time_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+\.[0-9]+s").expect("time token regex is valid"))
}

/// Every non-overlapping time token in `text`, left to right, `s` removed.
pub fn extract_time_tokens(text: &str) -> Vec<TimeToken> {
    time_token_regex()
        .find_iter(text)
        // the pattern only matches well-formed decimals
        .filter_map(|m| BigDecimal::from_str(m.as_str().trim_end_matches('s')).ok())
        .map(|value| TimeToken { value })
        .collect()
}

/// Sum of a set of time tokens.
///
/// Keeps as many fractional digits as the most precise input, so `1.00`
/// stays `1.00` and `12.5 + 0.13` prints `12.63`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTotal {
    value: BigDecimal,
    scale: i64,
    pub token_count: usize,
}

impl fmt::Display for TimeTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, scale) = self.value.with_scale(self.scale).as_bigint_and_exponent();
        let digits = digits.to_string();
        let (sign, digits) = match digits.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", digits.as_str()),
        };

        if scale <= 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let scale = scale as usize;
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, whole, fraction)
    }
}

/// Adds the tokens exactly. An empty slice is an error: there is no time to report.
pub fn sum_tokens(tokens: &[TimeToken], source: &str) -> Result<TimeTotal> {
    if tokens.is_empty() {
        return Err(CaraError::EmptyInput {
            path: source.to_string(),
        });
    }

    let scale = tokens.iter().map(TimeToken::scale).max().unwrap_or(0);
    let value: BigDecimal = tokens.iter().map(|token| &token.value).sum();

    Ok(TimeTotal {
        value,
        scale,
        token_count: tokens.len(),
    })
}
