//! Form Input Parsing
//!
//! Turns the raw text typed into the dashboard forms into validated values.
//! Nothing here touches the network; a value that fails to parse never
//! reaches the API client.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First valid month number
pub const MIN_MONTH: u8 = 1;
/// Last valid month number
pub const MAX_MONTH: u8 = 12;

/// Errors produced while validating form input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid input: '{0}' is not a month number (1-12)")]
    InvalidMonth(String),

    #[error("Invalid input: month {0} is outside 1-12")]
    MonthOutOfRange(i64),

    #[error("Invalid input: no customer features given")]
    EmptyFeatures,

    #[error("Invalid input: feature {position} ('{token}') is not a finite number")]
    InvalidFeature { position: usize, token: String },
}

/// A calendar month number in `1..=12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Month(u8);

impl Month {
    /// Validate a month number
    pub fn new(value: i64) -> Result<Self, InputError> {
        if (MIN_MONTH as i64..=MAX_MONTH as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InputError::MonthOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Month {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidMonth(raw.to_string()))?;
        Month::new(value)
    }
}

/// Parse the month input field
pub fn parse_month(raw: &str) -> Result<Month, InputError> {
    raw.parse()
}

/// Parse a comma-separated customer feature list (e.g. "25, 40000, 30")
///
/// Every token must be a finite number. Empty tokens are rejected rather
/// than read as zero.
pub fn parse_features(raw: &str) -> Result<Vec<f64>, InputError> {
    if raw.trim().is_empty() {
        return Err(InputError::EmptyFeatures);
    }

    raw.split(',')
        .enumerate()
        .map(|(position, token)| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| InputError::InvalidFeature {
                    position,
                    token: token.to_string(),
                })
        })
        .collect()
}
