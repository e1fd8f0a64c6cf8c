//! Weekday token codec.
//!
//! Rates name their days with a closed set of seven tokens. Indices are
//! ordinal weekdays with Sunday first (0..=6), matching the reference week
//! used by the expander.

use crate::error::RateError;

pub const SUN: &str = "sun";
pub const MON: &str = "mon";
pub const TUES: &str = "tues";
pub const WED: &str = "wed";
pub const THURS: &str = "thurs";
pub const FRI: &str = "fri";
pub const SAT: &str = "sat";

/// All weekday tokens, Sunday first.
pub const DAY_TOKENS: [&str; 7] = [SUN, MON, TUES, WED, THURS, FRI, SAT];

/// Returns true if `day` is one of the seven known tokens.
pub fn is_valid_day(day: &str) -> bool {
    DAY_TOKENS.contains(&day)
}

/// Converts a day token to its ordinal weekday index (0 = Sunday).
pub fn day_to_index(day: &str) -> Result<u32, RateError> {
    DAY_TOKENS
        .iter()
        .position(|&token| token == day)
        .map(|index| index as u32)
        .ok_or_else(|| RateError::InvalidDay(day.to_string()))
}

/// Converts an ordinal weekday index (0 = Sunday) back to its token.
pub fn index_to_day(index: u32) -> Result<&'static str, RateError> {
    DAY_TOKENS
        .get(index as usize)
        .copied()
        .ok_or(RateError::InvalidDayIndex(index))
}

/// Returns the token for a chrono weekday. Total over the domain.
pub fn weekday_token(weekday: chrono::Weekday) -> &'static str {
    DAY_TOKENS[weekday.num_days_from_sunday() as usize]
}
