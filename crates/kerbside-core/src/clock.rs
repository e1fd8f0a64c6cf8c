//! Clock-span parsing.
//!
//! A span is the string form `"HHMM-HHMM"`: two 4-digit 24-hour clock times
//! joined by a single `-`. Parsing is purely syntactic; whether the first
//! time precedes the second is a validation concern, not a parsing one.

use chrono::NaiveTime;

use crate::error::RateError;

/// Parses a `"HHMM-HHMM"` span into its two clock times, in written order.
pub fn parse_clock_span(span: &str) -> Result<(NaiveTime, NaiveTime), RateError> {
    let tokens: Vec<&str> = span.split('-').collect();
    if tokens.len() != 2 {
        return Err(RateError::ClockSpanShape);
    }

    Ok((parse_clock(tokens[0])?, parse_clock(tokens[1])?))
}

/// Parses a single 4-digit 24-hour clock token.
fn parse_clock(token: &str) -> Result<NaiveTime, RateError> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RateError::ClockSpanTime(token.to_string()));
    }

    NaiveTime::parse_from_str(token, "%H%M")
        .map_err(|_| RateError::ClockSpanTime(token.to_string()))
}
