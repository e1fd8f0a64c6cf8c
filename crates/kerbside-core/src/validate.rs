//! Rate-input validation.

use chrono_tz::Tz;

use crate::clock::parse_clock_span;
use crate::day::day_to_index;
use crate::error::RateError;
use crate::expand::{expand, ExpandedWindow};
use crate::overlap::find_conflict;
use crate::types::{CreateRateInput, Rate};

/// Validates a creation input: price, timezone, day list, clock span, in
/// that order. Overlap against other rates is a separate, optional step
/// (see [`validate_against_existing`]).
pub fn validate_create_input(input: &CreateRateInput) -> Result<(), RateError> {
    validate_price(input.price)?;
    validate_timezone(&input.tz)?;
    validate_days(&input.days)?;
    validate_timespan(&input.times)?;
    Ok(())
}

fn validate_price(price: i64) -> Result<(), RateError> {
    if price <= 0 {
        return Err(RateError::InvalidPrice(price));
    }
    Ok(())
}

fn validate_timezone(tz: &str) -> Result<(), RateError> {
    if tz.is_empty() || tz.parse::<Tz>().is_err() {
        return Err(RateError::InvalidTimezone(tz.to_string()));
    }
    Ok(())
}

/// Every token must be a known day and no token may repeat. Duplicates are
/// found by sorting and scanning adjacent pairs.
fn validate_days(days: &str) -> Result<(), RateError> {
    if days.is_empty() {
        return Err(RateError::EmptyDays);
    }

    let mut tokens: Vec<&str> = days.split(',').collect();
    for token in &tokens {
        day_to_index(token)?;
    }

    tokens.sort_unstable();
    for pair in tokens.windows(2) {
        if pair[0] == pair[1] {
            return Err(RateError::DuplicateDay(pair[0].to_string()));
        }
    }

    Ok(())
}

fn validate_timespan(times: &str) -> Result<(), RateError> {
    let (earlier, later) = parse_clock_span(times)?;
    if earlier >= later {
        return Err(RateError::MisorderedSpan);
    }
    Ok(())
}

/// Expands the candidate and every existing rate and rejects the candidate
/// if any pair of windows overlaps, naming both windows in the error.
pub fn validate_against_existing(
    existing: &[Rate],
    input: &CreateRateInput,
) -> Result<(), RateError> {
    if existing.is_empty() {
        return Ok(());
    }

    let candidate = expand(&input.days, &input.times, &input.tz, input.price)?;

    let mut existing_windows: Vec<ExpandedWindow> = Vec::new();
    for rate in existing {
        existing_windows.extend(expand(&rate.days, &rate.times, &rate.tz, rate.price)?);
    }

    if let Some(conflict) = find_conflict(&existing_windows, &candidate) {
        return Err(RateError::Overlap {
            existing: conflict.existing.to_string(),
            candidate: conflict.candidate.to_string(),
        });
    }

    Ok(())
}
