//! Query-range validation and rate matching.

use chrono::{DateTime, Datelike, FixedOffset};
use chrono_tz::Tz;
use tracing::{debug, error, warn};

use crate::clock::parse_clock_span;
use crate::day::weekday_token;
use crate::error::MatchError;
use crate::expand::{localize, zone_offset_on};
use crate::types::Rate;

/// A validated price query: two instants with explicit UTC offsets on the
/// same calendar day, end strictly after start, identical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Validates a raw start/end pair into a [`QueryRange`].
///
/// A range may not span calendar days or years, be empty or reversed, or
/// cross a DST/zone boundary (the offsets must agree).
pub fn validate_range(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Result<QueryRange, MatchError> {
    if start.year() != end.year() {
        return Err(MatchError::YearMismatch);
    }
    if start.ordinal() != end.ordinal() {
        return Err(MatchError::DayMismatch);
    }
    if start == end {
        return Err(MatchError::EmptyRange);
    }
    if start > end {
        return Err(MatchError::StartAfterEnd);
    }
    if start.offset() != end.offset() {
        return Err(MatchError::OffsetMismatch);
    }

    Ok(QueryRange { start, end })
}

/// Finds the single stored rate whose recurring window covers the query.
///
/// Candidate rates must list the query's weekday and hold the query's UTC
/// offset on that calendar day. A surviving rate matches when the query is
/// fully nested in its half-open window:
/// `rate_start <= start < rate_end` and `rate_start < end <= rate_end`.
/// Zero matches is [`MatchError::Unavailable`]; more than one is
/// [`MatchError::Ambiguous`], never resolved by picking a winner.
pub fn match_rate<'a>(range: &QueryRange, rates: &'a [Rate]) -> Result<&'a Rate, MatchError> {
    let token = weekday_token(range.start.weekday());
    let date = range.start.date_naive();
    let query_offset = *range.start.offset();

    let mut matches: Vec<&Rate> = Vec::new();
    for rate in rates {
        if !rate.days.split(',').any(|day| day == token) {
            debug!(uuid = %rate.uuid, day = token, "query day not in rate's days");
            continue;
        }

        let tz: Tz = match rate.tz.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(uuid = %rate.uuid, tz = %rate.tz, "stored rate has an unparseable timezone");
                continue;
            }
        };

        let rate_offset = zone_offset_on(date, tz);
        if rate_offset != query_offset {
            debug!(
                uuid = %rate.uuid,
                query_offset = query_offset.local_minus_utc(),
                rate_offset = rate_offset.local_minus_utc(),
                "query offset not equal to rate offset"
            );
            continue;
        }

        let (earlier, later) = match parse_clock_span(&rate.times) {
            Ok(span) => span,
            Err(err) => {
                warn!(uuid = %rate.uuid, %err, "stored rate has an unparseable span");
                continue;
            }
        };

        // Anchor the rate's span onto the query's actual calendar day.
        let rate_start = localize(date, earlier, tz);
        let rate_end = localize(date, later, tz);

        // rate_start <= start < rate_end
        if range.start >= rate_start && range.start < rate_end {
            // rate_start < end <= rate_end
            if range.end > rate_start && range.end <= rate_end {
                matches.push(rate);
            } else {
                debug!(
                    uuid = %rate.uuid,
                    end = %range.end,
                    window = %format!("{rate_start} - {rate_end}"),
                    "query end falls outside rate window"
                );
            }
        } else {
            debug!(
                uuid = %rate.uuid,
                start = %range.start,
                window = %format!("{rate_start} - {rate_end}"),
                "query start falls outside rate window"
            );
        }
    }

    match matches.len() {
        0 => Err(MatchError::Unavailable),
        1 => Ok(matches[0]),
        count => {
            error!(
                count,
                uuids = ?matches.iter().map(|r| r.uuid.as_str()).collect::<Vec<_>>(),
                "multiple rates matched one query; the store holds overlapping rates"
            );
            Err(MatchError::Ambiguous { count })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn range(start: &str, end: &str) -> QueryRange {
        validate_range(instant(start), instant(end)).unwrap()
    }

    fn rate(uuid: &str, days: &str, times: &str, tz: &str, price: i64) -> Rate {
        Rate {
            uuid: uuid.to_string(),
            days: days.to_string(),
            times: times.to_string(),
            tz: tz.to_string(),
            price,
        }
    }

    // === validate_range ===

    #[test]
    fn accepts_same_day_ordered_range() {
        let r = range("2017-01-02T09:00:00-06:00", "2017-01-02T12:00:00-06:00");
        assert!(r.start < r.end);
    }

    #[test]
    fn rejects_different_years() {
        assert_eq!(
            validate_range(
                instant("2016-12-31T23:00:00-06:00"),
                instant("2017-01-01T01:00:00-06:00"),
            ),
            Err(MatchError::YearMismatch)
        );
    }

    #[test]
    fn rejects_different_days() {
        assert_eq!(
            validate_range(
                instant("2017-01-02T23:00:00-06:00"),
                instant("2017-01-03T01:00:00-06:00"),
            ),
            Err(MatchError::DayMismatch)
        );
    }

    #[test]
    fn rejects_empty_and_reversed_ranges() {
        assert_eq!(
            validate_range(
                instant("2017-01-02T09:00:00-06:00"),
                instant("2017-01-02T09:00:00-06:00"),
            ),
            Err(MatchError::EmptyRange)
        );
        assert_eq!(
            validate_range(
                instant("2017-01-02T12:00:00-06:00"),
                instant("2017-01-02T09:00:00-06:00"),
            ),
            Err(MatchError::StartAfterEnd)
        );
    }

    #[test]
    fn rejects_mixed_offsets() {
        assert_eq!(
            validate_range(
                instant("2017-01-02T09:00:00-06:00"),
                instant("2017-01-02T12:00:00-05:00"),
            ),
            Err(MatchError::OffsetMismatch)
        );
    }

    // === match_rate ===

    #[test]
    fn matches_fully_nested_query() {
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-01-02T09:00:00-06:00", "2017-01-02T12:00:00-06:00");
        assert_eq!(match_rate(&r, &rates).unwrap().uuid, "a");
    }

    #[test]
    fn matches_strict_interior_query() {
        let rates = vec![rate("a", "mon,tues,thurs", "0900-2100", "America/Chicago", 1500)];
        let r = range("2017-01-02T10:00:00-06:00", "2017-01-02T20:00:00-06:00");
        assert_eq!(match_rate(&r, &rates).unwrap().price, 1500);
    }

    #[test]
    fn query_before_window_is_unavailable() {
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-01-02T07:00:00-06:00", "2017-01-02T07:30:00-06:00");
        assert_eq!(match_rate(&r, &rates), Err(MatchError::Unavailable));
    }

    #[test]
    fn query_spilling_past_window_end_is_unavailable() {
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-01-02T11:00:00-06:00", "2017-01-02T13:00:00-06:00");
        assert_eq!(match_rate(&r, &rates), Err(MatchError::Unavailable));
    }

    #[test]
    fn wrong_weekday_is_unavailable() {
        // 2017-01-03 is a Tuesday.
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-01-03T09:30:00-06:00", "2017-01-03T10:00:00-06:00");
        assert_eq!(match_rate(&r, &rates), Err(MatchError::Unavailable));
    }

    #[test]
    fn offset_mismatch_skips_rate() {
        // Query carries UTC-5 but Chicago holds UTC-6 on this January day.
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-01-02T09:30:00-05:00", "2017-01-02T10:00:00-05:00");
        assert_eq!(match_rate(&r, &rates), Err(MatchError::Unavailable));
    }

    #[test]
    fn matches_daylight_time_offset_in_summer() {
        // 2017-07-03 is a Monday; Chicago holds UTC-5 (CDT).
        let rates = vec![rate("a", "mon", "0900-1200", "America/Chicago", 1500)];
        let r = range("2017-07-03T09:30:00-05:00", "2017-07-03T10:00:00-05:00");
        assert_eq!(match_rate(&r, &rates).unwrap().uuid, "a");
    }

    #[test]
    fn two_covering_rates_are_ambiguous() {
        let rates = vec![
            rate("a", "mon", "0900-1200", "America/Chicago", 1500),
            rate("b", "mon", "0800-1100", "America/Chicago", 2000),
        ];
        let r = range("2017-01-02T10:00:00-06:00", "2017-01-02T10:30:00-06:00");
        assert_eq!(match_rate(&r, &rates), Err(MatchError::Ambiguous { count: 2 }));
    }

    #[test]
    fn empty_store_is_unavailable() {
        let r = range("2017-01-02T10:00:00-06:00", "2017-01-02T10:30:00-06:00");
        assert_eq!(match_rate(&r, &[]), Err(MatchError::Unavailable));
    }

    #[test]
    fn corrupt_stored_rate_is_skipped_not_fatal() {
        let rates = vec![
            rate("bad-tz", "mon", "0900-1200", "Mars/Olympus", 1),
            rate("bad-span", "mon", "nine-noon", "America/Chicago", 1),
            rate("good", "mon", "0900-1200", "America/Chicago", 1500),
        ];
        let r = range("2017-01-02T09:00:00-06:00", "2017-01-02T12:00:00-06:00");
        assert_eq!(match_rate(&r, &rates).unwrap().uuid, "good");
    }
}
