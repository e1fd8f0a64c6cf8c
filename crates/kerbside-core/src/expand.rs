//! Recurrence expansion.
//!
//! A rate's weekly recurrence is materialized into concrete instants by
//! anchoring it to a fixed reference week. Because weekday ordinals are
//! stable, two recurring rates can then be compared for overlap purely by
//! comparing instants within that one week. The same localization helper,
//! pointed at an arbitrary calendar day instead, serves the matcher.

use std::fmt;

use chrono::{DateTime, Days, FixedOffset, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::clock::parse_clock_span;
use crate::day::day_to_index;
use crate::error::RateError;

/// Year of the reference week. 2017-01-01 is a Sunday, so the week's first
/// day carries weekday ordinal 0 and day offsets can be added directly.
pub const REFERENCE_YEAR: i32 = 2017;

/// Local hour at which a zone's UTC offset is sampled for a calendar day.
/// 05:00 sits far from every known worldwide DST transition hour (the
/// latest is Samoa's, around 04:00), so the probe is never ambiguous or
/// non-existent.
const OFFSET_PROBE_HOUR: u32 = 5;

/// First day of the reference week.
pub fn reference_week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1).expect("2017-01-01 is a valid date")
}

/// A rate's recurrence materialized for one weekday.
///
/// The originating day list, span, zone and price are carried through so
/// conflicts can be reported in the rate's own terms. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedWindow {
    pub days: String,
    pub times: String,
    pub tz: String,
    pub price: i64,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl fmt::Display for ExpandedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (TZ: {}, Price: {})",
            self.days, self.times, self.tz, self.price
        )
    }
}

/// Returns the UTC offset `tz` uses on `date`, sampled at the neutral hour.
pub fn zone_offset_on(date: NaiveDate, tz: Tz) -> FixedOffset {
    let probe = date
        .and_hms_opt(OFFSET_PROBE_HOUR, 0, 0)
        .expect("05:00 exists on every calendar day");

    match tz.from_local_datetime(&probe) {
        LocalResult::Single(dt) => dt.offset().fix(),
        LocalResult::Ambiguous(earliest, _) => earliest.offset().fix(),
        LocalResult::None => tz.from_utc_datetime(&probe).offset().fix(),
    }
}

/// Places a wall-clock time on `date` into `tz`, using the offset the zone
/// holds on that specific day so DST state is reflected correctly.
pub fn localize(date: NaiveDate, clock: NaiveTime, tz: Tz) -> DateTime<Tz> {
    let offset = zone_offset_on(date, tz);
    let as_utc = date.and_time(clock) - offset;
    tz.from_utc_datetime(&as_utc)
}

/// Expands a rate definition into one window per listed weekday, anchored
/// to the reference week and DST-corrected per day.
pub fn expand(
    days: &str,
    times: &str,
    tz_name: &str,
    price: i64,
) -> Result<Vec<ExpandedWindow>, RateError> {
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| RateError::InvalidTimezone(tz_name.to_string()))?;
    let (earlier, later) = parse_clock_span(times)?;
    let sunday = reference_week_start();

    let mut windows = Vec::new();
    for day in days.split(',') {
        let index = day_to_index(day)?;
        let date = sunday + Days::new(u64::from(index));
        windows.push(ExpandedWindow {
            days: days.to_string(),
            times: times.to_string(),
            tz: tz_name.to_string(),
            price,
            start: localize(date, earlier, tz),
            end: localize(date, later, tz),
        });
    }

    Ok(windows)
}
