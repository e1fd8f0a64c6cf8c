//! Engine error types.

use thiserror::Error;

/// Errors from parsing and validating rate definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    /// A day token is not one of the seven known weekday symbols.
    #[error("invalid day: {0}")]
    InvalidDay(String),

    /// A weekday index is outside 0..=6.
    #[error("invalid day index: {0}")]
    InvalidDayIndex(u32),

    /// A clock span did not split into exactly two tokens.
    #[error("times should range between only two hours of the day")]
    ClockSpanShape,

    /// A clock-span token is not a valid 4-digit 24-hour time.
    #[error("could not parse time {0:?} in span")]
    ClockSpanTime(String),

    /// The day list was empty.
    #[error("specify a set of comma separated days")]
    EmptyDays,

    /// The same day appears more than once in the day list.
    #[error("{0} is repeated in days")]
    DuplicateDay(String),

    /// Price must be a positive nonzero integer.
    #[error("price must be greater than zero (got {0})")]
    InvalidPrice(i64),

    /// The timezone identifier is not a known IANA zone.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The first time in a span must be strictly earlier than the second.
    #[error("the first time in times must be earlier than the second")]
    MisorderedSpan,

    /// The candidate rate's expanded windows collide with an existing rate.
    /// Both windows are carried for diagnostics.
    #[error("a rate already exists for {existing} which overlaps the given {candidate}")]
    Overlap { existing: String, candidate: String },
}

/// Errors from validating a query range or matching it to a rate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    /// Query start and end fall in different calendar years.
    #[error("start and end cannot be in different years")]
    YearMismatch,

    /// Query start and end fall on different calendar days.
    #[error("start and end cannot be on different days")]
    DayMismatch,

    /// Query start equals query end.
    #[error("start and end cannot be equal")]
    EmptyRange,

    /// Query start is after query end.
    #[error("start cannot be after end")]
    StartAfterEnd,

    /// Query start and end carry different UTC offsets.
    #[error("start and end cannot be in different timezones")]
    OffsetMismatch,

    /// No stored rate covers the query range. Callers surface this as
    /// "price unavailable", not as a hard failure.
    #[error("price unavailable")]
    Unavailable,

    /// More than one stored rate covers the query range. Always a hard
    /// failure: it means overlapping rates made it into the store.
    #[error("{count} rates cover the given range; stored rates overlap")]
    Ambiguous { count: usize },
}

/// Opaque failure from the persistence collaborator, propagated unchanged.
#[derive(Debug, Error)]
#[error("store error: {0}")]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rate definition rejected.
    #[error(transparent)]
    Rate(#[from] RateError),

    /// Query range rejected or unmatched.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Replace-all was called with an empty batch.
    #[error("specify at least 1 rate to create")]
    EmptyBatch,
}
