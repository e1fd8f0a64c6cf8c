//! Kerbside Core - the recurring rate-window engine.
//!
//! Prices a time interval against a set of recurring weekly rate rules.
//! Each rule names its weekdays, a daily clock span, an IANA timezone and a
//! price; the engine expands rules into concrete instants (DST-corrected),
//! rejects rule sets whose windows overlap, and matches an arbitrary
//! start/end instant to exactly one stored rule.
//!
//! The crate is computation-only. Persistence is injected through the
//! [`RateStore`] trait and the HTTP surface lives elsewhere.
//!
//! # Example
//!
//! ```
//! use kerbside_core::{expand, find_conflict};
//!
//! let existing = expand("mon", "0900-1200", "America/Chicago", 1500).unwrap();
//! let candidate = expand("mon", "1200-1500", "America/Chicago", 2000).unwrap();
//! // Touching endpoints do not overlap.
//! assert!(find_conflict(&existing, &candidate).is_none());
//! ```

pub mod clock;
pub mod day;
pub mod engine;
pub mod error;
pub mod expand;
pub mod matcher;
pub mod overlap;
pub mod types;
pub mod validate;

pub use clock::parse_clock_span;
pub use day::{day_to_index, index_to_day, weekday_token, DAY_TOKENS};
pub use engine::{RateEngine, RateStore};
pub use error::{EngineError, MatchError, RateError, StoreError};
pub use expand::{expand, reference_week_start, ExpandedWindow, REFERENCE_YEAR};
pub use matcher::{match_rate, validate_range, QueryRange};
pub use overlap::{find_conflict, Conflict};
pub use types::{CreateRateInput, Rate};
pub use validate::{validate_against_existing, validate_create_input};
