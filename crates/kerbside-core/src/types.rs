//! Rate entities and creation inputs.

use serde::{Deserialize, Serialize};

/// A recurring weekly price window.
///
/// `days` is a comma-separated list of weekday tokens (`"mon,tues"`),
/// `times` a daily clock span (`"0900-1200"`), `tz` an IANA zone name and
/// `price` a positive integer in an unspecified minor unit. Rates are
/// replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub days: String,
    pub times: String,
    pub tz: String,
    pub price: i64,
}

/// Input for creating a single rate. Identity is minted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRateInput {
    pub days: String,
    pub times: String,
    pub tz: String,
    pub price: i64,
}
