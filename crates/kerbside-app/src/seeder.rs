//! Seeds the database with a starter rate set.
//!
//! Replaces whatever is stored with a known-good, non-overlapping set of
//! rates, all in the America/Chicago zone. Intended for first-run setup
//! and local development.

use anyhow::Context;
use tracing::info;

use kerbside_core::{CreateRateInput, RateEngine};
use kerbside_storage::Database;

fn seed_rates() -> Vec<CreateRateInput> {
    let rate = |days: &str, times: &str, price: i64| CreateRateInput {
        days: days.to_string(),
        times: times.to_string(),
        tz: "America/Chicago".to_string(),
        price,
    };

    vec![
        rate("mon,tues,thurs", "0900-2100", 1500),
        rate("fri,sat,sun", "0900-2100", 2000),
        rate("wed", "0600-1800", 1750),
        rate("mon,wed,sat", "0100-0500", 1000),
        rate("sun,tues", "0100-0700", 925),
    ]
}

/// Replaces the stored rate set with the seed data.
pub fn run(db: Database) -> anyhow::Result<()> {
    let engine = RateEngine::new(db);
    let inputs = seed_rates();

    let rates = engine
        .replace_all_rates(&inputs)
        .context("failed to seed rates")?;

    for rate in &rates {
        info!(uuid = %rate.uuid, days = %rate.days, times = %rate.times, price = rate.price, "seeded rate");
    }
    info!(count = rates.len(), "seed complete");

    Ok(())
}
