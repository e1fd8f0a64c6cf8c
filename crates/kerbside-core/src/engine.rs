//! The rate-engine facade.
//!
//! Ties validation, expansion, overlap checking and matching together over
//! an injected [`RateStore`]. The engine itself is computation-only: each
//! call is a pure function of its inputs plus the rule set the store hands
//! back, with no shared mutable state. Replace-all is a read-validate-
//! delete-insert sequence; any atomicity across those steps belongs to the
//! store, not to the engine.

use chrono::{DateTime, FixedOffset};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, StoreError};
use crate::expand::{expand, ExpandedWindow};
use crate::matcher::{match_rate, validate_range};
use crate::overlap::find_conflict;
use crate::types::{CreateRateInput, Rate};
use crate::validate::{validate_against_existing, validate_create_input};
use crate::RateError;

/// Minimal contract the engine needs from persistence.
pub trait RateStore {
    /// Returns every active rate.
    fn list_active(&self) -> Result<Vec<Rate>, StoreError>;

    /// Upserts rates by identity. Idempotent.
    fn put_rates(&self, rates: &[Rate]) -> Result<(), StoreError>;

    /// Deletes one rate by identity.
    fn delete_rate(&self, uuid: &str) -> Result<(), StoreError>;
}

/// Prices time intervals against the stored rate set.
pub struct RateEngine<S> {
    store: S,
}

impl<S: RateStore> RateEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns all active rates.
    pub fn list_rates(&self) -> Result<Vec<Rate>, EngineError> {
        Ok(self.store.list_active()?)
    }

    /// Validates and creates one rate.
    ///
    /// With `check_overlap`, the candidate is expanded and checked against
    /// every stored rate's expansion. With `persist`, the minted rate is
    /// written through to the store; otherwise it is only returned.
    pub fn create_rate(
        &self,
        input: &CreateRateInput,
        check_overlap: bool,
        persist: bool,
    ) -> Result<Rate, EngineError> {
        validate_create_input(input)?;

        if check_overlap {
            let existing = self.store.list_active()?;
            validate_against_existing(&existing, input)?;
        }

        let rate = Rate {
            uuid: Uuid::new_v4().to_string(),
            days: input.days.clone(),
            times: input.times.clone(),
            tz: input.tz.clone(),
            price: input.price,
        };

        if persist {
            self.store.put_rates(std::slice::from_ref(&rate))?;
        }

        info!(uuid = %rate.uuid, persisted = persist, "created rate");
        Ok(rate)
    }

    /// Replaces the whole rate set with a validated batch.
    ///
    /// Every input is checked against the existing store and against the
    /// batch siblings accepted before it, so the new set is conflict-free
    /// both internally and against anything a concurrent reader may still
    /// see. Only then are the old rates deleted and the new set inserted.
    pub fn replace_all_rates(
        &self,
        inputs: &[CreateRateInput],
    ) -> Result<Vec<Rate>, EngineError> {
        if inputs.is_empty() {
            return Err(EngineError::EmptyBatch);
        }

        let existing = self.store.list_active()?;

        let mut accepted: Vec<Rate> = Vec::with_capacity(inputs.len());
        let mut accepted_windows: Vec<ExpandedWindow> = Vec::new();
        for input in inputs {
            validate_create_input(input)?;
            validate_against_existing(&existing, input)?;

            let windows = expand(&input.days, &input.times, &input.tz, input.price)?;
            if let Some(conflict) = find_conflict(&accepted_windows, &windows) {
                return Err(RateError::Overlap {
                    existing: conflict.existing.to_string(),
                    candidate: conflict.candidate.to_string(),
                }
                .into());
            }
            accepted_windows.extend(windows);

            accepted.push(Rate {
                uuid: Uuid::new_v4().to_string(),
                days: input.days.clone(),
                times: input.times.clone(),
                tz: input.tz.clone(),
                price: input.price,
            });
        }

        for old in &existing {
            self.store.delete_rate(&old.uuid)?;
        }
        self.store.put_rates(&accepted)?;

        info!(
            replaced = existing.len(),
            inserted = accepted.len(),
            "replaced rate set"
        );
        Ok(accepted)
    }

    /// Prices a start/end interval against the stored rate set.
    pub fn price_for_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<i64, EngineError> {
        let range = validate_range(start, end)?;
        let rates = self.store.list_active()?;
        let matched = match_rate(&range, &rates)?;
        Ok(matched.price)
    }
}
