//! Rates repository.

use rusqlite::{params, Connection};

use kerbside_core::Rate;

use crate::error::{Result, StorageError};

/// Repository for rate operations.
pub struct RatesRepo;

impl RatesRepo {
    /// Upsert a rate by identity.
    pub fn upsert(conn: &Connection, rate: &Rate) -> Result<()> {
        conn.execute(
            "INSERT INTO rates (uuid, days, times, tz, price, active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)
             ON CONFLICT(uuid) DO UPDATE SET
                 days = excluded.days,
                 times = excluded.times,
                 tz = excluded.tz,
                 price = excluded.price,
                 active = 1",
            params![rate.uuid, rate.days, rate.times, rate.tz, rate.price],
        )?;

        Ok(())
    }

    /// Get all active rates.
    pub fn get_active(conn: &Connection) -> Result<Vec<Rate>> {
        let mut stmt = conn.prepare(
            "SELECT uuid, days, times, tz, price
             FROM rates WHERE active = 1 ORDER BY created_at ASC",
        )?;

        let rates = stmt
            .query_map([], |row| {
                Ok(Rate {
                    uuid: row.get(0)?,
                    days: row.get(1)?,
                    times: row.get(2)?,
                    tz: row.get(3)?,
                    price: row.get(4)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rates)
    }

    /// Delete a rate by identity.
    pub fn delete(conn: &Connection, uuid: &str) -> Result<()> {
        let deleted = conn.execute("DELETE FROM rates WHERE uuid = ?1", [uuid])?;

        if deleted == 0 {
            return Err(StorageError::NotFound(format!("Rate with uuid {}", uuid)));
        }

        Ok(())
    }

    /// Count total rates.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM rates", [], |row| row.get(0))?;
        Ok(count)
    }
}
