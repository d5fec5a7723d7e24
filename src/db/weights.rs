//! Weight row storage: atomic upserts and the recent-first read
//!
//! Each write is a single `INSERT ... ON CONFLICT(uuid) DO UPDATE` statement,
//! so concurrent writers to the same identifier serialize inside SQLite and
//! the row always reflects exactly one submission in full. `createdAt` is set
//! once at first insert; `updatedAt` refreshes on every write.

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::sample::Sample;

/// Outcome of applying a batch of samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of samples applied (equals the submitted count on success)
    pub accepted: usize,
}

/// One persisted weight row
#[derive(Debug, Clone, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct WeightRow {
    pub uuid: String,
    pub start_date: String,
    pub end_date: String,
    pub kg: f64,
    pub source_bundle_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Server write timestamp, microsecond precision so successive writes to the
/// same row observably advance `updatedAt`
fn write_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Insert or update one sample, keyed by its identifier
pub async fn upsert(pool: &SqlitePool, sample: &Sample) -> Result<()> {
    let now = write_timestamp();
    sqlx::query(
        r#"
        INSERT INTO weight (uuid, startDate, endDate, kg, sourceBundleId, createdAt, updatedAt)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(uuid) DO UPDATE SET
            startDate = excluded.startDate,
            endDate = excluded.endDate,
            kg = excluded.kg,
            sourceBundleId = excluded.sourceBundleId,
            updatedAt = excluded.updatedAt
        "#,
    )
    .bind(&sample.id)
    .bind(&sample.start_time)
    .bind(&sample.end_time)
    .bind(sample.mass_kg)
    .bind(&sample.source_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a batch of samples, one atomic upsert per row.
///
/// An empty batch is a no-op. Rows are applied in order and a store failure
/// stops the batch; rows already applied stay applied (each upsert is
/// idempotent, so retrying the whole batch is safe).
pub async fn apply(pool: &SqlitePool, samples: &[Sample]) -> Result<IngestReport> {
    if samples.is_empty() {
        return Ok(IngestReport { accepted: 0 });
    }

    for sample in samples {
        upsert(pool, sample).await?;
    }

    Ok(IngestReport {
        accepted: samples.len(),
    })
}

/// Fetch the most recent rows, newest start date first
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<WeightRow>> {
    let rows = sqlx::query_as::<_, WeightRow>(
        r#"
        SELECT uuid, startDate, endDate, kg, sourceBundleId, createdAt, updatedAt
        FROM weight
        ORDER BY startDate DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one row by identifier
pub async fn fetch_by_id(pool: &SqlitePool, id: &str) -> Result<Option<WeightRow>> {
    let row = sqlx::query_as::<_, WeightRow>(
        r#"
        SELECT uuid, startDate, endDate, kg, sourceBundleId, createdAt, updatedAt
        FROM weight
        WHERE uuid = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
