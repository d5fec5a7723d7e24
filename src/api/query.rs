//! Recent-weights read endpoint
//!
//! Projects stored kilograms into a dual-unit response shape; pounds are
//! derived at response time and never stored. This path fails open: a store
//! error is logged and answered with an empty list instead of a 500.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use tracing::warn;

use crate::db::weights;
use crate::units;
use crate::AppState;

/// Default number of rows returned when `limit` is absent or non-numeric
pub const DEFAULT_LIMIT: i64 = 30;

/// Largest accepted `limit`
pub const MAX_LIMIT: i64 = 500;

/// Query parameters for the list endpoint
///
/// `limit` is taken as a raw string so a non-numeric value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

/// One response row: stored start date, stored kg, derived lb
#[derive(Debug, Serialize)]
pub struct WeightEntry {
    pub date: String,
    pub kg: f64,
    pub lb: f64,
}

/// Resolve the effective row limit: default 30, clamped to [1, 500].
///
/// Non-numeric values fall back to the default; numeric values that do not
/// fit in an i64 saturate and then clamp like any other number.
pub fn effective_limit(raw: Option<&str>) -> i64 {
    let value = match raw.map(str::trim) {
        None => DEFAULT_LIMIT,
        Some(s) => match s.parse::<i64>() {
            Ok(n) => n,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => DEFAULT_LIMIT,
            },
        },
    };
    value.clamp(1, MAX_LIMIT)
}

/// GET /api/health/weight?limit=N
pub async fn list_weights(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<WeightEntry>> {
    let limit = effective_limit(params.limit.as_deref());

    let rows = match weights::list_recent(&state.db, limit).await {
        Ok(rows) => rows,
        Err(e) => {
            // fail open: log and answer with an empty series
            warn!("weight list query failed: {}", e);
            Vec::new()
        }
    };

    let entries = rows
        .into_iter()
        .map(|row| WeightEntry {
            kg: row.kg,
            lb: units::kg_to_lb(row.kg),
            date: row.start_date,
        })
        .collect();

    Json(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_when_absent() {
        assert_eq!(effective_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_defaults_when_non_numeric() {
        assert_eq!(effective_limit(Some("abc")), DEFAULT_LIMIT);
        assert_eq!(effective_limit(Some("")), DEFAULT_LIMIT);
        assert_eq!(effective_limit(Some("12.5")), DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_clamps_low() {
        assert_eq!(effective_limit(Some("0")), 1);
        assert_eq!(effective_limit(Some("-5")), 1);
    }

    #[test]
    fn test_limit_clamps_high() {
        assert_eq!(effective_limit(Some("9999")), MAX_LIMIT);
        assert_eq!(effective_limit(Some("500")), MAX_LIMIT);
    }

    #[test]
    fn test_limit_overflowing_digits_saturate_and_clamp() {
        assert_eq!(effective_limit(Some("99999999999999999999")), MAX_LIMIT);
        assert_eq!(effective_limit(Some("-99999999999999999999")), 1);
    }

    #[test]
    fn test_limit_passes_in_range_values() {
        assert_eq!(effective_limit(Some("1")), 1);
        assert_eq!(effective_limit(Some(" 42 ")), 42);
        assert_eq!(effective_limit(Some("499")), 499);
    }
}
