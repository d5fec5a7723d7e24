//! Weight ingestion endpoints
//!
//! Both endpoints funnel through the same pipeline: deserialize a payload
//! shape, normalize it into canonical samples, apply each as an atomic
//! upsert. Re-delivery of a payload with the same identifiers is safe.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::db::weights;
use crate::error::{Error, Result};
use crate::sample::{ImportBody, WeightBody, WeightPayload};
use crate::AppState;

/// POST /api/health/weight
///
/// Accepts one sample in the single-sample shape. Responds `{"ok":true}`.
pub async fn submit_weight(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WeightBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload.map_err(|e| Error::Validation(e.body_text()))?;

    let samples = WeightPayload::Single(body).into_samples()?;
    weights::apply(&state.db, &samples).await?;
    debug!("stored weight sample {}", samples[0].id);

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/health/import
///
/// Accepts the batch shape. Responds `{"ok":true,"upserts":N}` where N is the
/// number of samples submitted. Rows are applied one atomic upsert at a
/// time; a store failure mid-batch surfaces as a 500 and leaves earlier rows
/// applied, so the client can safely retry the whole batch.
pub async fn import_weights(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ImportBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload.map_err(|e| Error::Validation(e.body_text()))?;

    let samples = WeightPayload::Import(body).into_samples()?;
    let report = weights::apply(&state.db, &samples).await?;
    info!("imported {} weight samples", report.accepted);

    Ok(Json(json!({ "ok": true, "upserts": report.accepted })))
}
