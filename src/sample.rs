//! Client payload shapes and their normalization into canonical samples
//!
//! The ingestion API has accumulated two body shapes: a single-sample form
//! (with or without explicit start/end dates) and a batch export form. Both
//! resolve through [`WeightPayload::into_samples`] into the one canonical
//! [`Sample`] record the rest of the pipeline works with.

use chrono::DateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::units::WeightUnit;

/// Source recorded for samples submitted without an originating system
pub const MANUAL_ENTRY: &str = "manual-entry";

/// Canonical, validated weight measurement ready for storage
///
/// `id` is the idempotency key. Timestamps are kept as the submitted RFC 3339
/// strings (trimmed, parse-checked, stored verbatim). `mass_kg` is already
/// converted and rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub mass_kg: f64,
    pub source_id: String,
}

/// Single-sample request body
///
/// All fields are optional at the serde layer so that missing required fields
/// surface as our own field-naming validation errors rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBody {
    pub uuid: Option<String>,
    pub weight: Option<f64>,
    pub unit: Option<String>,
    pub timestamp: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub source_bundle_id: Option<String>,
}

/// Batch-import request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
    pub body_mass: Option<Vec<BodyMassEntry>>,
}

/// One element of a batch import
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMassEntry {
    pub uuid: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub unit: Option<String>,
    pub value: Option<f64>,
    pub source_bundle_id: Option<String>,
}

/// The recognized ingestion payload shapes
///
/// Each POST endpoint wraps its body in the matching variant; normalization
/// lives in one place regardless of which shape arrived.
#[derive(Debug, Clone)]
pub enum WeightPayload {
    Single(WeightBody),
    Import(ImportBody),
}

impl WeightPayload {
    /// Normalize the payload into canonical samples.
    ///
    /// Validation failures name the offending field (`"weight"`,
    /// `"bodyMass[2].uuid"`, ...). An empty batch yields an empty vector.
    pub fn into_samples(self) -> Result<Vec<Sample>> {
        match self {
            WeightPayload::Single(body) => Ok(vec![normalize_single(body)?]),
            WeightPayload::Import(body) => {
                let entries = body.body_mass.ok_or_else(|| Error::field("bodyMass"))?;
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| normalize_entry(entry, index))
                    .collect()
            }
        }
    }
}

fn normalize_single(body: WeightBody) -> Result<Sample> {
    let magnitude = positive_finite(body.weight, "weight")?;
    let unit = parse_unit(body.unit.as_deref(), "unit")?;
    let mass_kg = stored_mass(unit, magnitude, "weight")?;

    // `timestamp` is required even when explicit dates are present; explicit
    // startDate/endDate override it independently.
    let timestamp = rfc3339(
        non_empty(body.timestamp.as_deref()).ok_or_else(|| Error::field("timestamp"))?,
        "timestamp",
    )?;
    let start_time = match non_empty(body.start_date.as_deref()) {
        Some(s) => rfc3339(s, "startDate")?,
        None => timestamp.clone(),
    };
    let end_time = match non_empty(body.end_date.as_deref()) {
        Some(s) => rfc3339(s, "endDate")?,
        None => timestamp,
    };

    let id = match non_empty(body.uuid.as_deref()) {
        Some(u) => u.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    Ok(Sample {
        id,
        start_time,
        end_time,
        mass_kg,
        source_id: source_or_default(body.source_bundle_id.as_deref()),
    })
}

fn normalize_entry(entry: BodyMassEntry, index: usize) -> Result<Sample> {
    let field = |name: &str| format!("bodyMass[{index}].{name}");

    // Batch identifiers come from a client export where they are real UUIDs;
    // parse strictly and store the hyphenated lowercase form so case variants
    // of the same identifier hit the same row.
    let raw_id =
        non_empty(entry.uuid.as_deref()).ok_or_else(|| Error::field(field("uuid")))?;
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| Error::field(field("uuid")))?
        .to_string();

    let magnitude = positive_finite(entry.value, &field("value"))?;
    let unit = parse_unit(entry.unit.as_deref(), &field("unit"))?;
    let mass_kg = stored_mass(unit, magnitude, &field("value"))?;

    let start_time = rfc3339(
        non_empty(entry.start_date.as_deref())
            .ok_or_else(|| Error::field(field("startDate")))?,
        &field("startDate"),
    )?;
    let end_time = rfc3339(
        non_empty(entry.end_date.as_deref())
            .ok_or_else(|| Error::field(field("endDate")))?,
        &field("endDate"),
    )?;

    Ok(Sample {
        id,
        start_time,
        end_time,
        mass_kg,
        source_id: source_or_default(entry.source_bundle_id.as_deref()),
    })
}

/// Trim and drop empty strings; absent and blank are treated alike
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn source_or_default(value: Option<&str>) -> String {
    non_empty(value)
        .map(str::to_string)
        .unwrap_or_else(|| MANUAL_ENTRY.to_string())
}

fn positive_finite(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(Error::field(field)),
    }
}

/// Convert a submitted magnitude to stored kilograms.
///
/// The converted value is checked again: rounding can collapse a tiny
/// magnitude to 0.00, and a huge one can overflow past f64::MAX.
fn stored_mass(unit: WeightUnit, magnitude: f64, field: &str) -> Result<f64> {
    let kg = unit.to_kg(magnitude);
    if kg.is_finite() && kg > 0.0 {
        Ok(kg)
    } else {
        Err(Error::field(field))
    }
}

fn parse_unit(value: Option<&str>, field: &str) -> Result<WeightUnit> {
    non_empty(value)
        .and_then(WeightUnit::parse)
        .ok_or_else(|| Error::field(field))
}

/// Check the value parses as RFC 3339 (offset or Z) and keep it verbatim
fn rfc3339(value: &str, field: &str) -> Result<String> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| value.to_string())
        .map_err(|_| Error::field(field))
}
