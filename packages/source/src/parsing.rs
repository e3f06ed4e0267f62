//! Parsing of county entries in statistics responses.
//!
//! The service reports percentages as numeric strings (`"12.34"`). Numbers
//! are accepted too. Anything that is not a finite, non-negative real number
//! rejects the whole entry so the caller can skip that county.

use drought_map_drought_models::{CountyRecord, SeverityPercentages};

use crate::SkippedRecord;

/// Field holding the county name in each entry.
pub const COUNTY_FIELD: &str = "County";

/// Parses a single percentage value.
#[must_use]
pub fn parse_percentage(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Projects one response entry into a [`CountyRecord`].
///
/// # Errors
///
/// Returns a [`SkippedRecord`] describing why the entry was rejected.
pub fn parse_county(entry: &serde_json::Value) -> Result<CountyRecord, SkippedRecord> {
    let county = entry
        .get(COUNTY_FIELD)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let Some(name) = county else {
        return Err(SkippedRecord {
            county: None,
            reason: format!("missing {COUNTY_FIELD} field"),
        });
    };

    let field = |key: &str| -> Result<f64, SkippedRecord> {
        let raw = entry.get(key).ok_or_else(|| SkippedRecord {
            county: Some(name.clone()),
            reason: format!("missing {key}"),
        })?;
        parse_percentage(raw).ok_or_else(|| SkippedRecord {
            county: Some(name.clone()),
            reason: format!("invalid {key} value {raw}"),
        })
    };

    let percentages = SeverityPercentages {
        d0: field("D0")?,
        d1: field("D1")?,
        d2: field("D2")?,
        d3: field("D3")?,
        d4: field("D4")?,
    };

    Ok(CountyRecord { name, percentages })
}
