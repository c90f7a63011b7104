use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::client::Storefront;
use crate::error::FetchError;
use crate::rows::HistogramPoint;

#[derive(Deserialize, Default)]
#[serde(default)]
struct HistogramBody {
    results: Option<Results>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Results {
    rollups: Vec<Rollup>,
}

#[derive(Deserialize)]
struct Rollup {
    date: i64,
    recommendations_up: u64,
    recommendations_down: u64,
}

/// `YYYY-MM-DD` of a UNIX timestamp seen from a fixed UTC offset.
pub fn local_date(timestamp: i64, offset_hours: i32) -> Result<String, FetchError> {
    let offset = offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| FetchError::Shape(format!("bad UTC offset {}h", offset_hours)))?;
    let utc = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| FetchError::Shape(format!("timestamp out of range: {}", timestamp)))?;
    Ok(utc.with_timezone(&offset).format("%Y-%m-%d").to_string())
}

/// Rollups of a histogram body, in response order. No `results.rollups` means no points.
pub fn parse_histogram(
    app_id: u32,
    body: &str,
    offset_hours: i32,
) -> Result<Vec<HistogramPoint>, FetchError> {
    let parsed: HistogramBody = serde_json::from_str(body)?;
    let rollups = parsed.results.map(|r| r.rollups).unwrap_or_default();

    rollups
        .into_iter()
        .map(|r| -> Result<HistogramPoint, FetchError> {
            Ok(HistogramPoint {
                id: app_id,
                date: local_date(r.date, offset_hours)?,
                recommendations_up: r.recommendations_up,
                recommendations_down: r.recommendations_down,
            })
        })
        .collect()
}

pub async fn fetch_histogram<S: Storefront>(
    store: &S,
    app_id: u32,
    offset_hours: i32,
) -> Result<Vec<HistogramPoint>, FetchError> {
    let body = store.review_histogram(app_id).await?;
    parse_histogram(app_id, &body, offset_hours)
}
