pub(crate) mod dates;
pub(crate) mod extractors;

use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::{
  model::{MISSING_ADDRESS, NormalizedRecord, RawRecord, Source},
  normalize::extractors::{ASKING_PRICE, FINAL_PRICE, PERCENT_CHANGE},
};

const ID_KEYS: &[&str] = &["id", "booliId"];

/// Extract the canonical fields of a scraped listing.
///
/// This never fails: every field falls back to a neutral value when the
/// record does not carry anything usable for it. The only input is the
/// record itself, sibling records are never looked at.
#[instrument(level = "trace", skip_all, fields(source = source.as_str()))]
pub fn normalize(raw: &RawRecord, source: Source) -> NormalizedRecord {
  let asking_price = ASKING_PRICE.extract(raw).unwrap_or(0.0);
  let final_price = FINAL_PRICE.extract(raw).unwrap_or(0.0);
  let percent_change = PERCENT_CHANGE.extract(raw).unwrap_or_else(|| derived_percent_change(asking_price, final_price));

  let raw_id = extractors::identifier(raw, ID_KEYS);

  // Hemnet listing pages are keyed by the Hemnet id only.
  let url_id = match source {
    Source::Booli => raw_id.clone(),
    Source::Hemnet => extractors::identifier(raw, &["id"]),
  };

  NormalizedRecord {
    id: raw_id.clone().unwrap_or_else(|| format!("{source}-{}", Uuid::new_v4())),
    source,
    address: extract_address(raw).unwrap_or(MISSING_ADDRESS).to_string(),
    area: extract_area(raw).unwrap_or_default().to_string(),
    asking_price,
    final_price,
    percent_change,
    sold_date: extract_sold_date(raw),
    url: listing_url(raw, source, url_id.as_deref()),
    raw: raw.clone(),
  }
}

/// Relative change from asking to final price, in percentage points.
pub(crate) fn derived_percent_change(asking_price: f64, final_price: f64) -> f64 {
  if asking_price > 0.0 && final_price > 0.0 {
    return (final_price - asking_price) / asking_price * 100.0;
  }

  0.0
}

fn extract_address(raw: &RawRecord) -> Option<&str> {
  extractors::first_text(raw, &["streetAddress"])
    .or_else(|| extractors::nested_text(raw, &["location", "address", "streetAddress"]))
    .or_else(|| extractors::first_text(raw, &["address"]))
}

fn extract_area(raw: &RawRecord) -> Option<&str> {
  extractors::first_text(raw, &["location"])
    .or_else(|| extractors::nested_text(raw, &["location", "region", "municipalityName"]))
    .or_else(|| extractors::nested_text(raw, &["location", "area"]))
    .or_else(|| extractors::first_text(raw, &["descriptiveAreaName", "area"]))
}

// Kept as display text, numbers included, parsing happens when scoring.
fn extract_sold_date(raw: &RawRecord) -> String {
  match raw.get("soldDate") {
    Some(Value::String(date)) => date.trim().to_string(),
    Some(Value::Number(date)) if date.as_f64() != Some(0.0) => date.to_string(),
    _ => String::new(),
  }
}

fn listing_url(raw: &RawRecord, source: Source, id: Option<&str>) -> Option<String> {
  if let Some(url) = extractors::first_text(raw, &["url"]) {
    if url.starts_with("http") {
      return Some(url.to_string());
    }

    if url.starts_with('/') {
      return Some(format!("{}{url}", source.domain()));
    }
  }

  id.map(|id| source.listing_url(id))
}
