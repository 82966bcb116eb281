use crate::{
  model::RawRecord,
  normalize::extractors::{self, ASKING_PRICE, FINAL_PRICE},
};

// Hemnet listing identifiers are long numeric strings, scraped placeholders
// are not.
const MIN_LISTING_ID_DIGITS: usize = 10;

/// Whether a scraped listing carries enough data to be worth reconciling.
///
/// A complete listing has a street address, a positive asking or final price
/// and a numeric listing identifier of at least ten digits.
pub fn is_complete_listing(raw: &RawRecord) -> bool {
  let has_address = extractors::first_text(raw, &["streetAddress"]).is_some();
  let has_price = [ASKING_PRICE, FINAL_PRICE].iter().any(|candidates| candidates.extract(raw).is_some_and(|price| price > 0.0));
  let has_listing_id = extractors::first_text(raw, &["id"]).is_some_and(|id| id.len() >= MIN_LISTING_ID_DIGITS && id.chars().all(|c| c.is_ascii_digit()));

  if !(has_address && has_price && has_listing_id) {
    tracing::trace!(has_address, has_price, has_listing_id, "incomplete listing");

    return false;
  }

  true
}

/// Keep only the complete listings, returning them along with the number of
/// dropped ones.
pub fn complete_listings(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
  let before = records.len();
  let kept = records.into_iter().filter(is_complete_listing).collect::<Vec<_>>();
  let dropped = before - kept.len();

  (kept, dropped)
}
