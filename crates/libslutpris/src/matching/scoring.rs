use serde::Serialize;

use crate::{
  matching::{
    Component, MergeParams,
    components::{AskingPriceDistance, FinalPriceDistance, PercentChangeDistance, SoldDateDistance},
  },
  model::NormalizedRecord,
};

// Missing measurements are assumed to be a small mismatch rather than an
// agreement. They are substituted before weighting.
const MISSING_ASKING_PRICE_PENALTY: f64 = 1.0;
const MISSING_PERCENT_CHANGE_PENALTY: f64 = 0.5;

const DATE_WEIGHT: f64 = 2.0;
const FINAL_PRICE_WEIGHT: f64 = 1.0;
const ASKING_PRICE_WEIGHT: f64 = 1.0 / 3.0;
const PERCENT_CHANGE_WEIGHT: f64 = 1.0 / 4.0;

/// Breakdown of a candidate pair that passed the hard tolerances.
///
/// `score` is the weighted composite, lower is better. Optional components
/// are `None` when either listing lacked the data to compute them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
  pub score: f64,
  pub date_diff_days: f64,
  pub final_price_diff_pct: f64,
  pub asking_price_diff_pct: Option<f64>,
  pub percent_change_diff_pct: Option<f64>,
}

/// Relative difference between two amounts, in percent of their mean.
///
/// Falls back to the larger magnitude when the mean is zero, and is infinite
/// when both amounts are zero or either is not finite.
pub fn percent_difference(lhs: f64, rhs: f64) -> f64 {
  if !lhs.is_finite() || !rhs.is_finite() || (lhs == 0.0 && rhs == 0.0) {
    return f64::INFINITY;
  }

  let difference = (lhs - rhs).abs();
  let mean = (lhs + rhs).abs() / 2.0;

  if mean == 0.0 {
    return difference / lhs.abs().max(rhs.abs()) * 100.0;
  }

  difference / mean * 100.0
}

/// Score a Booli listing (`lhs`) against a Hemnet candidate (`rhs`).
///
/// Returns `None` when the pair cannot describe the same sale: either sold
/// date is unparseable, the dates are too far apart, or the final prices
/// differ by more than the tolerance.
pub fn score(lhs: &NormalizedRecord, rhs: &NormalizedRecord, params: &MergeParams) -> Option<MatchScore> {
  let Some(date_diff_days) = SoldDateDistance.measure(lhs, rhs) else {
    tracing::trace!(lhs = %lhs.id, rhs = %rhs.id, component = SoldDateDistance.name(), "rejected candidate, unparseable sold date");
    return None;
  };

  if date_diff_days > params.max_date_diff_days {
    tracing::trace!(lhs = %lhs.id, rhs = %rhs.id, component = SoldDateDistance.name(), diff = date_diff_days, "rejected candidate, sold dates too far apart");
    return None;
  }

  let final_price_diff_pct = match FinalPriceDistance.measure(lhs, rhs) {
    Some(diff) if diff <= params.max_final_price_diff_pct => diff,
    diff => {
      tracing::trace!(lhs = %lhs.id, rhs = %rhs.id, component = FinalPriceDistance.name(), ?diff, "rejected candidate, final prices too far apart");
      return None;
    }
  };

  let asking_price_diff_pct = AskingPriceDistance.measure(lhs, rhs);
  let percent_change_diff_pct = PercentChangeDistance.measure(lhs, rhs);

  let score = date_diff_days * DATE_WEIGHT
    + final_price_diff_pct * FINAL_PRICE_WEIGHT
    + asking_price_diff_pct.unwrap_or(MISSING_ASKING_PRICE_PENALTY) * ASKING_PRICE_WEIGHT
    + percent_change_diff_pct.unwrap_or(MISSING_PERCENT_CHANGE_PENALTY) * PERCENT_CHANGE_WEIGHT;

  tracing::trace!(lhs = %lhs.id, rhs = %rhs.id, score, "scored candidate");

  Some(MatchScore {
    score,
    date_diff_days,
    final_price_diff_pct,
    asking_price_diff_pct,
    percent_change_diff_pct,
  })
}
