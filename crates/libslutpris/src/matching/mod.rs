mod components;

use serde::Deserialize;
use serde_inline_default::serde_inline_default;
use validator::Validate;

use crate::{error::SlutprisError, model::NormalizedRecord};

pub(crate) mod merge;
pub(crate) mod scoring;

/// A single measurement of how far apart two listings are.
///
/// Returns `None` when either side lacks the data the measurement needs.
pub(crate) trait Component: Send + Sync {
  fn name(&self) -> &'static str;
  fn measure(&self, lhs: &NormalizedRecord, rhs: &NormalizedRecord) -> Option<f64>;
}

/// Tolerances used to accept or reject a candidate pair.
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
pub struct MergeParams {
  /// Maximum number of days between the two sold dates.
  #[serde_inline_default(2.0)]
  #[validate(range(min = 0.0))]
  pub max_date_diff_days: f64,
  /// Maximum relative difference between the two final prices, in percent.
  #[serde_inline_default(3.0)]
  #[validate(range(min = 0.0))]
  pub max_final_price_diff_pct: f64,
  /// Highest composite score still accepted as a match.
  #[serde_inline_default(3.0)]
  #[validate(range(min = 0.0))]
  pub max_score: f64,
}

impl Default for MergeParams {
  fn default() -> Self {
    MergeParams {
      max_date_diff_days: 2.0,
      max_final_price_diff_pct: 3.0,
      max_score: 3.0,
    }
  }
}

impl MergeParams {
  /// Returns the parameters if every tolerance is within bounds.
  pub fn checked(self) -> Result<MergeParams, SlutprisError> {
    self.validate()?;

    Ok(self)
  }
}
