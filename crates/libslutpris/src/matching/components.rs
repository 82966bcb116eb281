use libslutpris_macros::score_component;

use crate::{
  matching::{Component, scoring::percent_difference},
  model::NormalizedRecord,
  normalize::dates::{days_between, parse_sold_date},
};

#[score_component(SoldDateDistance, name = "date_diff_days")]
fn measure(&self, lhs: &NormalizedRecord, rhs: &NormalizedRecord) -> Option<f64> {
  let lhs_date = parse_sold_date(&lhs.sold_date)?;
  let rhs_date = parse_sold_date(&rhs.sold_date)?;

  Some(days_between(lhs_date, rhs_date))
}

#[score_component(FinalPriceDistance, name = "final_price_diff_pct")]
fn measure(&self, lhs: &NormalizedRecord, rhs: &NormalizedRecord) -> Option<f64> {
  Some(percent_difference(lhs.final_price, rhs.final_price)).filter(|diff| diff.is_finite())
}

// An unknown asking price is stored as zero, comparing it would only produce
// a meaningless 200% difference.
#[score_component(AskingPriceDistance, name = "asking_price_diff_pct")]
fn measure(&self, lhs: &NormalizedRecord, rhs: &NormalizedRecord) -> Option<f64> {
  if lhs.asking_price <= 0.0 || rhs.asking_price <= 0.0 {
    return None;
  }

  Some(percent_difference(lhs.asking_price, rhs.asking_price)).filter(|diff| diff.is_finite())
}

#[score_component(PercentChangeDistance, name = "percent_change_diff_pct")]
fn measure(&self, lhs: &NormalizedRecord, rhs: &NormalizedRecord) -> Option<f64> {
  let lhs_change = lhs.known_percent_change()?;
  let rhs_change = rhs.known_percent_change()?;

  Some(percent_difference(lhs_change, rhs_change)).filter(|diff| diff.is_finite())
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  use crate::{
    matching::Component,
    model::{NormalizedRecord, Source},
  };

  fn pair(lhs: NormalizedRecord, rhs: NormalizedRecord) -> (NormalizedRecord, NormalizedRecord) {
    (lhs, rhs)
  }

  #[test]
  fn sold_date_distance() {
    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").sold_date("2024-03-01").build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").sold_date("3 mars 2024").build(),
    );

    assert_eq!(super::SoldDateDistance.name(), "date_diff_days");
    assert_eq!(super::SoldDateDistance.measure(&lhs, &rhs), Some(2.0));

    let undated = NormalizedRecord::builder(Source::Hemnet).id("3").build();

    assert_eq!(super::SoldDateDistance.measure(&lhs, &undated), None);
  }

  #[test]
  fn final_price_distance() {
    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").final_price(3_000_000.0).build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").final_price(3_010_000.0).build(),
    );

    assert!(approx_eq!(f64, super::FinalPriceDistance.measure(&lhs, &rhs).unwrap(), 0.3328, epsilon = 0.0001));

    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").build(),
    );

    assert_eq!(super::FinalPriceDistance.measure(&lhs, &rhs), None);
  }

  #[test]
  fn asking_price_distance() {
    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").asking_price(2_000_000.0).build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").build(),
    );

    assert_eq!(super::AskingPriceDistance.measure(&lhs, &rhs), None);

    let rhs = NormalizedRecord::builder(Source::Hemnet).id("2").asking_price(2_000_000.0).build();

    assert_eq!(super::AskingPriceDistance.measure(&lhs, &rhs), Some(0.0));
  }

  #[test]
  fn percent_change_distance() {
    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").percent_change(4.0).build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").percent_change(-4.0).build(),
    );

    assert_eq!(super::PercentChangeDistance.measure(&lhs, &rhs), Some(200.0));

    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").build(),
    );

    assert_eq!(super::PercentChangeDistance.measure(&lhs, &rhs), None);

    let (lhs, rhs) = pair(
      NormalizedRecord::builder(Source::Booli).id("1").percent_change(3.0).build(),
      NormalizedRecord::builder(Source::Hemnet).id("2").final_price(1_000_000.0).build(),
    );

    assert_eq!(super::PercentChangeDistance.measure(&lhs, &rhs), None);
  }
}
