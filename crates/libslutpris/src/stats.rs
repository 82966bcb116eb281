use itertools::Itertools;
use jiff::Timestamp;
use serde::Serialize;

use crate::{model::CombinedRecord, normalize::dates::parse_sold_date};

/// Percent change statistics over a combined collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub total: usize,
  /// Records counted in the statistics, secondaries of a group are not.
  pub included: usize,
  pub excluded: usize,
  pub average: f64,
  pub median: f64,
  /// Sold date range of the counted records, skipping unparseable dates.
  pub oldest_sold: Option<Timestamp>,
  pub newest_sold: Option<Timestamp>,
}

/// Average and median percent change, counting each sale only once.
///
/// Records flagged `exclude_from_stats` are skipped, as are non-finite
/// percent changes. Both figures are zero when nothing is left to count.
pub fn summarize(records: &[CombinedRecord]) -> Summary {
  let changes = records
    .iter()
    .filter(|record| !record.exclude_from_stats)
    .map(|record| record.record.percent_change)
    .filter(|change| change.is_finite())
    .sorted_by(f64::total_cmp)
    .collect::<Vec<_>>();

  let included = records.iter().filter(|record| !record.exclude_from_stats).count();

  let sold_range = records
    .iter()
    .filter(|record| !record.exclude_from_stats)
    .filter_map(|record| parse_sold_date(&record.record.sold_date))
    .minmax()
    .into_option();

  let summary = Summary {
    total: records.len(),
    included,
    excluded: records.len() - included,
    average: average(&changes),
    median: median(&changes),
    oldest_sold: sold_range.map(|(oldest, _)| oldest),
    newest_sold: sold_range.map(|(_, newest)| newest),
  };

  tracing::debug!(total = summary.total, included = summary.included, average = summary.average, median = summary.median, "summarized listings");

  summary
}

fn average(values: &[f64]) -> f64 {
  match values.len() {
    0 => 0.0,
    count => values.iter().sum::<f64>() / count as f64,
  }
}

// Expects sorted values.
fn median(values: &[f64]) -> f64 {
  let middle = values.len() / 2;

  match values.len() {
    0 => 0.0,
    count if count % 2 == 0 => (values[middle - 1] + values[middle]) / 2.0,
    _ => values[middle],
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;
  use jiff::Timestamp;

  use crate::model::{CombinedRecord, NormalizedRecord, Source};

  use super::summarize;

  fn unmatched(id: &str, percent_change: f64) -> CombinedRecord {
    CombinedRecord::unmatched(NormalizedRecord::builder(Source::Hemnet).id(id).percent_change(percent_change).build())
  }

  #[test]
  fn summarize_empty() {
    let summary = summarize(&[]);

    assert_eq!(summary.total, 0);
    assert_eq!(summary.average, 0.0);
    assert_eq!(summary.median, 0.0);
    assert_eq!(summary.oldest_sold, None);
    assert_eq!(summary.newest_sold, None);
  }

  #[test]
  fn chronological_sold_range() {
    let dated = |id: &str, sold_date: &str| CombinedRecord::unmatched(NormalizedRecord::builder(Source::Hemnet).id(id).sold_date(sold_date).build());

    let mut shadow = dated("4", "2023-01-01");

    shadow.exclude_from_stats = true;

    let records = vec![dated("1", "3 mars 2024"), dated("2", "2024-01-15"), dated("3", "2024-12-01"), shadow, dated("5", "nyligen")];
    let summary = summarize(&records);

    assert_eq!(summary.oldest_sold, Some("2024-01-15T00:00:00Z".parse::<Timestamp>().unwrap()));
    assert_eq!(summary.newest_sold, Some("2024-12-01T00:00:00Z".parse::<Timestamp>().unwrap()));
  }

  #[test]
  fn summarize_odd_and_even() {
    let records = vec![unmatched("1", 4.0), unmatched("2", -2.0), unmatched("3", 1.0)];
    let summary = summarize(&records);

    assert!(approx_eq!(f64, summary.average, 1.0, epsilon = 1e-9));
    assert_eq!(summary.median, 1.0);

    let records = vec![unmatched("1", 4.0), unmatched("2", -2.0), unmatched("3", 1.0), unmatched("4", 3.0)];
    let summary = summarize(&records);

    assert!(approx_eq!(f64, summary.average, 1.5, epsilon = 1e-9));
    assert_eq!(summary.median, 2.0);
  }

  #[test]
  fn skip_excluded_and_non_finite() {
    let mut shadow = unmatched("2", 100.0);

    shadow.exclude_from_stats = true;

    let records = vec![unmatched("1", 2.0), shadow, unmatched("3", f64::NAN)];
    let summary = summarize(&records);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.included, 2);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.average, 2.0);
    assert_eq!(summary.median, 2.0);
  }
}
