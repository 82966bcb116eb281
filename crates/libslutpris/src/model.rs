use std::fmt::{self, Display};

use bon::bon;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::SlutprisError, matching::scoring::MatchScore};

/// Display address used when a listing does not carry any street address.
pub const MISSING_ADDRESS: &str = "Ingen adress";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  Booli,
  Hemnet,
}

impl Source {
  pub fn as_str(&self) -> &'static str {
    match self {
      Source::Booli => "booli",
      Source::Hemnet => "hemnet",
    }
  }

  pub(crate) fn domain(&self) -> &'static str {
    match self {
      Source::Booli => "https://www.booli.se",
      Source::Hemnet => "https://www.hemnet.se",
    }
  }

  pub(crate) fn listing_url(&self, id: &str) -> String {
    match self {
      Source::Booli => format!("{}/annons/{id}", self.domain()),
      Source::Hemnet => format!("{}/salda/{id}", self.domain()),
    }
  }

  // Lower sorts first when picking canonical values out of a group.
  pub(crate) fn priority(&self) -> u8 {
    match self {
      Source::Hemnet => 0,
      Source::Booli => 1,
    }
  }
}

impl Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A listing exactly as a scraper produced it.
///
/// No schema is assumed: any JSON object is accepted, and any non-object
/// value is treated as an object without fields.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  /// Split a scraped document into its records.
  ///
  /// The document itself must be a JSON array, anything else is rejected.
  pub fn collection(document: Value) -> Result<Vec<RawRecord>, SlutprisError> {
    match document {
      Value::Array(items) => Ok(items.into_iter().map(RawRecord::from).collect()),
      Value::Null => Err(SlutprisError::InvalidCollection("expected an array of listings, got null".into())),
      Value::Bool(_) => Err(SlutprisError::InvalidCollection("expected an array of listings, got a boolean".into())),
      Value::Number(_) => Err(SlutprisError::InvalidCollection("expected an array of listings, got a number".into())),
      Value::String(_) => Err(SlutprisError::InvalidCollection("expected an array of listings, got a string".into())),
      Value::Object(_) => Err(SlutprisError::InvalidCollection("expected an array of listings, got an object".into())),
    }
  }
}

impl From<Value> for RawRecord {
  fn from(value: Value) -> Self {
    match value {
      Value::Object(fields) => RawRecord(fields),
      _ => RawRecord::default(),
    }
  }
}

impl From<Map<String, Value>> for RawRecord {
  fn from(fields: Map<String, Value>) -> Self {
    RawRecord(fields)
  }
}

impl From<RawRecord> for Value {
  fn from(record: RawRecord) -> Self {
    Value::Object(record.0)
  }
}

/// Canonical shape shared by listings of both sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
  pub id: String,
  pub source: Source,
  pub address: String,
  pub area: String,
  pub asking_price: f64,
  pub final_price: f64,
  pub percent_change: f64,
  pub sold_date: String,
  pub url: Option<String>,

  #[serde(skip_serializing_if = "RawRecord::is_empty")]
  pub raw: RawRecord,
}

impl NormalizedRecord {
  pub fn has_address(&self) -> bool {
    !self.address.trim().is_empty() && self.address != MISSING_ADDRESS
  }

  /// The percent change, unless it is a zero that only stands for a missing
  /// asking or final price.
  pub fn known_percent_change(&self) -> Option<f64> {
    if self.percent_change == 0.0 && (self.asking_price <= 0.0 || self.final_price <= 0.0) {
      return None;
    }

    Some(self.percent_change).filter(|change| change.is_finite())
  }
}

#[bon]
impl NormalizedRecord {
  #[builder]
  pub fn builder(
    #[builder(start_fn)] source: Source,
    id: &str,
    address: Option<&str>,
    area: Option<&str>,
    #[builder(default)] asking_price: f64,
    #[builder(default)] final_price: f64,
    #[builder(default)] percent_change: f64,
    sold_date: Option<&str>,
    url: Option<&str>,
  ) -> NormalizedRecord {
    NormalizedRecord {
      id: id.to_string(),
      source,
      address: address.unwrap_or(MISSING_ADDRESS).to_string(),
      area: area.map(ToOwned::to_owned).unwrap_or_default(),
      asking_price,
      final_price,
      percent_change,
      sold_date: sold_date.map(ToOwned::to_owned).unwrap_or_default(),
      url: url.map(ToOwned::to_owned),
      raw: RawRecord::default(),
    }
  }
}

/// Members of a match group, split by the source they were scraped from.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchedEntries {
  pub booli: Vec<NormalizedRecord>,
  pub hemnet: Vec<NormalizedRecord>,
}

impl MatchedEntries {
  pub(crate) fn from_members(members: &[NormalizedRecord]) -> MatchedEntries {
    let (hemnet, booli): (Vec<_>, Vec<_>) = members.iter().cloned().partition(|member| member.source == Source::Hemnet);

    MatchedEntries { booli, hemnet }
  }
}

/// Listings from both sources that were found to describe the same sale.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroup {
  pub id: String,
  /// Ordered by source priority, Hemnet members first.
  pub members: Vec<NormalizedRecord>,
  pub match_score: MatchScore,
}

/// One entry of the reconciled output.
///
/// Unmatched listings only carry their normalized fields. Group members are
/// either the primary, which holds the merged canonical prices, or a
/// secondary that is kept for display but excluded from statistics.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecord {
  #[serde(flatten)]
  pub record: NormalizedRecord,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub group_id: Option<String>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub is_primary: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub exclude_from_stats: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matched_entries: Option<MatchedEntries>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub match_score: Option<MatchScore>,
}

impl CombinedRecord {
  pub(crate) fn unmatched(record: NormalizedRecord) -> CombinedRecord {
    CombinedRecord {
      record,
      group_id: None,
      is_primary: false,
      exclude_from_stats: false,
      primary_id: None,
      matched_entries: None,
      match_score: None,
    }
  }

  pub(crate) fn primary(record: NormalizedRecord, group: &MatchGroup, entries: MatchedEntries) -> CombinedRecord {
    CombinedRecord {
      record,
      group_id: Some(group.id.clone()),
      is_primary: true,
      exclude_from_stats: false,
      primary_id: None,
      matched_entries: Some(entries),
      match_score: Some(group.match_score.clone()),
    }
  }

  pub(crate) fn secondary(record: NormalizedRecord, group: &MatchGroup, primary_id: &str, entries: MatchedEntries) -> CombinedRecord {
    CombinedRecord {
      record,
      group_id: Some(group.id.clone()),
      is_primary: false,
      exclude_from_stats: true,
      primary_id: Some(primary_id.to_string()),
      matched_entries: Some(entries),
      match_score: None,
    }
  }

  pub fn is_secondary(&self) -> bool {
    self.group_id.is_some() && !self.is_primary
  }

  pub fn is_unmatched(&self) -> bool {
    self.group_id.is_none()
  }
}
