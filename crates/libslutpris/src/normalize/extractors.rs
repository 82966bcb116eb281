use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::model::RawRecord;

// Scrapers nest prices as `{ raw, value, formatted }`, sometimes twice.
// Anything deeper than this is treated as unparseable.
const MAX_UNWRAP_DEPTH: usize = 3;
const WRAPPER_KEYS: [&str; 3] = ["raw", "value", "formatted"];

/// How a single field value looks, independently of the source it came from.
#[derive(Debug)]
pub(crate) enum FieldShape<'v> {
  Number(f64),
  Text(&'v str),
  Wrapper(&'v Map<String, Value>),
  Opaque,
}

impl<'v> From<&'v Value> for FieldShape<'v> {
  fn from(value: &'v Value) -> Self {
    match value {
      Value::Number(number) => number.as_f64().map(FieldShape::Number).unwrap_or(FieldShape::Opaque),
      Value::String(text) => FieldShape::Text(text),
      Value::Object(fields) => FieldShape::Wrapper(fields),
      Value::Null | Value::Bool(_) | Value::Array(_) => FieldShape::Opaque,
    }
  }
}

/// An ordered list of field names tried one after the other, along with the
/// rules used to read each of them.
pub(crate) struct Candidates {
  pub(crate) keys: &'static [&'static str],
  parse_text: fn(&str) -> Option<f64>,
  accept_number: fn(f64) -> bool,
}

impl Candidates {
  /// Returns the first candidate field that resolves to a number.
  pub(crate) fn extract(&self, record: &RawRecord) -> Option<f64> {
    self.keys.iter().find_map(|key| record.get(key).and_then(|value| self.resolve(value, 0)))
  }

  fn resolve(&self, value: &Value, depth: usize) -> Option<f64> {
    match FieldShape::from(value) {
      FieldShape::Number(number) => (self.accept_number)(number).then_some(number),
      FieldShape::Text(text) => (self.parse_text)(text).filter(|number| (self.accept_number)(*number)),
      FieldShape::Wrapper(fields) if depth < MAX_UNWRAP_DEPTH => {
        // Only the first wrapper key present is considered, even if it holds
        // something unparseable.
        let inner = WRAPPER_KEYS.iter().find_map(|key| fields.get(*key))?;

        self.resolve(inner, depth + 1)
      }
      FieldShape::Wrapper(_) | FieldShape::Opaque => None,
    }
  }
}

pub(crate) const ASKING_PRICE: Candidates = Candidates {
  keys: &["askingPrice", "listPrice", "askPrice", "price"],
  parse_text: parse_price_text,
  accept_number: is_price,
};

pub(crate) const FINAL_PRICE: Candidates = Candidates {
  keys: &["finalPrice", "soldPrice", "salePrice"],
  parse_text: parse_price_text,
  accept_number: is_price,
};

pub(crate) const PERCENT_CHANGE: Candidates = Candidates {
  keys: &["percentChange", "soldPricePercentageDiff", "percentageChange"],
  parse_text: parse_percentage_text,
  accept_number: f64::is_finite,
};

fn is_price(value: f64) -> bool {
  value.is_finite() && value >= 0.0
}

/// Keeps every digit of the text and reads them as one integer, so that
/// `"4 500 000 kr"` reads as `4500000`.
pub(crate) fn parse_price_text(text: &str) -> Option<f64> {
  let digits = text.chars().filter(char::is_ascii_digit).collect::<String>();

  if digits.is_empty() {
    return None;
  }

  digits.parse::<f64>().ok()
}

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Reads a percentage such as `"-3,5 %"`, accepting a decimal comma and
/// ignoring anything trailing the leading number.
pub(crate) fn parse_percentage_text(text: &str) -> Option<f64> {
  let normalized = text.replace('%', "").replace(',', ".");
  let normalized = normalized.trim();

  if normalized.is_empty() {
    return None;
  }

  LEADING_FLOAT.find(normalized).and_then(|number| number.as_str().parse::<f64>().ok()).filter(|number| number.is_finite())
}

/// First candidate field holding a non-blank string.
pub(crate) fn first_text<'r>(record: &'r RawRecord, keys: &[&str]) -> Option<&'r str> {
  keys.iter().find_map(|key| record.get(key).and_then(Value::as_str).map(str::trim).filter(|text| !text.is_empty()))
}

/// Follows a path of nested objects down to a non-blank string.
pub(crate) fn nested_text<'r>(record: &'r RawRecord, path: &[&str]) -> Option<&'r str> {
  let (first, rest) = path.split_first()?;
  let mut value = record.get(first)?;

  for key in rest {
    value = value.as_object()?.get(*key)?;
  }

  value.as_str().map(str::trim).filter(|text| !text.is_empty())
}

/// Identifiers come as strings or numbers depending on the scraper.
pub(crate) fn identifier(record: &RawRecord, keys: &[&str]) -> Option<String> {
  keys.iter().find_map(|key| match record.get(key)? {
    Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
    Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
    _ => None,
  })
}
