use ahash::{HashMap, HashMapExt};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::model::NormalizedRecord;

/// Canonical form of a street address used to find candidate matches.
///
/// The address is lowercased and stripped of diacritics, anything outside of
/// ASCII letters, digits and spaces is dropped and whitespace is collapsed.
/// Returns `None` when nothing is left.
pub fn address_key(address: &str) -> Option<String> {
  let cleaned = address
    .to_lowercase()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
    .collect::<String>();

  let key = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

  match key.is_empty() {
    true => None,
    false => Some(key),
  }
}

/// Listings of one source grouped by their address key.
///
/// Each key keeps the positions of its listings in insertion order, which is
/// the order candidates are later scored in.
#[derive(Debug, Default)]
pub struct AddressIndex {
  blocks: HashMap<String, Vec<usize>>,
}

impl AddressIndex {
  /// Index listings by address, skipping those without a usable address.
  pub fn build(records: &[NormalizedRecord]) -> AddressIndex {
    let mut blocks: HashMap<String, Vec<usize>> = HashMap::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
      if !record.has_address() {
        continue;
      }

      if let Some(key) = address_key(&record.address) {
        blocks.entry(key).or_default().push(position);
      }
    }

    tracing::debug!(records = records.len(), blocks = blocks.len(), "built address index");

    AddressIndex { blocks }
  }

  /// Positions of the indexed listings sharing the address of `address`.
  pub fn candidates(&self, address: &str) -> &[usize] {
    address_key(address).and_then(|key| self.blocks.get(&key)).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }
}
