mod error;
mod matching;
mod model;
mod normalize;

pub mod blocking;
pub mod sanitize;
pub mod stats;

pub use crate::matching::merge::{merge, merge_with};
pub use crate::matching::scoring::{percent_difference, score};
pub use crate::normalize::{dates::parse_sold_date, normalize};

pub mod prelude {
  pub use crate::blocking::{AddressIndex, address_key};
  pub use crate::error::SlutprisError;
  pub use crate::matching::{
    MergeParams,
    merge::{MergeOutput, merge, merge_with},
    scoring::{MatchScore, percent_difference, score},
  };
  pub use crate::model::{CombinedRecord, MISSING_ADDRESS, MatchGroup, MatchedEntries, NormalizedRecord, RawRecord, Source};
  pub use crate::normalize::{dates::parse_sold_date, normalize};
  pub use crate::stats::{Summary, summarize};
}
