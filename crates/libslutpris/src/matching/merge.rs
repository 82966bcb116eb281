use serde::Serialize;
use tracing::instrument;

use crate::{
  blocking::AddressIndex,
  matching::{
    MergeParams,
    scoring::{MatchScore, score},
  },
  model::{CombinedRecord, MatchGroup, MatchedEntries, NormalizedRecord, RawRecord, Source},
  normalize::{derived_percent_change, normalize},
};

/// Result of reconciling both sources.
#[derive(Clone, Debug, Serialize)]
pub struct MergeOutput {
  /// Primaries, then secondaries, then unmatched Booli and unmatched Hemnet
  /// listings, each part in its original order.
  pub combined: Vec<CombinedRecord>,
  pub groups: Vec<MatchGroup>,
}

/// Reconcile both sources with the default tolerances.
pub fn merge(booli: &[RawRecord], hemnet: &[RawRecord]) -> MergeOutput {
  merge_with(booli, hemnet, &MergeParams::default())
}

/// Reconcile Booli and Hemnet listings into a single collection.
///
/// Booli listings are processed in order, and each claims the best-scoring
/// Hemnet listing at the same address that was not claimed yet, if that score
/// is within `params.max_score`. Matching is greedy: an earlier Booli listing
/// keeps its Hemnet match even if a later one would have scored better.
#[instrument(name = "merge_listings", skip_all, fields(booli = booli.len(), hemnet = hemnet.len()))]
pub fn merge_with(booli: &[RawRecord], hemnet: &[RawRecord], params: &MergeParams) -> MergeOutput {
  let booli = booli.iter().map(|raw| normalize(raw, Source::Booli)).collect::<Vec<_>>();
  let hemnet = hemnet.iter().map(|raw| normalize(raw, Source::Hemnet)).collect::<Vec<_>>();

  let pairs = claim_pairs(&booli, &hemnet, params);

  let mut booli_claimed = vec![false; booli.len()];
  let mut hemnet_claimed = vec![false; hemnet.len()];
  let mut groups = Vec::with_capacity(pairs.len());

  for (booli_position, hemnet_position, match_score) in pairs {
    booli_claimed[booli_position] = true;
    hemnet_claimed[hemnet_position] = true;

    let group = MatchGroup {
      id: format!("group-{}", groups.len() + 1),
      members: vec![hemnet[hemnet_position].clone(), booli[booli_position].clone()],
      match_score,
    };

    tracing::debug!(group = %group.id, booli = %booli[booli_position].id, hemnet = %hemnet[hemnet_position].id, score = group.match_score.score, "matched listings");

    groups.push(group);
  }

  let mut primaries = Vec::with_capacity(groups.len());
  let mut secondaries = Vec::with_capacity(groups.len());

  for group in &groups {
    if let Some((primary, shadows)) = group_records(group) {
      primaries.push(primary);
      secondaries.extend(shadows);
    }
  }

  let unmatched_booli = unclaimed(booli, &booli_claimed);
  let unmatched_hemnet = unclaimed(hemnet, &hemnet_claimed);

  tracing::debug!(
    groups = groups.len(),
    unmatched_booli = unmatched_booli.len(),
    unmatched_hemnet = unmatched_hemnet.len(),
    "merged listings"
  );

  let mut combined = primaries;

  combined.extend(secondaries);
  combined.extend(unmatched_booli.into_iter().map(CombinedRecord::unmatched));
  combined.extend(unmatched_hemnet.into_iter().map(CombinedRecord::unmatched));

  MergeOutput { combined, groups }
}

/// Greedy single pass over Booli listings, returning accepted pairs as
/// `(booli position, hemnet position, score)` in acceptance order.
fn claim_pairs(booli: &[NormalizedRecord], hemnet: &[NormalizedRecord], params: &MergeParams) -> Vec<(usize, usize, MatchScore)> {
  let index = AddressIndex::build(hemnet);
  let mut claimed = vec![false; hemnet.len()];
  let mut pairs = Vec::new();

  for (booli_position, listing) in booli.iter().enumerate() {
    if !listing.has_address() {
      continue;
    }

    let mut best: Option<(usize, MatchScore)> = None;

    for &hemnet_position in index.candidates(&listing.address) {
      if claimed[hemnet_position] {
        continue;
      }

      let Some(candidate) = score(listing, &hemnet[hemnet_position], params) else {
        continue;
      };

      // Strictly lower, so that ties go to the earliest indexed candidate.
      if best.as_ref().is_none_or(|(_, current)| candidate.score < current.score) {
        best = Some((hemnet_position, candidate));
      }
    }

    if let Some((hemnet_position, match_score)) = best
      && match_score.score <= params.max_score
    {
      claimed[hemnet_position] = true;
      pairs.push((booli_position, hemnet_position, match_score));
    }
  }

  pairs
}

/// Build the primary and secondary records of a group.
///
/// The Hemnet member is the primary. Prices are taken from the first member,
/// in priority order, that knows them, and the percent change is recomputed
/// from the merged prices when both are known.
fn group_records(group: &MatchGroup) -> Option<(CombinedRecord, Vec<CombinedRecord>)> {
  let primary_position = group.members.iter().position(|member| member.source == Source::Hemnet).unwrap_or(0);
  let primary = group.members.get(primary_position)?;
  let entries = MatchedEntries::from_members(&group.members);

  let mut by_priority = group.members.iter().collect::<Vec<_>>();

  by_priority.sort_by_key(|member| member.source.priority());

  let asking_price = first_known(&by_priority, |member| member.asking_price);
  let final_price = first_known(&by_priority, |member| member.final_price);

  let percent_change = match asking_price > 0.0 && final_price > 0.0 {
    true => derived_percent_change(asking_price, final_price),
    false => first_known(&by_priority, |member| member.percent_change),
  };

  let merged = NormalizedRecord {
    asking_price,
    final_price,
    percent_change,
    ..primary.clone()
  };

  let secondaries = group
    .members
    .iter()
    .enumerate()
    .filter(|(position, _)| *position != primary_position)
    .map(|(_, member)| CombinedRecord::secondary(member.clone(), group, &primary.id, entries.clone()))
    .collect();

  Some((CombinedRecord::primary(merged, group, entries), secondaries))
}

fn first_known(members: &[&NormalizedRecord], field: impl Fn(&NormalizedRecord) -> f64) -> f64 {
  members.iter().map(|member| field(*member)).find(|value| value.is_finite() && *value != 0.0).unwrap_or(0.0)
}

fn unclaimed(records: Vec<NormalizedRecord>, claimed: &[bool]) -> Vec<NormalizedRecord> {
  records.into_iter().zip(claimed).filter(|(_, claimed)| !**claimed).map(|(record, _)| record).collect()
}
