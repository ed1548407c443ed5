//! Matching uploaded scramble sheets to rounds, and clearing assignments.
//!
//! Rounds that already have scramble sets are never touched. For an empty round
//! the uploaded groups are scanned in upload order and the first group holding
//! unused sheets for the round's (event, round number) supplies all of them.
//! Later groups with sheets for the same round are left alone: they are usually
//! extras meant for rounds we cannot work out automatically.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::domain::{EventId, InternalCompetition, InternalScrambleSet, UploadedGroup};

/// Ids of every scramble set already attached to a round of `event_id`.
pub fn used_ids_for_event(competition: &InternalCompetition, event_id: &EventId) -> HashSet<u64> {
  competition
    .events
    .iter()
    .filter(|e| &e.id == event_id)
    .flat_map(|e| e.rounds.iter())
    .flat_map(|r| r.scramble_sets.iter())
    .map(|s| s.id)
    .collect()
}

/// Uploaded records for `event_id` not yet attached anywhere, in pool order.
pub fn available_for_event(pool: &[UploadedGroup], event_id: &EventId, used: &HashSet<u64>) -> Vec<InternalScrambleSet> {
  pool
    .iter()
    .flat_map(|group| group.sheets.iter())
    .filter(|s| &s.event_id == event_id && !used.contains(&s.id))
    .cloned()
    .collect()
}

/// Sheets to assign to round `round_number` of `event_id`: every unused match
/// from the first group that has any.
fn scramble_sets_for_round(
  used: &HashSet<u64>,
  event_id: &EventId,
  round_number: u32,
  pool: &[UploadedGroup],
) -> Vec<InternalScrambleSet> {
  let first_matching = pool
    .iter()
    .map(|group| {
      group
        .sheets
        .iter()
        .filter(|s| !used.contains(&s.id) && s.matches_round(event_id, round_number))
        .cloned()
        .collect::<Vec<_>>()
    })
    .find(|sheets| !sheets.is_empty())
    .unwrap_or_default();

  if event_id.is_multi_attempt() {
    first_matching
      .into_iter()
      .map(|s| InternalScrambleSet { attempt_number: s.generated_attempt_number, ..s })
      .collect()
  } else {
    first_matching
  }
}

/// Fill every unassigned round from the uploaded pool. Returns a new competition.
///
/// The used-id set of each event is taken once, before the pass. It does not need
/// updating as rounds get filled: each round looks for a different (event, round)
/// pair, so no two rounds of one pass can want the same sheet.
#[instrument(level = "info", skip_all, fields(events = competition.events.len(), groups = pool.len()))]
pub fn auto_assign(competition: &InternalCompetition, pool: &[UploadedGroup]) -> InternalCompetition {
  let mut assigned = 0usize;
  let mut unmatched = 0usize;
  let updated = competition.map_events(|event| {
    let used = used_ids_for_event(competition, &event.id);
    event.map_rounds(|index, round| {
      if round.is_assigned() {
        return round.scramble_sets.clone();
      }
      let number = round.number(index);
      let sets = scramble_sets_for_round(&used, &event.id, number, pool);
      if sets.is_empty() {
        unmatched += 1;
        debug!(target: "scrambles", event = %event.id, round = number, "No uploaded sheet for round");
      } else {
        assigned += 1;
        debug!(target: "scrambles", event = %event.id, round = number, sets = sets.len(), "Round assigned");
      }
      sets
    })
  });
  info!(target: "scrambles", assigned, unmatched, "Auto-assign finished");
  updated
}

/// Empty every round's scramble sets, whatever they held.
#[instrument(level = "info", skip_all, fields(events = competition.events.len()))]
pub fn clear_assignments(competition: &InternalCompetition) -> InternalCompetition {
  competition.map_events(|event| event.map_rounds(|_, _| Vec::new()))
}
