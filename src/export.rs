//! Export: internal scramble records back to the interchange shape.
//!
//! Fewest moves and multi-blind are tracked as one record per attempt while the
//! organizer works. The interchange format has no attempt dimension, so they are
//! recombined here, once, when a round is written out.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::domain::{AttemptPolicy, Competition, EventId, InternalCompetition, InternalScrambleSet, ScrambleSet, WcifCompetition};
use crate::error::ApiError;

/// Convert one round's internal records for `event_id` into interchange scramble sets.
pub fn to_interchange_scramble_sets(event_id: &EventId, records: &[InternalScrambleSet]) -> Vec<ScrambleSet> {
  let Some(first) = records.first() else {
    return Vec::new();
  };
  match event_id.policy() {
    AttemptPolicy::JoinPerAttempt => {
      let mut by_attempt: BTreeMap<Option<u32>, Vec<&str>> = BTreeMap::new();
      for r in records {
        by_attempt
          .entry(r.attempt_number)
          .or_default()
          .extend(r.scrambles.iter().map(String::as_str));
      }
      vec![ScrambleSet {
        id: first.id,
        scrambles: by_attempt.into_values().map(|seqs| seqs.join("\n")).collect(),
        extra_scrambles: Vec::new(),
      }]
    }
    AttemptPolicy::FlattenByAttempt => {
      let mut sorted: Vec<&InternalScrambleSet> = records.iter().collect();
      sorted.sort_by_key(|r| r.attempt_number);
      vec![ScrambleSet {
        id: first.id,
        scrambles: sorted.into_iter().flat_map(|r| r.scrambles.iter().cloned()).collect(),
        extra_scrambles: Vec::new(),
      }]
    }
    AttemptPolicy::PerSheet => records.iter().map(InternalScrambleSet::to_wcif).collect(),
  }
}

/// Whole competition file in interchange form.
#[instrument(level = "info", skip_all, fields(events = competition.events.len()))]
pub fn competition_to_wcif(competition: &InternalCompetition) -> WcifCompetition {
  Competition::map_events(competition, |event| {
    event.map_rounds(|_, round| to_interchange_scramble_sets(&event.id, &round.scramble_sets))
  })
}

/// Activity codes of rounds that have no scramble sets yet.
pub fn unassigned_rounds<S>(competition: &Competition<S>) -> Vec<String> {
  competition
    .events
    .iter()
    .flat_map(|event| {
      event.rounds.iter().enumerate().filter(|(_, r)| !r.is_assigned()).map(move |(i, r)| {
        if r.id.is_empty() { format!("{}-r{}", event.id, r.number(i)) } else { r.id.clone() }
      })
    })
    .collect()
}

/// Refuse export while rounds are unassigned, but only when `required` is set.
pub fn ensure_exportable(competition: &InternalCompetition, required: bool) -> Result<(), ApiError> {
  let rounds = unassigned_rounds(competition);
  if rounds.is_empty() {
    return Ok(());
  }
  if required {
    return Err(ApiError::ExportUnavailable { rounds });
  }
  warn!(target: "scrambles", unassigned = rounds.len(), "Exporting with unassigned rounds");
  Ok(())
}

//
// Results submission file
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsFile {
  pub format_version: String,
  pub competition_id: String,
  pub persons: Vec<Value>,
  pub events: Vec<ResultsEvent>,
  pub scramble_program: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsEvent {
  pub event_id: EventId,
  pub rounds: Vec<ResultsRound>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsRound {
  pub round_id: String,
  pub format_id: String,
  pub results: Vec<Value>,
  pub groups: Vec<ResultsGroup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsGroup {
  pub group: String,
  pub scrambles: Vec<String>,
  pub extra_scrambles: Vec<String>,
}

/// Group letter for a 0-based index: A..Z, then AA, AB, ...
pub fn prefix_for_index(index: usize) -> String {
  let mut n = index + 1;
  let mut out = Vec::new();
  while n > 0 {
    n -= 1;
    out.push(b'A' + (n % 26) as u8);
    n /= 26;
  }
  out.iter().rev().map(|b| *b as char).collect()
}

/// Results file carrying the scramble groups of every round.
/// Persons and results belong to the results pipeline and are left empty.
#[instrument(level = "info", skip(competition), fields(events = competition.events.len()))]
pub fn competition_to_results(competition: &InternalCompetition, format_version: &str, scramble_program: &str) -> ResultsFile {
  let events: Vec<ResultsEvent> = competition
    .events
    .iter()
    .map(|event| ResultsEvent {
      event_id: event.id.clone(),
      rounds: event
        .rounds
        .iter()
        .enumerate()
        .map(|(i, round)| ResultsRound {
          round_id: round.number(i).to_string(),
          format_id: round.extra.get("format").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
          results: Vec::new(),
          groups: to_interchange_scramble_sets(&event.id, &round.scramble_sets)
            .into_iter()
            .enumerate()
            .map(|(g, set)| ResultsGroup {
              group: prefix_for_index(g),
              scrambles: set.scrambles,
              extra_scrambles: set.extra_scrambles,
            })
            .collect(),
        })
        .collect(),
    })
    .collect();
  info!(target: "scrambles", competition = %competition.competition_id(), %format_version, "Results file built");
  ResultsFile {
    format_version: format_version.to_string(),
    competition_id: competition.competition_id().to_string(),
    persons: Vec::new(),
    events,
    scramble_program: scramble_program.to_string(),
  }
}
