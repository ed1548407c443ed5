//! Domain models: competition file (WCIF) structure, scramble sets in both their
//! interchange and internal shapes, and raw scramble-generator uploads.
//!
//! The competition types are generic over the scramble-set shape so the same
//! structure carries internal records while the organizer works, and plain WCIF
//! scramble sets once exported. Fields we do not model are kept in `extra` and
//! written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a puzzle event ("333", "333fm", "333mbf", ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn policy(&self) -> AttemptPolicy {
    AttemptPolicy::for_event(self.as_str())
  }

  pub fn is_multi_attempt(&self) -> bool {
    self.policy() != AttemptPolicy::PerSheet
  }
}

impl std::fmt::Display for EventId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EventId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// How an event's scrambles are split on import and recombined on export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptPolicy {
  /// Fewest moves: one record per attempt, exported as one flat set sorted by attempt.
  FlattenByAttempt,
  /// Multi-blind: one record per attempt, exported as one set holding one
  /// newline-joined string per attempt.
  JoinPerAttempt,
  /// Everything else, including ids we do not recognise: sheets map 1:1.
  PerSheet,
}

impl AttemptPolicy {
  pub fn for_event(event_id: &str) -> Self {
    match event_id {
      "333fm" => AttemptPolicy::FlattenByAttempt,
      "333mbf" => AttemptPolicy::JoinPerAttempt,
      _ => AttemptPolicy::PerSheet,
    }
  }
}

/// Scramble set exactly as the interchange format stores it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleSet {
  pub id: u64,
  #[serde(default)] pub scrambles: Vec<String>,
  #[serde(default)] pub extra_scrambles: Vec<String>,
}

/// Scramble set plus the provenance we need for matching and display.
/// Every metadata field defaults, so a plain WCIF scramble set also parses here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalScrambleSet {
  pub id: u64,
  #[serde(default)] pub scrambles: Vec<String>,
  #[serde(default)] pub extra_scrambles: Vec<String>,
  #[serde(default)] pub title: String,
  #[serde(default)] pub sheet_name: String,
  #[serde(default)] pub generated_attempt_number: Option<u32>,
  #[serde(default)] pub event_id: EventId,
  #[serde(default)] pub round_number: u32,
  #[serde(default)] pub attempt_number: Option<u32>,
}

impl InternalScrambleSet {
  pub fn matches_round(&self, event_id: &EventId, round_number: u32) -> bool {
    &self.event_id == event_id && self.round_number == round_number
  }

  pub fn to_wcif(&self) -> ScrambleSet {
    ScrambleSet {
      id: self.id,
      scrambles: self.scrambles.clone(),
      extra_scrambles: self.extra_scrambles.clone(),
    }
  }
}

/// One sheet in a scramble generator's JSON output.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSheet {
  #[serde(default)] pub event: EventId,
  #[serde(default)] pub round: u32,
  #[serde(default)] pub title: String,
  #[serde(default)] pub scrambles: Vec<String>,
  #[serde(default)] pub extra_scrambles: Vec<String>,
  #[serde(default)] pub generated_attempt_number: Option<u32>,
}

/// Scramble generator output as uploaded by the organizer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedScrambleFile {
  #[serde(default)] pub competition_name: String,
  #[serde(default)] pub sheets: Vec<RawSheet>,
}

/// An uploaded file after import: the unit the matcher scans in upload order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedGroup {
  #[serde(default)] pub competition_name: String,
  #[serde(default)] pub sheets: Vec<InternalScrambleSet>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round<S> {
  /// Activity code, e.g. "333-r1".
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(default = "Vec::new")]
  pub scramble_sets: Vec<S>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl<S> Round<S> {
  /// 1-based round number. Taken from the activity code when it carries one,
  /// otherwise from the round's position within its event.
  pub fn number(&self, index: usize) -> u32 {
    self
      .id
      .rsplit_once("-r")
      .and_then(|(_, n)| n.parse::<u32>().ok())
      .filter(|n| *n > 0)
      .unwrap_or(index as u32 + 1)
  }

  pub fn is_assigned(&self) -> bool {
    !self.scramble_sets.is_empty()
  }

  /// Same round with its scramble sets replaced.
  pub fn with_scramble_sets<T>(&self, scramble_sets: Vec<T>) -> Round<T> {
    Round { id: self.id.clone(), scramble_sets, extra: self.extra.clone() }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<S> {
  pub id: EventId,
  #[serde(default = "Vec::new")]
  pub rounds: Vec<Round<S>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl<S> Event<S> {
  /// New event whose rounds get the scramble sets returned by `f(index, round)`.
  pub fn map_rounds<T>(&self, mut f: impl FnMut(usize, &Round<S>) -> Vec<T>) -> Event<T> {
    Event {
      id: self.id.clone(),
      rounds: self
        .rounds
        .iter()
        .enumerate()
        .map(|(i, r)| r.with_scramble_sets(f(i, r)))
        .collect(),
      extra: self.extra.clone(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition<S> {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(default = "Vec::new")]
  pub events: Vec<Event<S>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl<S> Competition<S> {
  /// WCIF competition id, if the file carries one.
  pub fn competition_id(&self) -> &str {
    self.extra.get("id").and_then(|v| v.as_str()).unwrap_or_default()
  }

  /// New competition built event by event; the original is left untouched.
  pub fn map_events<T>(&self, f: impl FnMut(&Event<S>) -> Event<T>) -> Competition<T> {
    Competition {
      name: self.name.clone(),
      events: self.events.iter().map(f).collect(),
      extra: self.extra.clone(),
    }
  }
}

pub type InternalCompetition = Competition<InternalScrambleSet>;
pub type WcifCompetition = Competition<ScrambleSet>;
