//! Turning uploads into internal scramble records.
//!
//!   - raw generator sheets -> internal records (fresh ids, provenance stamped)
//!   - multi-attempt expansion for fewest moves / multi-blind
//!   - loading a competition file that may already carry scramble sets
//!
//! Nothing here rejects input: missing optional fields default and unknown events
//! are imported like any other single-attempt event.

use tracing::{debug, info, instrument};

use crate::domain::{
  Competition, InternalCompetition, InternalScrambleSet, RawSheet, UploadedGroup, UploadedScrambleFile,
};
use crate::ids::ScrambleSetIds;

/// Internal record for one raw sheet, with a fresh id and `sheet_name = file_name`.
pub fn import_sheet(file_name: &str, sheet: &RawSheet, ids: &ScrambleSetIds) -> InternalScrambleSet {
  InternalScrambleSet {
    id: ids.next(),
    scrambles: sheet.scrambles.clone(),
    extra_scrambles: sheet.extra_scrambles.clone(),
    title: sheet.title.clone(),
    sheet_name: file_name.to_string(),
    generated_attempt_number: sheet.generated_attempt_number,
    event_id: sheet.event.clone(),
    round_number: sheet.round,
    attempt_number: None,
  }
}

/// One internal record per raw sheet, in sheet order.
pub fn import_sheets(file_name: &str, sheets: &[RawSheet], ids: &ScrambleSetIds) -> Vec<InternalScrambleSet> {
  sheets.iter().map(|sheet| import_sheet(file_name, sheet, ids)).collect()
}

/// Expand a multi-attempt record into one record per scramble sequence.
///
/// Attempt k gets a single scramble, the title suffix "Attempt k" and
/// `generated_attempt_number = attempt_number = k`. The first attempt keeps the
/// record's id; later attempts take fresh ones. Other events pass through.
pub fn split_if_multi_attempt(record: InternalScrambleSet, ids: &ScrambleSetIds) -> Vec<InternalScrambleSet> {
  if !record.event_id.is_multi_attempt() {
    return vec![record];
  }
  record
    .scrambles
    .iter()
    .enumerate()
    .map(|(i, sequence)| {
      let attempt = i as u32 + 1;
      InternalScrambleSet {
        id: if i == 0 { record.id } else { ids.next() },
        scrambles: vec![sequence.clone()],
        title: format!("{} Attempt {}", record.title, attempt),
        generated_attempt_number: Some(attempt),
        attempt_number: Some(attempt),
        ..record.clone()
      }
    })
    .collect()
}

/// Import a whole uploaded file into a pool entry.
/// `file_name` tags every record; callers usually pass the file's competition name.
/// Each sheet is split as soon as it is imported, so ids follow upload order.
#[instrument(level = "info", skip(file, ids), fields(%file_name, sheets = file.sheets.len()))]
pub fn import_uploaded_file(file_name: &str, file: &UploadedScrambleFile, ids: &ScrambleSetIds) -> UploadedGroup {
  let sheets: Vec<InternalScrambleSet> = file
    .sheets
    .iter()
    .flat_map(|sheet| split_if_multi_attempt(import_sheet(file_name, sheet, ids), ids))
    .collect();
  info!(target: "scrambles", %file_name, raw_sheets = file.sheets.len(), records = sheets.len(), "Imported scramble file");
  UploadedGroup { competition_name: file.competition_name.clone(), sheets }
}

/// Move the allocator past every id the client already holds, whether attached to
/// a round or still sitting in the uploaded pool.
pub fn observe_existing(ids: &ScrambleSetIds, competition: Option<&InternalCompetition>, pool: &[UploadedGroup]) {
  let attached = competition
    .into_iter()
    .flat_map(|c| c.events.iter())
    .flat_map(|e| e.rounds.iter())
    .flat_map(|r| r.scramble_sets.iter());
  let uploaded = pool.iter().flat_map(|g| g.sheets.iter());
  for set in attached.chain(uploaded) {
    ids.observe(set.id);
  }
}

/// Bring a competition file into internal form.
///
/// Rounds without `scrambleSets` already parse as empty. Sets that are present get
/// their event and round stamped from where they sit, and the allocator is moved
/// past their ids so new uploads can never collide with them.
///
/// Fewest-moves and multi-blind sets in interchange form (no attempt number) are
/// split back into one record per attempt, so exporting recombines them once.
/// Records that already carry an attempt number are kept as they are.
#[instrument(level = "info", skip_all, fields(events = wcif.events.len()))]
pub fn load_competition(wcif: &InternalCompetition, ids: &ScrambleSetIds) -> InternalCompetition {
  observe_existing(ids, Some(wcif), &[]);
  let mut existing = 0usize;
  let loaded: InternalCompetition = Competition::map_events(wcif, |event| {
    event.map_rounds(|index, round| {
      let number = round.number(index);
      round
        .scramble_sets
        .iter()
        .flat_map(|set| {
          existing += 1;
          let stamped = InternalScrambleSet { event_id: event.id.clone(), round_number: number, ..set.clone() };
          if stamped.attempt_number.is_some() {
            return vec![stamped];
          }
          let title = if stamped.title.is_empty() { round.id.clone() } else { stamped.title.clone() };
          split_if_multi_attempt(InternalScrambleSet { title, ..stamped }, ids)
        })
        .collect()
    })
  });
  debug!(target: "scrambles", existing_sets = existing, "Competition file loaded");
  loaded
}
