//! HTTP endpoint handlers. These are thin wrappers that forward to the pipeline.
//! Each handler is instrumented and logs basic request/result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::domain::WcifCompetition;
use crate::error::ApiError;
use crate::export::{competition_to_results, competition_to_wcif, ensure_exportable, ResultsFile};
use crate::import::{import_uploaded_file, load_competition, observe_existing};
use crate::matching::{auto_assign, available_for_event, clear_assignments, used_ids_for_event};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true, version: env!("CARGO_PKG_VERSION") })
}

#[instrument(level = "info", skip(state, body), fields(name = %body.wcif.name))]
pub async fn http_load_wcif(
  State(state): State<Arc<AppState>>,
  Json(body): Json<WcifIn>,
) -> Json<WcifOut> {
  let wcif = load_competition(&body.wcif, &state.ids);
  Json(WcifOut { wcif })
}

#[instrument(level = "info", skip(state, body), fields(competition = %body.file.competition_name, sheets = body.file.sheets.len()))]
pub async fn http_upload_scrambles(
  State(state): State<Arc<AppState>>,
  Json(body): Json<UploadIn>,
) -> Json<UploadOut> {
  observe_existing(&state.ids, body.wcif.as_ref(), &body.uploaded_scrambles);
  let file_name = body.file_name.as_deref().unwrap_or(&body.file.competition_name);
  let uploaded = import_uploaded_file(file_name, &body.file, &state.ids);
  Json(UploadOut { uploaded })
}

#[instrument(level = "info", skip(state, body), fields(name = %body.wcif.name, groups = body.uploaded_scrambles.len()))]
pub async fn http_assign_scrambles(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssignIn>,
) -> Json<WcifOut> {
  observe_existing(&state.ids, Some(&body.wcif), &body.uploaded_scrambles);
  let wcif = auto_assign(&body.wcif, &body.uploaded_scrambles);
  Json(WcifOut { wcif })
}

#[instrument(level = "info", skip(body), fields(name = %body.wcif.name))]
pub async fn http_clear_scrambles(Json(body): Json<WcifIn>) -> Json<WcifOut> {
  let wcif = clear_assignments(&body.wcif);
  info!(target: "scrambles", name = %wcif.name, "Scramble assignments cleared");
  Json(WcifOut { wcif })
}

#[instrument(level = "info", skip(body), fields(event = %body.event_id))]
pub async fn http_available_scrambles(Json(body): Json<AvailableIn>) -> Json<AvailableOut> {
  let used = used_ids_for_event(&body.wcif, &body.event_id);
  let scrambles = available_for_event(&body.uploaded_scrambles, &body.event_id, &used);
  Json(AvailableOut { scrambles })
}

#[instrument(level = "info", skip(state, body), fields(name = %body.wcif.name))]
pub async fn http_export_wcif(
  State(state): State<Arc<AppState>>,
  Json(body): Json<WcifIn>,
) -> Result<Json<WcifCompetition>, ApiError> {
  ensure_exportable(&body.wcif, state.config.require_complete_export)?;
  Ok(Json(competition_to_wcif(&body.wcif)))
}

#[instrument(level = "info", skip(state, body), fields(name = %body.wcif.name))]
pub async fn http_export_results(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ResultsIn>,
) -> Result<Json<ResultsFile>, ApiError> {
  ensure_exportable(&body.wcif, state.config.require_complete_export)?;
  let version = body.version.as_deref().unwrap_or(&state.config.results_format_version);
  Ok(Json(competition_to_results(&body.wcif, version, &state.config.scramble_program)))
}
