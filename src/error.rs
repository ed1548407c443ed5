//! API errors and their JSON rendering: `{ "error": { "code", "message" } }`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{} round(s) have no scramble sets: {}", .rounds.len(), .rounds.join(", "))]
  ExportUnavailable { rounds: Vec<String> },
}

impl ApiError {
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::ExportUnavailable { .. } => "export_unavailable",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::ExportUnavailable { .. } => StatusCode::CONFLICT,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> axum::response::Response {
    let body = json!({ "error": { "code": self.code(), "message": self.to_string() } });
    (self.status(), Json(body)).into_response()
  }
}
