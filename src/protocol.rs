//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{EventId, InternalCompetition, InternalScrambleSet, UploadedGroup, UploadedScrambleFile};

#[derive(Debug, Deserialize)]
pub struct WcifIn {
    pub wcif: InternalCompetition,
}

#[derive(Debug, Serialize)]
pub struct WcifOut {
    pub wcif: InternalCompetition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadIn {
    /// Tag stamped on every imported sheet; defaults to the file's competition name.
    #[serde(default)]
    pub file_name: Option<String>,
    pub file: UploadedScrambleFile,
    /// What the client already holds. Its ids are reserved before importing, so a
    /// restarted server never hands them out again.
    #[serde(default)]
    pub wcif: Option<InternalCompetition>,
    #[serde(default)]
    pub uploaded_scrambles: Vec<UploadedGroup>,
}

#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub uploaded: UploadedGroup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignIn {
    pub wcif: InternalCompetition,
    #[serde(default)]
    pub uploaded_scrambles: Vec<UploadedGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableIn {
    pub wcif: InternalCompetition,
    #[serde(default)]
    pub uploaded_scrambles: Vec<UploadedGroup>,
    pub event_id: EventId,
}

#[derive(Debug, Serialize)]
pub struct AvailableOut {
    pub scrambles: Vec<InternalScrambleSet>,
}

#[derive(Debug, Deserialize)]
pub struct ResultsIn {
    pub wcif: InternalCompetition,
    /// `formatVersion` for the results file; the configured default when absent.
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub version: &'static str,
}
