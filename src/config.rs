//! Loading backend configuration from TOML.
//!
//! Every field is optional; a missing or unreadable file means defaults.
//!
//! ```toml
//! results_format_version = "WCA Competition 0.3"
//! scramble_program = "TNoodle-WCA-1.2.2"
//! require_complete_export = false
//! static_dir = "./static"
//! ```

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// `formatVersion` of results files when the caller does not send one.
  pub results_format_version: String,
  /// `scrambleProgram` written into results files.
  pub scramble_program: String,
  /// Refuse exports while any round is still without scramble sets.
  pub require_complete_export: bool,
  /// Front-end bundle served for non-API paths. None disables static serving.
  pub static_dir: Option<String>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      results_format_version: "WCA Competition 0.3".into(),
      scramble_program: "TNoodle-WCA-1.2.2".into(),
      require_complete_export: false,
      static_dir: Some("./static".into()),
    }
  }
}

pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Attempt to load `AppConfig` from SCRAMBLES_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("SCRAMBLES_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "scramble_match_backend", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "scramble_match_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "scramble_match_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
