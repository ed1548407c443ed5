//! Application state shared by all handlers.
//!
//! Competition files and uploaded scramble pools live with the client and travel
//! with each request. The only thing the server keeps is the scramble-set id
//! allocator (plus read-only config).

use tracing::{info, instrument};

use crate::config::{load_config_from_env, AppConfig};
use crate::ids::ScrambleSetIds;

#[derive(Debug, Default)]
pub struct AppState {
    pub ids: ScrambleSetIds,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from env: config file if any, fresh id allocator.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_config_from_env().unwrap_or_default();
        info!(
            target: "scramble_match_backend",
            results_format_version = %config.results_format_version,
            require_complete_export = config.require_complete_export,
            static_dir = ?config.static_dir,
            "Configuration ready"
        );
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { ids: ScrambleSetIds::new(), config }
    }
}
