//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - JSON API under `/api/v1/...`
/// - front-end bundle from `static_dir` with index fallback, when configured
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/wcif/load", post(http::http_load_wcif))
        .route("/api/v1/scrambles/upload", post(http::http_upload_scrambles))
        .route("/api/v1/scrambles/assign", post(http::http_assign_scrambles))
        .route("/api/v1/scrambles/clear", post(http::http_clear_scrambles))
        .route("/api/v1/scrambles/available", post(http::http_available_scrambles))
        .route("/api/v1/export/wcif", post(http::http_export_wcif))
        .route("/api/v1/export/results", post(http::http_export_results))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    match static_dir {
        Some(dir) => {
            let index = format!("{}/index.html", dir.trim_end_matches('/'));
            let static_service = ServeDir::new(&dir)
                .append_index_html_on_directories(true)
                .not_found_service(ServeFile::new(index));
            router.fallback_service(static_service)
        }
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(config: AppConfig) -> Router {
        let config = AppConfig { static_dir: None, ..config };
        build_router(Arc::new(AppState::with_config(config)))
    }

    async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn wcif() -> Value {
        json!({
            "formatVersion": "1.0",
            "id": "Open2024",
            "name": "Open 2024",
            "events": [
                { "id": "333", "rounds": [{ "id": "333-r1" }, { "id": "333-r2" }] },
                { "id": "333mbf", "rounds": [{ "id": "333mbf-r1" }] }
            ]
        })
    }

    fn tnoodle() -> Value {
        json!({
            "competitionName": "Open 2024",
            "sheets": [
                { "event": "333", "round": 1, "title": "3x3 Round 1", "scrambles": ["R U", "F2"], "extraScrambles": ["L"] },
                { "event": "333mbf", "round": 1, "title": "MBLD", "scrambles": ["M1", "M2"] }
            ]
        })
    }

    #[tokio::test]
    async fn health() {
        let app = app(AppConfig::default());
        let req = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upload_assign_export_flow() {
        let app = app(AppConfig::default());

        let (status, loaded) = post_json(&app, "/api/v1/wcif/load", json!({ "wcif": wcif() })).await;
        assert_eq!(status, StatusCode::OK);

        let (status, uploaded) = post_json(&app, "/api/v1/scrambles/upload", json!({ "file": tnoodle() })).await;
        assert_eq!(status, StatusCode::OK);
        let group = &uploaded["uploaded"];
        assert_eq!(group["sheets"].as_array().unwrap().len(), 3);
        assert_eq!(group["sheets"][1]["title"], "MBLD Attempt 1");
        assert_eq!(group["sheets"][0]["sheetName"], "Open 2024");

        let (status, assigned) = post_json(
            &app,
            "/api/v1/scrambles/assign",
            json!({ "wcif": loaded["wcif"], "uploadedScrambles": [group] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rounds = &assigned["wcif"]["events"][0]["rounds"];
        assert_eq!(rounds[0]["scrambleSets"].as_array().unwrap().len(), 1);
        assert_eq!(rounds[1]["scrambleSets"], json!([]));

        let (status, exported) = post_json(&app, "/api/v1/export/wcif", json!({ "wcif": assigned["wcif"] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["formatVersion"], "1.0");
        let set = &exported["events"][0]["rounds"][0]["scrambleSets"][0];
        assert_eq!(set["scrambles"], json!(["R U", "F2"]));
        assert_eq!(set["extraScrambles"], json!(["L"]));
        assert!(set.get("sheetName").is_none());
        assert_eq!(
            exported["events"][1]["rounds"][0]["scrambleSets"][0]["scrambles"],
            json!(["M1", "M2"])
        );

        let (status, results) = post_json(
            &app,
            "/api/v1/export/results",
            json!({ "wcif": assigned["wcif"], "version": "WCA Competition 0.2" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["formatVersion"], "WCA Competition 0.2");
        assert_eq!(results["events"][0]["rounds"][0]["groups"][0]["group"], "A");

        let (status, cleared) = post_json(&app, "/api/v1/scrambles/clear", json!({ "wcif": assigned["wcif"] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["wcif"]["events"][0]["rounds"][0]["scrambleSets"], json!([]));
        assert_eq!(cleared["wcif"]["id"], "Open2024");
    }

    #[tokio::test]
    async fn file_name_overrides_sheet_name() {
        let app = app(AppConfig::default());
        let (_, uploaded) = post_json(
            &app,
            "/api/v1/scrambles/upload",
            json!({ "fileName": "backup.json", "file": tnoodle() }),
        )
        .await;
        assert_eq!(uploaded["uploaded"]["sheets"][0]["sheetName"], "backup.json");
        assert_eq!(uploaded["uploaded"]["competitionName"], "Open 2024");
    }

    #[tokio::test]
    async fn ids_held_by_client_survive_a_restart() {
        let comp = json!({
            "name": "Restart",
            "events": [{ "id": "333", "rounds": [{ "id": "333-r1" }, { "id": "333-r2" }] }]
        });
        let first_file = json!({ "competitionName": "A", "sheets": [{ "event": "333", "round": 1, "scrambles": ["R"] }] });
        let second_file = json!({ "competitionName": "B", "sheets": [{ "event": "333", "round": 2, "scrambles": ["U"] }] });

        let before = app(AppConfig::default());
        let (_, first) = post_json(&before, "/api/v1/scrambles/upload", json!({ "file": first_file })).await;
        let (_, assigned) = post_json(
            &before,
            "/api/v1/scrambles/assign",
            json!({ "wcif": comp, "uploadedScrambles": [first["uploaded"]] }),
        )
        .await;

        // Fresh state: the allocator starts over at 1.
        let after = app(AppConfig::default());
        let (_, second) = post_json(
            &after,
            "/api/v1/scrambles/upload",
            json!({ "file": second_file, "wcif": assigned["wcif"], "uploadedScrambles": [first["uploaded"]] }),
        )
        .await;
        assert_ne!(second["uploaded"]["sheets"][0]["id"], first["uploaded"]["sheets"][0]["id"]);

        let (_, reassigned) = post_json(
            &after,
            "/api/v1/scrambles/assign",
            json!({ "wcif": assigned["wcif"], "uploadedScrambles": [first["uploaded"], second["uploaded"]] }),
        )
        .await;
        let rounds = &reassigned["wcif"]["events"][0]["rounds"];
        assert_eq!(rounds[0]["scrambleSets"][0]["scrambles"], json!(["R"]));
        assert_eq!(rounds[1]["scrambleSets"].as_array().unwrap().len(), 1);
        assert_eq!(rounds[1]["scrambleSets"][0]["scrambles"], json!(["U"]));
    }

    #[tokio::test]
    async fn available_lists_unused_sheets() {
        let app = app(AppConfig::default());
        let (_, uploaded) = post_json(&app, "/api/v1/scrambles/upload", json!({ "file": tnoodle() })).await;
        let (status, available) = post_json(
            &app,
            "/api/v1/scrambles/available",
            json!({ "wcif": wcif(), "uploadedScrambles": [uploaded["uploaded"]], "eventId": "333mbf" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(available["scrambles"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn export_check_is_off_by_default() {
        let app = app(AppConfig::default());
        let (status, _) = post_json(&app, "/api/v1/export/wcif", json!({ "wcif": wcif() })).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn export_check_rejects_unassigned_rounds_when_enabled() {
        let app = app(AppConfig { require_complete_export: true, ..AppConfig::default() });
        let (status, body) = post_json(&app, "/api/v1/export/results", json!({ "wcif": wcif() })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "export_unavailable");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let app = app(AppConfig::default());
        let (status, _) = post_json(&app, "/api/v1/scrambles/assign", json!({ "nope": 1 })).await;
        assert!(status.is_client_error());
    }
}
