//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
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
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .route("/api/v1/health", get(http::http_health))
        // Cases, shuffling, stateless scoring
        .route("/api/v1/cases", get(http::http_list_cases))
        .route("/api/v1/cases/:id/shuffle", get(http::http_shuffle))
        .route("/api/v1/reasoning/evaluate", post(http::http_evaluate))
        .route("/api/v1/scoring/study", post(http::http_score_study))
        .route("/api/v1/scoring/versus", post(http::http_score_versus))
        // Study
        .route("/api/v1/study", post(http::http_new_study))
        .route("/api/v1/study/:id", get(http::http_get_study).delete(http::http_leave_study))
        .route("/api/v1/study/:id/select", post(http::http_study_select))
        .route("/api/v1/study/:id/explain", post(http::http_study_explain))
        .route("/api/v1/study/:id/lock", post(http::http_study_lock))
        .route("/api/v1/study/:id/next", post(http::http_study_next))
        .route("/api/v1/study/:id/restart", post(http::http_study_restart))
        .route("/api/v1/study/:id/breakdown", get(http::http_study_breakdown))
        // Versus
        .route("/api/v1/versus", post(http::http_new_versus))
        .route("/api/v1/versus/players/:slot/name", put(http::http_set_player_name))
        .route("/api/v1/versus/:id", get(http::http_get_versus).delete(http::http_leave_versus))
        .route("/api/v1/versus/:id/start", post(http::http_versus_start))
        .route("/api/v1/versus/:id/confidence", post(http::http_versus_confidence))
        .route("/api/v1/versus/:id/select", post(http::http_versus_select))
        .route("/api/v1/versus/:id/confirm", post(http::http_versus_confirm))
        .route("/api/v1/versus/:id/next", post(http::http_versus_next))
        .route("/api/v1/versus/:id/player-b", post(http::http_versus_player_b))
        .route("/api/v1/versus/:id/restart", post(http::http_versus_restart))
        // Settings
        .route("/api/v1/settings/theme", get(http::http_get_theme).put(http::http_put_theme))
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
        )
        .fallback_service(static_service)
}
