//! Axum router construction for the relay server.
//!
//! Assembles the liveness route, the `WebSocket` endpoint, and the
//! optional static frontend mount into a single [`Router`] with CORS
//! and request tracing.

use std::sync::Arc;

use axum::Json;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the relay server.
///
/// Routes:
/// - `GET /` — liveness JSON
/// - `GET /ws` — `WebSocket` chat transport
/// - `GET /app/*` — static frontend bundle with SPA fallback to
///   `index.html` (only when `static_dir` is configured)
pub fn build_router(config: &ServerConfig, state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws::ws_chat));

    if let Some(dir) = &config.static_dir {
        // Unmatched paths under the mount fall back to index.html so
        // client-side routes deep-link correctly.
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.nest_service("/app", spa);
    }

    router
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness route: confirms the relay is up.
async fn index() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "parley relay server running" }))
}

/// Build the CORS layer from the configured origin allow-list.
///
/// A wildcard list allows any origin but cannot carry credentials (the
/// CORS spec forbids `*` with `Access-Control-Allow-Credentials`).
/// Explicit origins get credentials, with methods and headers mirrored
/// from the request, which is the credential-compatible spelling of
/// "allow everything".
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.wildcard_origins() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse().map_or_else(
                |_| {
                    warn!(%origin, "ignoring unparsable CORS origin");
                    None
                },
                Some,
            )
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
