//! HTTP handlers for snapshot ingest.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use gsibridge_gamestate::GameState;
use gsibridge_mqtt::MqttPublisher;

/// Application state shared by all in-flight requests.
pub struct AppState {
    pub publisher: MqttPublisher,
}

/// Creates the ingest router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(snapshot_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness probe.
async fn health_handler() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// Receives one game-state snapshot from the client.
///
/// The body is read as raw bytes rather than a typed extractor so that
/// unreadable JSON gets the same error envelope as a validation
/// failure. Nothing is published for a rejected snapshot.
async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<StatusResponse>) {
    let snapshot: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("unreadable snapshot body: {e}");
            return error_response(format!("invalid JSON body: {e}"));
        }
    };

    let game_state = match GameState::from_snapshot(snapshot) {
        Ok(gs) => gs,
        Err(e) => {
            warn!("rejected snapshot: {e}");
            return error_response(e.to_string());
        }
    };

    debug!(
        map = game_state.map.is_some(),
        player = game_state.player.is_some(),
        hero = game_state.hero.is_some(),
        "snapshot accepted"
    );
    state.publisher.publish_state(&game_state).await;

    (StatusCode::OK, Json(StatusResponse::ok()))
}

fn error_response(message: String) -> (StatusCode, Json<StatusResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusResponse::error(message)),
    )
}
