//! HTTP route definitions

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::game::Snapshot;
use crate::http::protocol::{ArenaUpdate, ProtocolError};
use crate::util::time::{uptime_secs, Timer};

const GREETING: &str = "Let the battle begin!";

/// The game server expects an answer well inside its tick
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greeting_handler).post(decide_handler))
        .route("/health", get(health_handler).post(decide_handler))
        // The game server may post to any path registered for the bot
        .route("/*path", post(decide_handler))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn greeting_handler() -> &'static str {
    GREETING
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    decisions: u64,
    fallbacks: u64,
    target_policy: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        decisions: state.stats.decisions(),
        fallbacks: state.stats.fallbacks(),
        target_policy: state.engine.config().target_policy.as_str(),
    })
}

// ============================================================================
// Decision endpoint
// ============================================================================

/// Answer one arena update with a single action letter
async fn decide_handler(
    State(state): State<AppState>,
    payload: Result<Json<ArenaUpdate>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let Json(update) = payload?;
    let snapshot = Snapshot::try_from(update)?;

    let timer = Timer::new();
    let decision = state.decide(&snapshot);

    debug!(
        self_id = %snapshot.self_id,
        players = snapshot.arena.players.len(),
        action = %decision.action,
        fallback = decision.is_fallback(),
        elapsed_micros = timer.elapsed_micros(),
        "Decision made"
    );

    Ok(decision.action.as_str())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Rejected(#[from] JsonRejection),
}

impl From<ProtocolError> for AppError {
    fn from(err: ProtocolError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Rejected(rejection) => (rejection.status(), rejection.body_text()),
        };

        warn!(status = %status, error = %message, "Rejected arena update");

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Config {
            fallback_seed: Some(42),
            ..Config::default()
        }))
    }

    fn update(self_id: &str, me_heading: &str) -> Value {
        json!({
            "_links": { "self": { "href": self_id } },
            "arena": {
                "dims": [10, 10],
                "state": {
                    "me": { "x": 0, "y": 0, "direction": me_heading, "score": 0, "wasHit": false },
                    "target": { "x": 1, "y": 0, "direction": "N", "score": 5, "wasHit": false }
                }
            }
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn greets_on_root() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, GREETING);
    }

    #[tokio::test]
    async fn adjacent_target_holds() {
        let response = app().oneshot(post_json("/", &update("me", "E"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body_text(response).await, "T");
    }

    #[tokio::test]
    async fn any_path_is_accepted() {
        let response = app()
            .oneshot(post_json("/bots/some/deep/path", &update("me", "N")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "R");
    }

    #[tokio::test]
    async fn post_to_health_path_decides() {
        let response = app().oneshot(post_json("/health", &update("me", "E"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "T");
    }

    #[tokio::test]
    async fn score_tie_goes_to_first_listed_player() {
        // Raw body: a `Value` map would re-sort the keys
        let raw = r#"{
            "_links": { "self": { "href": "me" } },
            "arena": {
                "dims": [10, 10],
                "state": {
                    "me": { "x": 0, "y": 0, "direction": "E", "score": 0, "wasHit": false },
                    "zeta": { "x": 5, "y": 0, "direction": "N", "score": 5, "wasHit": false },
                    "alpha": { "x": 0, "y": 5, "direction": "N", "score": 5, "wasHit": false }
                }
            }
        }"#;
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "F");
    }

    #[tokio::test]
    async fn missing_self_still_answers() {
        let response = app().oneshot(post_json("/", &update("nobody", "E"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let action = body_text(response).await;
        assert!(["F", "R", "L", "T"].contains(&action.as_str()), "{action}");
    }

    #[tokio::test]
    async fn out_of_bounds_player_is_bad_request() {
        let mut body = update("me", "E");
        body["arena"]["state"]["target"]["y"] = json!(10);

        let response = app().oneshot(post_json("/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(error["error"].as_str().unwrap().contains("outside"));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn health_reports_counters() {
        let app = app();
        app.clone().oneshot(post_json("/", &update("me", "E"))).await.unwrap();
        app.clone().oneshot(post_json("/", &update("nobody", "E"))).await.unwrap();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["decisions"], 2);
        assert_eq!(health["fallbacks"], 1);
        assert_eq!(health["target_policy"], "highest_score");
    }
}
