mod azure_event_handler;
mod github_event_handler;
mod health_handler;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::app_state::AppState;
use crate::error::{RelayError, RelayResult};
use crate::pipeline::PipelineRun;

use azure_event_handler::azure_event_handler;
use github_event_handler::github_event_handler;
use health_handler::health_handler;

pub const REQUEST_PROCESSED: &str = "Request processed";

pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new().route("/health", get(health_handler));

    if state.azure().is_some() {
        router = router.route("/api/azure-repos-events", post(azure_event_handler));
    }

    if state.github().is_some() {
        router = router
            .route("/api/github-events", post(github_event_handler))
            .route("/event", post(github_event_handler));
    }

    router.layer(Extension(state))
}

/// Maps a dispatch outcome to the webhook response.
///
/// Only bad input is surfaced to the sender. Dispatch failures were already
/// logged by the dispatcher and are still acknowledged so the sender does not
/// redeliver.
fn acknowledge(result: RelayResult<PipelineRun>) -> (StatusCode, String) {
    match result {
        Ok(_) => (StatusCode::OK, REQUEST_PROCESSED.to_string()),
        Err(e @ (RelayError::MalformedPayload(_) | RelayError::UnsupportedEventType(_))) => {
            tracing::warn!(error_kind = e.kind(), "Rejected webhook: {e}");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(_) => (StatusCode::OK, REQUEST_PROCESSED.to_string()),
    }
}
