use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::Extension;

use super::acknowledge;
use crate::app_state::AppState;
use crate::webhook_payloads::github::EVENT_HEADER;

pub async fn github_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let event_type = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok());
    tracing::info!("Received github webhook {}", event_type.unwrap_or("without event type"));

    let Some(dispatcher) = state.github() else {
        return (StatusCode::NOT_FOUND, "Not found".to_string());
    };

    acknowledge(dispatcher.handle(event_type, &body).await)
}
