use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::Extension;

use super::acknowledge;
use crate::app_state::AppState;

pub async fn azure_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, String) {
    tracing::info!("Received azure webhook");

    let Some(dispatcher) = state.azure() else {
        return (StatusCode::NOT_FOUND, "Not found".to_string());
    };

    acknowledge(dispatcher.handle(&body).await)
}
