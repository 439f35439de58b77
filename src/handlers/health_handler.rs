use std::sync::Arc;

use axum::{Extension, Json};
use serde_json::json;

use crate::app_state::AppState;

pub async fn health_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "azure": state.azure().is_some(),
        "github": state.github().is_some(),
    }))
}
