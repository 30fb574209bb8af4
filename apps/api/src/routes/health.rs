use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "advisor-api",
        "advisor_enabled": state.advisor.is_some(),
        "catalog_fields": state.catalog.len(),
        "active_sessions": state.sessions.len().await,
    }))
}
