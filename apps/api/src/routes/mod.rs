pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advising::handlers as advising;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API (pure, no LLM)
        .route("/api/v1/catalog", get(recommendation::handle_get_catalog))
        .route(
            "/api/v1/recommendations",
            post(recommendation::handle_recommend),
        )
        // Sessions & chat
        .route("/api/v1/sessions", post(advising::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(advising::handle_get_session).delete(advising::handle_delete_session),
        )
        .route("/api/v1/chat", post(advising::handle_chat))
        .route("/api/v1/quick-actions", get(advising::handle_quick_actions))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
