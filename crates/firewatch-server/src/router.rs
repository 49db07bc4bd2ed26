//! Route table for the FireWatch HTTP facade.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the axum Router with all endpoints.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/chat/history/{user_id}", get(handlers::chat_history))
        .route("/get_locations", post(handlers::get_locations))
        .route("/draw_boxes_fire", post(handlers::draw_boxes_fire))
        .with_state(state)
}
