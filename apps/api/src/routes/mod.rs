pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match/score", post(handlers::handle_score))
        .route("/api/v1/match/justify", post(handlers::handle_justify))
        .route("/api/v1/match/team", post(handlers::handle_team))
        .route(
            "/api/v1/match/entanglement",
            post(handlers::handle_entanglement),
        )
        .route(
            "/api/v1/match/learning-path",
            post(handlers::handle_learning_path),
        )
        // Resume API
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .with_state(state)
}
