//! API Routes for Trainstore
//!
//! This module combines all API routes into a single router.
//!
//! Route structure:
//! - /api/classes/:class_id/students/:student_id/projects/* - student
//!   project and training data operations (auth required)
//! - /health - liveness check (public)

mod projects;
mod training;

use axum::{routing::get, Json, Router};

use crate::middleware::require_auth;
use crate::AppState;

/// Build the complete API router.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/classes/:class_id/students/:student_id/projects",
            protected_routes(state),
        )
}

/// Student-scoped routes that require a resolved caller identity.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(projects::routes())
        .merge(training::routes())
        .layer(axum::middleware::from_fn_with_state(state, require_auth))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
