pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::insights::handlers::handle_interview_questions;
use crate::matching::handlers::handle_analyze;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handle_analyze))
        .route("/interview-questions", post(handle_interview_questions))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
