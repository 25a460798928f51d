mod dictionary;
mod health;
mod processor;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/processor/start", post(processor::start))
        .route("/api/processor/pause", post(processor::pause))
        .route("/api/processor/stop", post(processor::stop))
        .route("/api/processor/status", get(processor::status))
        .route("/api/processor/events", get(processor::events))
        .route("/api/dictionary", get(dictionary::list))
        .route("/api/dictionary/:word", get(dictionary::get_word))
        .with_state(state)
}
