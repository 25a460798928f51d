use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::response::AppError;
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let processed = state.store.snapshot().await.map_err(|e| {
        error!(error = %e, "failed to read processed store");
        AppError::internal("processed store unavailable")
    })?;

    Ok(Json(SuccessResponse {
        success: true,
        data: processed,
    })
    .into_response())
}

pub async fn get_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Response, AppError> {
    let record = state.store.get(&word).await.map_err(|e| {
        error!(error = %e, word = %word, "failed to read processed store");
        AppError::internal("processed store unavailable")
    })?;

    match record {
        Some(record) => Ok(Json(SuccessResponse {
            success: true,
            data: record,
        })
        .into_response()),
        None => Err(AppError::not_found(format!("no entry for '{word}'"))),
    }
}
