use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tracing::error;

use crate::processor::RunState;
use crate::response::AppError;
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartRequest {
    candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateResponse {
    state: RunState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    state: RunState,
    stored_words: i64,
}

fn state_response(state: RunState) -> Response {
    Json(SuccessResponse {
        success: true,
        data: StateResponse { state },
    })
    .into_response()
}

pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Response, AppError> {
    let processed = state.store.snapshot().await.map_err(|e| {
        error!(error = %e, "failed to read processed store");
        AppError::internal("processed store unavailable")
    })?;

    let run_state = state
        .processor
        .start(req.candidates, processed)
        .map_err(|e| AppError::validation(e.to_string()))?;

    Ok(state_response(run_state))
}

pub async fn pause(State(state): State<AppState>) -> Response {
    state_response(state.processor.pause())
}

pub async fn stop(State(state): State<AppState>) -> Response {
    state_response(state.processor.stop())
}

pub async fn status(State(state): State<AppState>) -> Result<Response, AppError> {
    let stored_words = state.store.count().await.map_err(|e| {
        error!(error = %e, "failed to count stored words");
        AppError::internal("processed store unavailable")
    })?;

    Ok(Json(SuccessResponse {
        success: true,
        data: StatusResponse {
            state: state.processor.state(),
            stored_words,
        },
    })
    .into_response())
}

/// Live event feed for the controller UI. Lagged subscribers silently
/// drop the events they missed; the next PROGRESS resynchronizes them.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.processor.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(event) => match Event::default()
                .event(event.event_type())
                .json_data(&event)
            {
                Ok(sse_event) => Some(Ok(sse_event)),
                Err(_) => None,
            },
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
