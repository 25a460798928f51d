//! Background word-processing pipeline.
//!
//! A single worker walks the pending word queue, asks the enrichment
//! service for a dictionary entry per word, persists each result through
//! the [`sink::ResultSink`] and broadcasts [`events::ProcessorEvent`]s to
//! whoever is listening. The worker honours pause/stop commands between
//! items; an in-flight enrichment call is always allowed to finish.

pub mod events;
pub mod progress;
pub mod queue;
pub mod runner;
pub mod sink;

use std::future::Future;

use thiserror::Error;

use crate::models::ProcessedRecord;

pub use events::ProcessorEvent;
pub use progress::ProgressSnapshot;
pub use queue::{build_pending_queue, QueueError};
pub use runner::{RunState, RunnerOptions, WordProcessor};
pub use sink::{PersistenceError, ResultSink};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment service not configured")]
    NotConfigured,
    #[error("enrichment request failed: {0}")]
    Request(String),
    #[error("malformed enrichment response: {0}")]
    MalformedResponse(String),
}

/// The external call that turns a word into a dictionary entry.
pub trait Enricher: Send + Sync + 'static {
    fn enrich(
        &self,
        word: &str,
    ) -> impl Future<Output = Result<ProcessedRecord, EnrichmentError>> + Send;
}
