#![allow(dead_code)]

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::time::timeout;

use mufradat_backend::db::{self, DictionaryStore};
use mufradat_backend::models::ProcessedRecord;
use mufradat_backend::processor::{
    Enricher, EnrichmentError, ProcessorEvent, RunnerOptions, WordProcessor,
};
use mufradat_backend::services::enrichment::DictionaryEnricher;
use mufradat_backend::state::AppState;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Scripted enrichment service: succeeds with a canned record unless the
/// word is on the failure list, and remembers every word it was asked for.
#[derive(Clone)]
pub struct MockEnricher {
    fail: HashSet<String>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEnricher {
    pub fn new() -> Self {
        Self {
            fail: HashSet::new(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_on(words: &[&str]) -> Self {
        let mut mock = Self::new();
        mock.fail = words.iter().map(|w| w.to_string()).collect();
        mock
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Enricher for MockEnricher {
    fn enrich(
        &self,
        word: &str,
    ) -> impl Future<Output = Result<ProcessedRecord, EnrichmentError>> + Send {
        let fail = self.fail.contains(word);
        let delay = self.delay;
        let calls = Arc::clone(&self.calls);
        let word = word.to_string();

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            calls.lock().unwrap().push(word.clone());
            if fail {
                Err(EnrichmentError::Request(format!("mock failure for {word}")))
            } else {
                Ok(sample_record(&word))
            }
        }
    }
}

pub fn sample_record(word: &str) -> ProcessedRecord {
    ProcessedRecord {
        word: word.to_string(),
        arabic_meaning: format!("معنى {word}"),
        definition: format!("definition of {word}"),
        part_of_speech: "Noun".to_string(),
        derivatives: vec![],
        conjugation: vec![],
        synonyms: vec![],
        antonyms: vec![],
    }
}

pub fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fast runner settings so the suites never sit in real-world delays.
pub fn test_options() -> RunnerOptions {
    RunnerOptions {
        pause_poll: Duration::from_millis(20),
        item_delay: Duration::ZERO,
    }
}

pub async fn temp_store() -> (DictionaryStore, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("dictionary.db").display());
    let pool = db::connect(&url).await.expect("open sqlite");
    let store = DictionaryStore::init(pool).await.expect("init store");
    (store, dir)
}

pub fn test_processor(
    enricher: MockEnricher,
    store: DictionaryStore,
) -> WordProcessor<MockEnricher, DictionaryStore> {
    WordProcessor::new(enricher, store, test_options())
}

pub async fn recv_event(rx: &mut broadcast::Receiver<ProcessorEvent>) -> ProcessorEvent {
    timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Drains events until the terminal DONE/STOPPED arrives, inclusive.
pub async fn collect_run_events(
    rx: &mut broadcast::Receiver<ProcessorEvent>,
) -> Vec<ProcessorEvent> {
    let mut events = Vec::new();
    loop {
        let event = recv_event(rx).await;
        let terminal = matches!(event, ProcessorEvent::Done | ProcessorEvent::Stopped);
        events.push(event);
        if terminal {
            return events;
        }
    }
}

pub async fn create_test_app() -> (Router, TempDir) {
    let (store, dir) = temp_store().await;
    let processor = WordProcessor::new(
        DictionaryEnricher::from_env(),
        store.clone(),
        test_options(),
    );
    let state = AppState::new(processor, store);
    (mufradat_backend::routes::router(state), dir)
}
