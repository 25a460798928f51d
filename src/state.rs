use std::time::Instant;

use crate::db::DictionaryStore;
use crate::processor::WordProcessor;
use crate::services::enrichment::DictionaryEnricher;

pub type DictionaryProcessor = WordProcessor<DictionaryEnricher, DictionaryStore>;

#[derive(Clone)]
pub struct AppState {
    pub processor: DictionaryProcessor,
    pub store: DictionaryStore,
    started_at: Instant,
}

impl AppState {
    pub fn new(processor: DictionaryProcessor, store: DictionaryStore) -> Self {
        Self {
            processor,
            store,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
