use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::models::ProcessedRecord;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("candidate list contains a blank entry")]
    BlankCandidate,
}

/// Computes the pending work queue for a run.
///
/// Candidates are normalized to their trimmed lowercase form and
/// deduplicated; anything already present in `processed` is skipped.
/// The result is sorted lexicographically so runs are reproducible
/// regardless of the order the caller collected the words in.
pub fn build_pending_queue(
    candidates: &[String],
    processed: &HashMap<String, ProcessedRecord>,
) -> Result<Vec<String>, QueueError> {
    let mut pending = BTreeSet::new();

    for candidate in candidates {
        let normalized = candidate.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(QueueError::BlankCandidate);
        }
        if !processed.contains_key(&normalized) {
            pending.insert(normalized);
        }
    }

    Ok(pending.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str) -> ProcessedRecord {
        ProcessedRecord {
            word: word.to_string(),
            arabic_meaning: String::new(),
            definition: String::new(),
            part_of_speech: String::new(),
            derivatives: vec![],
            conjugation: vec![],
            synonyms: vec![],
            antonyms: vec![],
        }
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deduplicates_normalizes_and_sorts() {
        let pending = build_pending_queue(&words(&["Apple", "banana", "apple"]), &HashMap::new())
            .unwrap();
        assert_eq!(pending, vec!["apple", "banana"]);
    }

    #[test]
    fn test_skips_processed_words() {
        let mut processed = HashMap::new();
        processed.insert("y".to_string(), record("y"));

        let pending = build_pending_queue(&words(&["x", "y", "z"]), &processed).unwrap();
        assert_eq!(pending, vec!["x", "z"]);
    }

    #[test]
    fn test_trims_whitespace_before_matching() {
        let mut processed = HashMap::new();
        processed.insert("book".to_string(), record("book"));

        let pending = build_pending_queue(&words(&["  Book ", "pen"]), &processed).unwrap();
        assert_eq!(pending, vec!["pen"]);
    }

    #[test]
    fn test_blank_candidate_is_rejected() {
        let err = build_pending_queue(&words(&["apple", "   "]), &HashMap::new()).unwrap_err();
        assert!(matches!(err, QueueError::BlankCandidate));
    }

    #[test]
    fn test_empty_input_yields_empty_queue() {
        let pending = build_pending_queue(&[], &HashMap::new()).unwrap();
        assert!(pending.is_empty());
    }
}
