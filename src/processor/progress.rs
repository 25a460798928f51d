use serde::{Deserialize, Serialize};

/// Point-in-time view of a run, recomputed after every item.
///
/// An empty queue reports 100% so the UI can treat the run as complete
/// the moment it starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub progress: f64,
    pub processed: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn new(processed: usize, total: usize) -> Self {
        let progress = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        Self {
            progress,
            processed,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_is_fraction_of_total() {
        let snapshot = ProgressSnapshot::new(1, 2);
        assert_eq!(snapshot.progress, 50.0);
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.total, 2);

        assert_eq!(ProgressSnapshot::new(2, 2).progress, 100.0);
    }

    #[test]
    fn test_empty_queue_reports_complete() {
        let snapshot = ProgressSnapshot::new(0, 0);
        assert_eq!(snapshot.progress, 100.0);
        assert_eq!(snapshot.processed, 0);
        assert_eq!(snapshot.total, 0);
    }
}
