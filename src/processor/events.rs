use serde::Serialize;

use crate::models::ProcessedRecord;
use crate::processor::progress::ProgressSnapshot;

/// Messages the worker sends back to its controller.
///
/// Serialized as `{"type": ..., "payload": ...}` to match what the web
/// client already consumes. Exactly one of `DONE` or `STOPPED` closes
/// every run, and it is always the last event of that run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ProcessorEvent {
    #[serde(rename = "PROGRESS")]
    Progress(ProgressSnapshot),

    #[serde(rename = "WORD_PROCESSED")]
    WordProcessed(ProcessedRecord),

    #[serde(rename = "DONE")]
    Done,

    #[serde(rename = "STOPPED")]
    Stopped,
}

impl ProcessorEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ProcessorEvent::Progress(_) => "PROGRESS",
            ProcessorEvent::WordProcessed(_) => "WORD_PROCESSED",
            ProcessorEvent::Done => "DONE",
            ProcessorEvent::Stopped => "STOPPED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_wire_shape() {
        let event = ProcessorEvent::Progress(ProgressSnapshot::new(1, 4));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "PROGRESS");
        assert_eq!(value["payload"]["processed"], 1);
        assert_eq!(value["payload"]["total"], 4);
        assert_eq!(value["payload"]["progress"], 25.0);
    }

    #[test]
    fn test_terminal_events_carry_no_payload() {
        let value = serde_json::to_value(ProcessorEvent::Done).unwrap();
        assert_eq!(value["type"], "DONE");

        let value = serde_json::to_value(ProcessorEvent::Stopped).unwrap();
        assert_eq!(value["type"], "STOPPED");
    }
}
