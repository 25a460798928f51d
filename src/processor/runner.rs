use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::models::ProcessedRecord;
use crate::processor::events::ProcessorEvent;
use crate::processor::progress::ProgressSnapshot;
use crate::processor::queue::{build_pending_queue, QueueError};
use crate::processor::sink::ResultSink;
use crate::processor::Enricher;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default)]
struct ControlFlags {
    paused: bool,
    stop: bool,
}

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Upper bound on how long a stop issued while paused can go unnoticed.
    pub pause_poll: Duration,
    /// Courtesy delay between enrichment calls, zero disables it.
    pub item_delay: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            pause_poll: Duration::from_millis(200),
            item_delay: Duration::from_millis(250),
        }
    }
}

struct RunnerCore {
    state: RunState,
    /// Control channel of the current run. Each run gets its own channel
    /// so a stale worker can never pick up flags meant for a newer run.
    control: Option<watch::Sender<ControlFlags>>,
    generation: u64,
}

struct Inner<E, S> {
    enricher: E,
    sink: S,
    options: RunnerOptions,
    core: Mutex<RunnerCore>,
    events: broadcast::Sender<ProcessorEvent>,
}

/// The batch runner: owns the run lifecycle and the iteration cursor.
///
/// At most one item is ever in flight. `start` on a paused runner
/// resumes the existing run with its queue and cursor intact; `start`
/// after a stop (or on an idle runner) rebuilds the pending queue from
/// the processed snapshot the caller supplies.
pub struct WordProcessor<E, S> {
    inner: Arc<Inner<E, S>>,
}

impl<E, S> Clone for WordProcessor<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, S> WordProcessor<E, S>
where
    E: Enricher,
    S: ResultSink,
{
    pub fn new(enricher: E, sink: S, options: RunnerOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                enricher,
                sink,
                options,
                core: Mutex::new(RunnerCore {
                    state: RunState::Idle,
                    control: None,
                    generation: 0,
                }),
                events,
            }),
        }
    }

    pub fn state(&self) -> RunState {
        self.inner.core.lock().state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProcessorEvent> {
        self.inner.events.subscribe()
    }

    /// Starts a new run, or resumes the current one if it is paused.
    /// Calling `start` while already running is a no-op.
    pub fn start(
        &self,
        candidates: Vec<String>,
        processed: HashMap<String, ProcessedRecord>,
    ) -> Result<RunState, QueueError> {
        let mut core = self.inner.core.lock();
        match core.state {
            RunState::Running => Ok(RunState::Running),
            RunState::Paused => {
                if let Some(control) = &core.control {
                    control.send_modify(|flags| flags.paused = false);
                }
                core.state = RunState::Running;
                info!("batch run resumed");
                Ok(RunState::Running)
            }
            RunState::Idle | RunState::Stopped => {
                let queue = build_pending_queue(&candidates, &processed)?;
                let (control_tx, control_rx) = watch::channel(ControlFlags::default());
                core.generation += 1;
                core.control = Some(control_tx);
                core.state = RunState::Running;
                let generation = core.generation;
                info!(pending = queue.len(), "batch run started");

                let runner = self.clone();
                tokio::spawn(async move {
                    runner.run(queue, control_rx, generation).await;
                });
                Ok(RunState::Running)
            }
        }
    }

    /// Requests a pause. The in-flight item finishes first. Idempotent.
    pub fn pause(&self) -> RunState {
        let mut core = self.inner.core.lock();
        if core.state == RunState::Running {
            if let Some(control) = &core.control {
                control.send_modify(|flags| flags.paused = true);
            }
            core.state = RunState::Paused;
            info!("batch run pause requested");
        }
        core.state
    }

    /// Requests termination, unblocking any paused wait. Idempotent.
    pub fn stop(&self) -> RunState {
        let mut core = self.inner.core.lock();
        if matches!(core.state, RunState::Running | RunState::Paused) {
            if let Some(control) = &core.control {
                control.send_modify(|flags| {
                    flags.stop = true;
                    flags.paused = false;
                });
            }
            core.state = RunState::Stopped;
            info!("batch run stop requested");
        }
        core.state
    }

    async fn run(
        self,
        queue: Vec<String>,
        mut control: watch::Receiver<ControlFlags>,
        generation: u64,
    ) {
        let total = queue.len();
        if total == 0 {
            self.emit(ProcessorEvent::Progress(ProgressSnapshot::new(0, 0)));
            self.finish(generation, false);
            return;
        }

        let mut processed = 0usize;
        for word in &queue {
            if self.wait_while_paused(&mut control).await {
                self.finish(generation, true);
                return;
            }

            match self.inner.enricher.enrich(word).await {
                Ok(record) => match self.inner.sink.store(word, &record).await {
                    Ok(()) => {
                        debug!(word = %word, "word processed");
                        self.emit(ProcessorEvent::WordProcessed(record));
                    }
                    Err(e) => {
                        warn!(word = %word, error = %e, "failed to persist record");
                    }
                },
                Err(e) => {
                    warn!(word = %word, error = %e, "enrichment failed");
                }
            }

            processed += 1;
            self.emit(ProcessorEvent::Progress(ProgressSnapshot::new(
                processed, total,
            )));

            if processed < total && !self.inner.options.item_delay.is_zero() {
                // Cut the delay short as soon as a control signal arrives.
                tokio::select! {
                    _ = control.changed() => {}
                    _ = sleep(self.inner.options.item_delay) => {}
                }
            }
        }

        // A stop that landed while the final item was in flight still
        // wins: the item's result was persisted and reported above, but
        // the run ends as stopped.
        let stopped = control.borrow().stop;
        self.finish(generation, stopped);
    }

    /// Blocks cooperatively while the run is paused.
    /// Returns `true` when a stop was requested.
    async fn wait_while_paused(&self, control: &mut watch::Receiver<ControlFlags>) -> bool {
        loop {
            let flags = *control.borrow();
            if flags.stop {
                return true;
            }
            if !flags.paused {
                return false;
            }
            tokio::select! {
                _ = control.changed() => {}
                _ = sleep(self.inner.options.pause_poll) => {}
            }
        }
    }

    fn finish(&self, generation: u64, stopped: bool) {
        {
            let mut core = self.inner.core.lock();
            // A newer run may already own the state; leave it alone then.
            if core.generation == generation {
                core.state = if stopped {
                    RunState::Stopped
                } else {
                    RunState::Idle
                };
                core.control = None;
            }
        }

        if stopped {
            self.emit(ProcessorEvent::Stopped);
            info!("batch run stopped");
        } else {
            self.emit(ProcessorEvent::Done);
            info!("batch run complete");
        }
    }

    fn emit(&self, event: ProcessorEvent) {
        if self.inner.events.send(event).is_err() {
            debug!("no event subscribers");
        }
    }
}
