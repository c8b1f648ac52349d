//! Timer-driven rotator task.
//!
//! [`TextRotator::start`] spawns one tokio task that owns a [`Rotator`]
//! and loops: sleep for the pending delay, apply one tick, hand the
//! visible text to the consumer. The returned [`RotatorHandle`] cancels the
//! loop through a [`CancellationToken`].
//!
//! The token only wakes the sleeping task. Whether a tick may still deliver
//! is decided by a stop gate shared by the task and the handle: the task
//! holds the gate across the check and the callback, and `stop` flips it
//! under the same lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::error::RotatorError;
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;
use crate::scheduler::{Scheduler, TokioScheduler};

use super::engine::Rotator;
use super::phrases::PhraseList;
use super::state::TickKind;
use super::timing::Timing;

/// Counters collected over one rotator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks applied.
    pub ticks: u64,
    /// Updates delivered to the consumer.
    pub emissions: u64,
    /// Phrases typed out in full.
    pub phrases_completed: u64,
    /// Complete passes through the phrase list.
    pub cycles: u64,
}

/// Builder for a running rotation.
pub struct TextRotator {
    phrases: PhraseList,
    timing: Timing,
    scheduler: Arc<dyn Scheduler>,
    events: Option<Arc<EventEmitter>>,
}

impl std::fmt::Debug for TextRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRotator")
            .field("phrases", &self.phrases.len())
            .field("timing", &self.timing)
            .field("scheduler", &self.scheduler.name())
            .finish_non_exhaustive()
    }
}

impl TextRotator {
    /// Creates a rotator with default timing and the tokio scheduler.
    #[must_use]
    pub fn new(phrases: PhraseList) -> Self {
        Self {
            phrases,
            timing: Timing::default(),
            scheduler: Arc::new(TokioScheduler),
            events: None,
        }
    }

    /// Overrides the tick delays.
    #[must_use]
    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replaces the scheduler that provides the delays.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: impl Scheduler) -> Self {
        self.scheduler = Arc::new(scheduler);
        self
    }

    /// Emits phrase lifecycle events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Spawns the rotation loop on the current tokio runtime.
    ///
    /// `on_update` receives the visible text after every emitting tick, in
    /// order, from a single task. It must not block, and must not call
    /// [`RotatorHandle::stop`] on its own rotator: `stop` waits for a running
    /// callback to return.
    ///
    /// # Errors
    ///
    /// Returns [`RotatorError::NoRuntime`] when called outside a tokio
    /// runtime. Nothing is scheduled in that case.
    pub fn start<F>(self, on_update: F) -> Result<RotatorHandle, RotatorError>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RotatorError::NoRuntime)?;

        info!(
            phrases = self.phrases.len(),
            scheduler = self.scheduler.name(),
            type_delay = %humantime::format_duration(self.timing.type_delay),
            hold_delay = %humantime::format_duration(self.timing.hold_delay),
            delete_delay = %humantime::format_duration(self.timing.delete_delay),
            "text rotator started"
        );
        if let Some(events) = &self.events {
            events.emit(Event::RotatorStarted {
                timestamp: Utc::now(),
                phrase_count: self.phrases.len(),
                scheduler: self.scheduler.name().to_owned(),
            });
        }

        let cancel = CancellationToken::new();
        let gate = StopGate::default();
        let rotator = Rotator::new(self.phrases, self.timing);
        let task = runtime.spawn(run_loop(
            rotator,
            self.scheduler,
            cancel.clone(),
            gate.clone(),
            self.events,
            on_update,
        ));

        Ok(RotatorHandle {
            cancel,
            gate,
            task: Some(task),
        })
    }
}

/// Starts a rotation over `phrases` with default timing.
///
/// # Errors
///
/// Returns [`RotatorError::InvalidArgument`] if `phrases` is empty and
/// [`RotatorError::NoRuntime`] outside a tokio runtime. Nothing is
/// scheduled on error.
pub fn start<I, S, F>(phrases: I, on_update: F) -> Result<RotatorHandle, RotatorError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: FnMut(&str) + Send + 'static,
{
    TextRotator::new(PhraseList::new(phrases)?).start(on_update)
}

/// Flag deciding whether ticks may still reach the consumer.
#[derive(Debug, Clone, Default)]
struct StopGate(Arc<Mutex<bool>>);

impl StopGate {
    /// A poisoned gate only means a callback panicked while holding it;
    /// the flag itself is still meaningful.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the flag, waiting for an in-flight callback. Returns `true` on
    /// the first call.
    fn close(&self) -> bool {
        let mut stopped = self.lock();
        !std::mem::replace(&mut *stopped, true)
    }

    fn is_closed(&self) -> bool {
        *self.lock()
    }
}

/// Handle to a running rotation.
///
/// Dropping the handle stops the rotation.
#[must_use = "dropping the handle stops the rotator"]
#[derive(Debug)]
pub struct RotatorHandle {
    cancel: CancellationToken,
    gate: StopGate,
    task: Option<JoinHandle<RunSummary>>,
}

impl RotatorHandle {
    /// Stops the rotation. No update is delivered after this returns, on any
    /// runtime flavor: a callback already running is waited for.
    ///
    /// Idempotent.
    pub fn stop(&self) {
        if self.gate.close() {
            debug!("text rotator stop requested");
        }
        self.cancel.cancel();
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.gate.is_closed()
    }

    /// Stops the rotation and waits for the task to exit.
    ///
    /// # Panics
    ///
    /// Re-raises a panic that occurred inside the update callback.
    pub async fn shutdown(mut self) -> RunSummary {
        self.stop();
        let Some(task) = self.task.take() else {
            return RunSummary::default();
        };
        match task.await {
            Ok(summary) => summary,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => RunSummary::default(),
        }
    }
}

impl Drop for RotatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop<F>(
    mut rotator: Rotator,
    scheduler: Arc<dyn Scheduler>,
    cancel: CancellationToken,
    gate: StopGate,
    events: Option<Arc<EventEmitter>>,
    mut on_update: F,
) -> RunSummary
where
    F: FnMut(&str) + Send + 'static,
{
    let mut summary = RunSummary::default();
    let _active = metrics::track_active_rotator();

    loop {
        let delay = rotator.next_delay();
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = scheduler.sleep(delay) => {}
        }

        let (kind, from_index, to_index) = {
            let stopped = gate.lock();
            // stop() can land after the timer fired but before this tick runs
            if *stopped {
                break;
            }

            let from_index = rotator.state().phrase_index();
            let tick = rotator.tick();
            let (kind, to_index) = (tick.kind, tick.phrase_index);
            if let Some(text) = tick.text {
                trace!(kind = kind.as_str(), phrase_index = to_index, text, "tick");
                on_update(text);
                summary.emissions += 1;
                metrics::record_emission();
            }
            (kind, from_index, to_index)
        };
        metrics::record_tick(kind);
        summary.ticks += 1;
        metrics::set_visible_length(rotator.state().visible_len());

        match kind {
            TickKind::Hold => {
                summary.phrases_completed += 1;
                metrics::record_phrase_completed();
                debug!(phrase_index = to_index, "phrase fully typed");
                if let Some(events) = &events {
                    events.emit(Event::PhraseTyped {
                        timestamp: Utc::now(),
                        phrase_index: to_index,
                        phrase: rotator.phrases().get(to_index).to_owned(),
                    });
                }
            }
            TickKind::Advance => {
                if to_index == 0 {
                    metrics::record_cycle();
                }
                debug!(from_index, to_index, "advanced to next phrase");
                if let Some(events) = &events {
                    events.emit(Event::PhraseAdvanced {
                        timestamp: Utc::now(),
                        from_index,
                        to_index,
                        cycles: rotator.cycles(),
                    });
                }
            }
            TickKind::Type | TickKind::Release | TickKind::Delete => {}
        }
    }

    summary.cycles = rotator.cycles();
    debug!(ticks = summary.ticks, "text rotator task exited");
    if let Some(events) = &events {
        events.emit(Event::RotatorStopped {
            timestamp: Utc::now(),
            reason: "stopped".to_owned(),
            ticks: summary.ticks,
            emissions: summary.emissions,
        });
    }
    summary
}
