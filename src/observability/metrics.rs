//! Metrics collection for `typecycle`.
//!
//! Prometheus-compatible counters and gauges for the rotation loop. All
//! recording functions are no-ops until [`init_metrics`] installs a
//! recorder.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::TypecycleError;
use crate::rotator::TickKind;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns `TypecycleError::Io` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), TypecycleError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    install(port).inspect_err(|_| {
        // a failed install leaves no recorder, so a later call may retry
        METRICS_INITIALIZED.store(false, Ordering::SeqCst);
    })?;

    describe_metrics();
    Ok(())
}

fn install(port: Option<u16>) -> Result<(), TypecycleError> {
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| TypecycleError::Io(std::io::Error::other(e.to_string())))
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("typecycle_ticks_total", "Rotation ticks applied, by kind");
    describe_counter!(
        "typecycle_emissions_total",
        "Visible-text updates delivered to the consumer"
    );
    describe_counter!(
        "typecycle_phrases_completed_total",
        "Phrases typed out in full"
    );
    describe_counter!(
        "typecycle_cycles_total",
        "Complete passes through the phrase list"
    );
    describe_gauge!(
        "typecycle_visible_length",
        "Characters of the current phrase currently shown"
    );
    describe_gauge!("typecycle_rotators_active", "Running rotator tasks");
    describe_counter!(
        "typecycle_errors_total",
        "Total number of errors by category"
    );
}

/// Records one tick of the given kind.
pub fn record_tick(kind: TickKind) {
    counter!("typecycle_ticks_total", "kind" => kind.as_str()).increment(1);
}

/// Records one update handed to the consumer.
pub fn record_emission() {
    counter!("typecycle_emissions_total").increment(1);
}

/// Records a phrase reaching its full length.
pub fn record_phrase_completed() {
    counter!("typecycle_phrases_completed_total").increment(1);
}

/// Records the phrase index wrapping back to the first phrase.
pub fn record_cycle() {
    counter!("typecycle_cycles_total").increment(1);
}

/// Sets the visible-length gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_visible_length(len: usize) {
    gauge!("typecycle_visible_length").set(len as f64);
}

/// Counts one running rotator task until dropped.
///
/// Decrements on drop, so a task that unwinds out of a panicking callback
/// still leaves the gauge balanced.
#[derive(Debug)]
pub struct ActiveRotator(());

/// Increments the active-rotator gauge and returns the guard that undoes it.
#[must_use = "the gauge is decremented when the guard drops"]
pub fn track_active_rotator() -> ActiveRotator {
    gauge!("typecycle_rotators_active").increment(1.0);
    ActiveRotator(())
}

impl Drop for ActiveRotator {
    fn drop(&mut self) {
        gauge!("typecycle_rotators_active").decrement(1.0);
    }
}

/// Records an error by category.
pub fn record_error(category: &'static str) {
    counter!("typecycle_errors_total", "category" => category).increment(1);
}
