//! `run`: animate the hero line in the terminal.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{ColorChoice, RunArgs};
use crate::config::DisplayConfig;
use crate::display::{RenderMode, TerminalRenderer};
use crate::error::TypecycleError;
use crate::observability::events::EventEmitter;
use crate::observability::logging::use_ansi;
use crate::observability::metrics;
use crate::rotator::{TextRotator, Timing};

use super::resolve_source;

/// Why the animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Cancelled,
    DurationElapsed,
}

impl StopReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::DurationElapsed => "duration elapsed",
        }
    }
}

/// Runs the rotation until `cancel` fires or `--duration` elapses.
///
/// # Errors
///
/// Returns a config error for bad sources, an I/O error if the events file
/// or stdout fails, or a rotator error if the rotation cannot start.
pub async fn run(
    args: &RunArgs,
    color: ColorChoice,
    cancel: CancellationToken,
) -> Result<(), TypecycleError> {
    if let Some(port) = args.metrics_port {
        metrics::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let config = resolve_source(&args.source)?;
    let display = display_overrides(&config.display, args);
    let mut line = display.hero_line();

    let mut rotator =
        TextRotator::new(config.phrase_list()?).with_timing(Timing::from(config.timing));
    if let Some(path) = &args.events_file {
        rotator = rotator.with_events(Arc::new(EventEmitter::from_file(path)?));
    }

    let stdout = std::io::stdout();
    let is_terminal = stdout.is_terminal();
    let mode = RenderMode::detect(is_terminal);
    let mut renderer = TerminalRenderer::new(stdout, mode, use_ansi(color, is_terminal));
    tracing::debug!(?mode, "terminal renderer ready");

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = rotator.start(move |text: &str| {
        // receiver gone means we are shutting down
        let _ = tx.send(text.to_owned());
    })?;

    let started = Instant::now();
    let deadline = deadline_after(started, args.duration);
    let blinking = mode == RenderMode::Inline;

    renderer.render(&line, Duration::ZERO)?;

    let reason = loop {
        let toggle = line
            .cursor()
            .filter(|_| blinking)
            .and_then(|c| c.until_toggle(started.elapsed()));

        tokio::select! {
            biased;
            () = cancel.cancelled() => break StopReason::Cancelled,
            () = sleep_until(deadline) => break StopReason::DurationElapsed,
            Some(text) = rx.recv() => {
                line.set_text(&text);
            }
            () = sleep_for(toggle) => {}
        }

        if let Err(e) = renderer.render(&line, started.elapsed()) {
            metrics::record_error("render");
            return Err(e.into());
        }
    };

    let summary = handle.shutdown().await;
    renderer.finish()?;

    tracing::info!(
        reason = reason.as_str(),
        ticks = summary.ticks,
        emissions = summary.emissions,
        phrases_completed = summary.phrases_completed,
        cycles = summary.cycles,
        "animation stopped"
    );
    Ok(())
}

fn display_overrides(base: &DisplayConfig, args: &RunArgs) -> DisplayConfig {
    let mut display = base.clone();
    if let Some(prefix) = &args.prefix {
        display.prefix.clone_from(prefix);
    }
    if args.no_cursor {
        display.cursor = None;
    } else if let Some(cursor) = &args.cursor {
        display.cursor = Some(cursor.clone());
    }
    display
}

/// The instant `duration` after `started`. A duration too large to
/// represent means no deadline.
fn deadline_after(started: Instant, duration: Option<Duration>) -> Option<Instant> {
    let duration = duration?;
    let deadline = started.checked_add(duration);
    if deadline.is_none() {
        tracing::warn!(
            duration = %humantime::format_duration(duration),
            "duration out of range, running until interrupted"
        );
    }
    deadline
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn sleep_for(delay: Option<Duration>) {
    match delay {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
