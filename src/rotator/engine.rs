//! Synchronous rotation engine.
//!
//! [`Rotator`] owns a [`RotatorState`] and advances it one tick at a time.
//! It knows nothing about clocks: the async runner sleeps for
//! [`Tick::next_delay`] between calls, while [`Frames`] replays the same
//! sequence in virtual time.

use std::time::Duration;

use serde::Serialize;

use super::phrases::PhraseList;
use super::state::{RotatorState, TickKind, step};
use super::timing::Timing;

/// Result of one [`Rotator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick<'a> {
    /// What the tick did.
    pub kind: TickKind,
    /// Text to hand to the consumer, `None` for the silent hold release.
    pub text: Option<&'a str>,
    /// Phrase index after the tick.
    pub phrase_index: usize,
    /// Delay before the next tick.
    pub next_delay: Duration,
}

/// Owner of one rotation's state.
#[derive(Debug, Clone)]
pub struct Rotator {
    phrases: PhraseList,
    timing: Timing,
    state: RotatorState,
    next_delay: Duration,
    ticks: u64,
    cycles: u64,
}

impl Rotator {
    /// Creates a rotator positioned at the initial state.
    #[must_use]
    pub const fn new(phrases: PhraseList, timing: Timing) -> Self {
        Self {
            phrases,
            timing,
            state: RotatorState::initial(),
            next_delay: timing.type_delay,
            ticks: 0,
            cycles: 0,
        }
    }

    /// Applies one tick.
    pub fn tick(&mut self) -> Tick<'_> {
        let transition = step(&self.state, &self.phrases, &self.timing);
        self.state = transition.state;
        self.next_delay = transition.next_delay;
        self.ticks += 1;
        if transition.kind == TickKind::Advance && transition.state.phrase_index() == 0 {
            self.cycles += 1;
        }

        let text = transition
            .kind
            .emits()
            .then(|| self.state.visible_text(&self.phrases));

        Tick {
            kind: transition.kind,
            text,
            phrase_index: transition.state.phrase_index(),
            next_delay: transition.next_delay,
        }
    }

    /// Delay until the next tick is due. Equals the type delay before the
    /// first tick.
    #[must_use]
    pub const fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RotatorState {
        self.state
    }

    /// Text shown in the current state.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        self.state.visible_text(&self.phrases)
    }

    /// The phrases being rotated.
    #[must_use]
    pub const fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    /// The delays in use.
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Ticks applied so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Completed passes through the whole phrase list.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Virtual time one full pass through every phrase takes, measured from
    /// the initial state to the tick that wraps back to the first phrase.
    ///
    /// Saturates at [`Duration::MAX`].
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        let mut replay = Self::new(self.phrases.clone(), self.timing);
        let mut elapsed = Duration::ZERO;
        while replay.cycles == 0 {
            elapsed = elapsed.saturating_add(replay.next_delay);
            replay.tick();
        }
        elapsed
    }

    /// Consumes the rotator into an infinite iterator of frames in virtual
    /// time.
    #[must_use]
    pub const fn frames(self) -> Frames {
        Frames {
            rotator: self,
            elapsed: Duration::ZERO,
        }
    }
}

/// One tick placed on a virtual timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Time since start at which the tick fires.
    #[serde(serialize_with = "serialize_millis", rename = "at_ms")]
    pub at: Duration,
    /// What the tick did.
    pub kind: TickKind,
    /// Phrase index after the tick.
    pub phrase_index: usize,
    /// Text emitted by the tick, if any.
    pub text: Option<String>,
    /// Completed cycles after the tick.
    pub cycles: u64,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

/// Infinite, deterministic frame sequence. See [`Rotator::frames`].
#[derive(Debug, Clone)]
pub struct Frames {
    rotator: Rotator,
    elapsed: Duration,
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        // saturates: frames past Duration::MAX all report Duration::MAX
        self.elapsed = self.elapsed.saturating_add(self.rotator.next_delay());
        let at = self.elapsed;
        let tick = self.rotator.tick();
        let kind = tick.kind;
        let phrase_index = tick.phrase_index;
        let text = tick.text.map(str::to_owned);
        Some(Frame {
            at,
            kind,
            phrase_index,
            text,
            cycles: self.rotator.cycles(),
        })
    }
}
