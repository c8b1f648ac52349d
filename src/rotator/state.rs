//! Rotation state and the pure transition function.
//!
//! [`step`] applies exactly one row of the rotation table:
//!
//! | mode        | condition            | effect                          | next        | delay  |
//! |-------------|----------------------|---------------------------------|-------------|--------|
//! | Growing     | `len < phrase`       | `len += 1`, emit                | Growing     | type   |
//! | Growing     | `len == phrase`      | emit                            | HoldingFull | hold   |
//! | HoldingFull | -                    | -                               | Shrinking   | delete |
//! | Shrinking   | `len > 1`            | `len -= 1`, emit                | Shrinking   | delete |
//! | Shrinking   | `len <= 1`           | `len = 0`, next phrase, emit    | Growing     | type   |

use std::time::Duration;

use super::phrases::PhraseList;
use super::timing::Timing;

/// Animation phase of the current phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Characters are being typed.
    Growing,
    /// The full phrase is shown and the hold timer is running.
    HoldingFull,
    /// Characters are being deleted.
    Shrinking,
}

impl Mode {
    /// Stable lowercase name, used for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::HoldingFull => "holding_full",
            Self::Shrinking => "shrinking",
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// One more character became visible.
    Type,
    /// The phrase was complete; the hold starts (redundant emission).
    Hold,
    /// The hold elapsed; deleting starts on the next tick. Emits nothing.
    Release,
    /// One character was removed.
    Delete,
    /// The last character was removed and the next phrase selected.
    Advance,
}

impl TickKind {
    /// Stable lowercase name, used for metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Hold => "hold",
            Self::Release => "release",
            Self::Delete => "delete",
            Self::Advance => "advance",
        }
    }

    /// Whether a tick of this kind produces an update for the consumer.
    #[must_use]
    pub const fn emits(self) -> bool {
        !matches!(self, Self::Release)
    }
}

/// Mutable state of one rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotatorState {
    phrase_index: usize,
    visible_len: usize,
    mode: Mode,
}

impl RotatorState {
    /// The state every rotation starts from: first phrase, nothing shown.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            phrase_index: 0,
            visible_len: 0,
            mode: Mode::Growing,
        }
    }

    /// Index of the phrase being animated.
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of leading characters currently shown.
    #[must_use]
    pub const fn visible_len(&self) -> usize {
        self.visible_len
    }

    /// Current animation phase.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The text this state shows, derived from the phrase list.
    #[must_use]
    pub fn visible_text<'a>(&self, phrases: &'a PhraseList) -> &'a str {
        phrases.prefix(self.phrase_index, self.visible_len)
    }
}

impl Default for RotatorState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Outcome of one call to [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the tick.
    pub state: RotatorState,
    /// What the tick did. `kind.emits()` tells whether to notify the consumer.
    pub kind: TickKind,
    /// Delay before the next tick.
    pub next_delay: Duration,
}

/// Applies one tick to `state`.
///
/// Pure: the same inputs always yield the same transition.
#[must_use]
pub fn step(state: &RotatorState, phrases: &PhraseList, timing: &Timing) -> Transition {
    let phrase_len = phrases.char_len(state.phrase_index);

    let (next, kind, next_delay) = match state.mode {
        Mode::Growing if state.visible_len < phrase_len => (
            RotatorState {
                visible_len: state.visible_len + 1,
                ..*state
            },
            TickKind::Type,
            timing.type_delay,
        ),
        Mode::Growing => (
            RotatorState {
                mode: Mode::HoldingFull,
                ..*state
            },
            TickKind::Hold,
            timing.hold_delay,
        ),
        Mode::HoldingFull => (
            RotatorState {
                mode: Mode::Shrinking,
                ..*state
            },
            TickKind::Release,
            timing.delete_delay,
        ),
        Mode::Shrinking if state.visible_len > 1 => (
            RotatorState {
                visible_len: state.visible_len - 1,
                ..*state
            },
            TickKind::Delete,
            timing.delete_delay,
        ),
        // Covers len == 1 and the empty-phrase case len == 0.
        Mode::Shrinking => (
            RotatorState {
                phrase_index: (state.phrase_index + 1) % phrases.len(),
                visible_len: 0,
                mode: Mode::Growing,
            },
            TickKind::Advance,
            timing.type_delay,
        ),
    };

    Transition {
        state: next,
        kind,
        next_delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(phrases: &PhraseList, ticks: usize) -> Vec<Transition> {
        let timing = Timing::default();
        let mut state = RotatorState::initial();
        let mut out = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let t = step(&state, phrases, &timing);
            state = t.state;
            out.push(t);
        }
        out
    }

    #[test]
    fn test_initial_state() {
        let state = RotatorState::initial();
        assert_eq!(state.phrase_index(), 0);
        assert_eq!(state.visible_len(), 0);
        assert_eq!(state.mode(), Mode::Growing);
        assert_eq!(RotatorState::default(), state);
    }

    #[test]
    fn test_growing_adds_one_char() {
        let phrases = PhraseList::new(["Web"]).unwrap();
        let t = step(&RotatorState::initial(), &phrases, &Timing::default());
        assert_eq!(t.kind, TickKind::Type);
        assert_eq!(t.state.visible_text(&phrases), "W");
        assert_eq!(t.next_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_full_phrase_starts_hold_without_change() {
        let phrases = PhraseList::new(["ab"]).unwrap();
        let ts = run(&phrases, 3);
        assert_eq!(ts[1].state.visible_text(&phrases), "ab");
        assert_eq!(ts[2].kind, TickKind::Hold);
        assert_eq!(ts[2].state.mode(), Mode::HoldingFull);
        assert_eq!(ts[2].state.visible_text(&phrases), "ab");
        assert_eq!(ts[2].next_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_release_switches_to_shrinking_silently() {
        let phrases = PhraseList::new(["ab"]).unwrap();
        let ts = run(&phrases, 4);
        assert_eq!(ts[3].kind, TickKind::Release);
        assert!(!ts[3].kind.emits());
        assert_eq!(ts[3].state.mode(), Mode::Shrinking);
        assert_eq!(ts[3].state.visible_text(&phrases), "ab");
        assert_eq!(ts[3].next_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_shrink_stops_at_one_then_advances() {
        let phrases = PhraseList::new(["abc", "xy"]).unwrap();
        // type x3, hold, release, delete x2, advance
        let ts = run(&phrases, 8);
        assert_eq!(ts[5].state.visible_text(&phrases), "ab");
        assert_eq!(ts[6].state.visible_text(&phrases), "a");
        assert_eq!(ts[6].kind, TickKind::Delete);

        let advance = ts[7];
        assert_eq!(advance.kind, TickKind::Advance);
        assert_eq!(advance.state.phrase_index(), 1);
        assert_eq!(advance.state.visible_len(), 0);
        assert_eq!(advance.state.mode(), Mode::Growing);
        assert_eq!(advance.state.visible_text(&phrases), "");
        assert_eq!(advance.next_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_single_phrase_wraps_to_itself() {
        let phrases = PhraseList::new(["a"]).unwrap();
        // type, hold, release, advance
        let ts = run(&phrases, 4);
        assert_eq!(ts[3].kind, TickKind::Advance);
        assert_eq!(ts[3].state, RotatorState::initial());
    }

    #[test]
    fn test_empty_phrase_holds_then_advances() {
        let phrases = PhraseList::new(["", "z"]).unwrap();
        let ts = run(&phrases, 3);
        assert_eq!(ts[0].kind, TickKind::Hold);
        assert_eq!(ts[1].kind, TickKind::Release);
        assert_eq!(ts[2].kind, TickKind::Advance);
        assert_eq!(ts[2].state.phrase_index(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TickKind::Advance.as_str(), "advance");
        assert_eq!(Mode::HoldingFull.as_str(), "holding_full");
        assert!(TickKind::Hold.emits());
    }

    fn phrase_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-zA-Z é👋]{0,12}", 1..5)
    }

    proptest! {
        #[test]
        fn prop_typing_reaches_full_phrase(phrases in phrase_strategy()) {
            let list = PhraseList::new(phrases.clone()).unwrap();
            let n = list.char_len(0);
            let ts = run(&list, n);
            let last = ts.last().map_or_else(RotatorState::initial, |t| t.state);
            prop_assert_eq!(last.visible_text(&list), phrases[0].as_str());
            prop_assert!(ts.iter().all(|t| t.kind == TickKind::Type));
        }

        #[test]
        fn prop_shrinking_decrements_by_one(phrases in phrase_strategy()) {
            let list = PhraseList::new(phrases).unwrap();
            let timing = Timing::default();
            let mut state = RotatorState::initial();
            for _ in 0..200 {
                let t = step(&state, &list, &timing);
                if state.mode() == Mode::Shrinking {
                    if state.visible_len() > 1 {
                        prop_assert_eq!(t.state.visible_len(), state.visible_len() - 1);
                        prop_assert_eq!(t.state.phrase_index(), state.phrase_index());
                    } else {
                        prop_assert_eq!(t.state.visible_len(), 0);
                        prop_assert_eq!(
                            t.state.phrase_index(),
                            (state.phrase_index() + 1) % list.len()
                        );
                    }
                }
                state = t.state;
            }
        }

        #[test]
        fn prop_visible_len_stays_in_bounds(phrases in phrase_strategy(), ticks in 0usize..300) {
            let list = PhraseList::new(phrases).unwrap();
            for t in run(&list, ticks) {
                prop_assert!(t.state.phrase_index() < list.len());
                prop_assert!(t.state.visible_len() <= list.char_len(t.state.phrase_index()));
            }
        }

        #[test]
        fn prop_full_cycle_returns_to_initial(phrases in phrase_strategy()) {
            let list = PhraseList::new(phrases).unwrap();
            let timing = Timing::default();
            let mut state = RotatorState::initial();
            let mut advances = 0;
            while advances < list.len() {
                let t = step(&state, &list, &timing);
                if t.kind == TickKind::Advance {
                    advances += 1;
                }
                state = t.state;
            }
            prop_assert_eq!(state, RotatorState::initial());
        }

        #[test]
        fn prop_hold_happens_once_per_phrase(phrases in phrase_strategy()) {
            let list = PhraseList::new(phrases).unwrap();
            let timing = Timing::default();
            let mut state = RotatorState::initial();
            let mut holds = 0;
            let mut advances = 0;
            while advances < list.len() {
                let t = step(&state, &list, &timing);
                match t.kind {
                    TickKind::Hold => holds += 1,
                    TickKind::Advance => advances += 1,
                    _ => {}
                }
                state = t.state;
            }
            prop_assert_eq!(holds, list.len());
        }
    }
}
