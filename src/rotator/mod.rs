//! Typewriter phrase rotation.
//!
//! A rotation types a phrase one character at a time, holds it, deletes it
//! one character at a time, and moves on to the next phrase, wrapping around
//! forever. The pieces are layered:
//!
//! - [`step`] is the pure transition function over [`RotatorState`]
//! - [`Rotator`] owns a state and applies ticks without any clock
//! - [`TextRotator`] drives a [`Rotator`] from a tokio task and hands each
//!   visible text to a callback until [`RotatorHandle::stop`] is called
//!
//! ```no_run
//! # async fn demo() -> Result<(), typecycle::error::RotatorError> {
//! let handle = typecycle::rotator::start(
//!     ["Web Developer", "Problem Solver"],
//!     |text| println!("{text}"),
//! )?;
//! // ...
//! handle.stop();
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod phrases;
pub mod runner;
pub mod state;
pub mod timing;

pub use engine::{Frame, Frames, Rotator, Tick};
pub use phrases::PhraseList;
pub use runner::{RotatorHandle, RunSummary, TextRotator, start};
pub use state::{Mode, RotatorState, TickKind, Transition, step};
pub use timing::{DEFAULT_DELETE_DELAY, DEFAULT_HOLD_DELAY, DEFAULT_TYPE_DELAY, Timing};
