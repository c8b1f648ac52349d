//! `typecycle` - typewriter-style phrase rotation
//!
//! A text rotator types a phrase one character at a time, holds it, deletes
//! it, and moves on to the next phrase, forever, handing each visible
//! substring to a caller-supplied callback. The crate also ships the pieces
//! the `typecycle` binary uses to show that rotation in a terminal.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod observability;
pub mod rotator;
pub mod scheduler;

pub use rotator::{RotatorHandle, TextRotator, start};
