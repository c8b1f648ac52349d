//! Shared integration-test harness: runs the `typecycle` binary and
//! collects rotator updates in simulated time.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};

/// Runs `typecycle` with `args` to completion and captures its output.
///
/// Logging is left at its default level; callers add `--quiet` when they
/// need a clean stderr.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typecycle"))
        .args(args)
        .env_remove("TYPECYCLE_CONFIG")
        .env_remove("TYPECYCLE_LOG_LEVEL")
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn typecycle")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Updates received by a rotator callback, shared with the test body.
#[derive(Clone, Default)]
pub struct Updates(Arc<Mutex<Vec<String>>>);

impl Updates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends every update to this collector.
    pub fn sink(&self) -> impl FnMut(&str) + Send + 'static {
        let inner = Arc::clone(&self.0);
        move |text: &str| inner.lock().unwrap().push(text.to_owned())
    }

    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

/// Every prefix of `s` from one char up to the whole string.
#[must_use]
pub fn growing(s: &str) -> Vec<String> {
    s.char_indices()
        .map(|(i, c)| s[..i + c.len_utf8()].to_string())
        .collect()
}

/// Prefixes of `s` from one char short of whole down to one char.
#[must_use]
pub fn shrinking(s: &str) -> Vec<String> {
    let mut v = growing(s);
    v.pop();
    v.reverse();
    v
}
