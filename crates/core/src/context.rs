//! Shared run state accumulated across task invocations.

use std::collections::HashSet;
use std::sync::Mutex;

/// Discrete error kinds recorded into a [`RunContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMarker {
    /// A resolved task failed, was killed, or exited on a signal.
    TaskError,
}

/// Caller-owned state shared by every task invocation of one top-level run.
///
/// The error set is insertion-only and never cleared during a run. Inserts
/// are idempotent and order-independent, so concurrently running tasks can
/// share one context without further coordination.
#[derive(Debug, Default)]
pub struct RunContext {
    errors: Mutex<HashSet<ErrorMarker>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error marker. Recording the same marker twice is a no-op.
    pub fn add_error(&self, marker: ErrorMarker) {
        self.errors
            .lock()
            .expect("run context mutex poisoned")
            .insert(marker);
    }

    pub fn has_error(&self, marker: ErrorMarker) -> bool {
        self.errors
            .lock()
            .expect("run context mutex poisoned")
            .contains(&marker)
    }

    /// True when any marker has been recorded.
    pub fn has_errors(&self) -> bool {
        !self
            .errors
            .lock()
            .expect("run context mutex poisoned")
            .is_empty()
    }
}
