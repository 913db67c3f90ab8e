// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events exchanged with the host.
//!
//! Inbound runner notifications form a closed enum, consumed through the
//! single dispatch point
//! [`RunSession::handle_event`](crate::session::RunSession::handle_event).
//! Outbound effects go through [`EditorSink`], which the host implements;
//! every method defaults to a no-op so a consumer may subscribe to any
//! subset.

use crate::annotations::{Decoration, Diagnostic, InlineFailure};
use camino::Utf8Path;
use testlight_metadata::{RunResultSnapshot, TestStatus};

/// A notification from the external test runner.
#[derive(Clone, Debug)]
pub enum RunnerEvent {
    /// A completed run produced a full result snapshot.
    ResultsReceived(RunResultSnapshot),

    /// A chunk of runner stdout.
    OutputChunk(String),

    /// A chunk of runner stderr.
    ///
    /// The runner writes its progress here, so stderr also drives run-start
    /// detection and snapshot-failure scanning.
    StderrChunk(String),

    /// The runner reported an error it recovered from.
    NonTerminalError(String),

    /// The runner reported an exception raised inside a test worker.
    Exception {
        /// The exception class, as reported.
        kind: String,

        /// The exception message.
        message: String,
    },

    /// The runner reported an error it cannot recover from.
    TerminalError(String),

    /// The runner process closed.
    RunnerShutdown,
}

/// Lifecycle of a test run, as observable by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunState {
    /// No run has started yet.
    Initial,

    /// A run is in progress.
    Running,

    /// The last run completed with every executed test passing.
    Succeeded,

    /// The last run completed with failures.
    Failed,

    /// The runner was shut down.
    Stopped,
}

/// Consumer interface for everything the session produces.
///
/// All methods default to no-ops. Decoration, diagnostic, and inline-message
/// deliveries are full replacements for the given file -- a host that
/// appends instead of replacing will show stale markers.
pub trait EditorSink {
    /// Replaces the marker decorations for one status group of `file`.
    fn replace_decorations(
        &mut self,
        _file: &Utf8Path,
        _status: TestStatus,
        _decorations: Vec<Decoration>,
    ) {
    }

    /// Replaces the diagnostics for `file`. An empty set clears them.
    fn replace_diagnostics(&mut self, _file: &Utf8Path, _diagnostics: Vec<Diagnostic>) {}

    /// Replaces the inline failure messages for `file`. An empty set clears
    /// them.
    fn replace_inline_failures(&mut self, _file: &Utf8Path, _failures: Vec<InlineFailure>) {}

    /// Clears every diagnostic previously produced, across all files.
    fn clear_diagnostics(&mut self) {}

    /// Appends a line to the user-visible log.
    fn append_log(&mut self, _line: &str) {}

    /// Clears the user-visible log.
    fn clear_log(&mut self) {}

    /// The run lifecycle advanced.
    fn run_state_changed(&mut self, _state: RunState) {}

    /// A snapshot-assertion failure was detected in runner output and the
    /// snapshot-update workflow is enabled.
    fn snapshot_failure_detected(&mut self) {}

    /// The current snapshot changed: annotations built from the previous
    /// snapshot are stale, and visible files should be re-annotated.
    fn annotations_invalidated(&mut self) {}
}
