// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The run session: owned mutable run state and event dispatch.
//!
//! A [`RunSession`] is created once per open project and passed by
//! reference -- it is the only holder of cross-event state (the current
//! snapshot via the reconciler, per-file parse flags, the run lifecycle).
//! There are no globals.

use crate::{
    annotations::{FileAnnotations, annotate_file},
    config::{RECOMMENDED_MAJOR_VERSION, Settings, detect_major_version},
    errors::TestFileMatcherError,
    events::{EditorSink, RunState, RunnerEvent},
    output_scan,
    reconciler::TestReconciler,
    test_files::TestFileMatcher,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use testlight_metadata::{ParseResult, TestStatus};
use tracing::warn;

/// One open project's run state.
#[derive(Debug)]
pub struct RunSession {
    settings: Settings,
    matcher: TestFileMatcher,
    reconciler: TestReconciler,
    framework_major_version: u64,

    /// Files with a parse pass in progress. Annotation requests for these
    /// are dropped, not queued; the host re-triggers after the parse.
    parsing: HashSet<Utf8PathBuf>,

    /// Armed when a run completes. The next stderr chunk then marks the
    /// start of a new run: the log is cleared and parse flags reset.
    clear_on_next_input: bool,

    state: RunState,
}

impl RunSession {
    /// Creates a session from host settings.
    ///
    /// Compiles the test-file matcher and detects the framework version,
    /// falling back to major version 18. Frameworks older than
    /// [`RECOMMENDED_MAJOR_VERSION`] get a warning; behavior is unaffected.
    pub fn new(settings: Settings) -> Result<Self, TestFileMatcherError> {
        let matcher = TestFileMatcher::new(&settings)?;
        let framework_major_version = detect_major_version(settings.package_json.as_deref());
        if framework_major_version < RECOMMENDED_MAJOR_VERSION {
            warn!(
                "framework major version {framework_major_version} predates structured \
                 selective-run reporting; status annotations may be incomplete"
            );
        }
        Ok(Self {
            settings,
            matcher,
            reconciler: TestReconciler::new(),
            framework_major_version,
            parsing: HashSet::new(),
            clear_on_next_input: true,
            state: RunState::Initial,
        })
    }

    /// Replaces the session settings, recompiling the matcher wholesale.
    ///
    /// On error the previous settings and matcher stay in effect.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), TestFileMatcherError> {
        self.matcher = TestFileMatcher::new(&settings)?;
        self.settings = settings;
        Ok(())
    }

    /// The session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The detected framework major version (18 when undetectable).
    pub fn framework_major_version(&self) -> u64 {
        self.framework_major_version
    }

    /// The current run lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Read access to the reconciler, for ad-hoc status queries.
    pub fn reconciler(&self) -> &TestReconciler {
        &self.reconciler
    }

    /// Whether the runner would treat `path` as a test file.
    pub fn is_test_file(&self, path: &Utf8Path) -> bool {
        self.matcher.is_test_file(path)
    }

    /// Single dispatch point for runner notifications.
    pub fn handle_event(&mut self, event: RunnerEvent, sink: &mut dyn EditorSink) {
        match event {
            RunnerEvent::ResultsReceived(snapshot) => {
                let success = snapshot.success;
                self.reconciler.update(snapshot);
                // Stale markers from the previous run must never linger,
                // even when the run as a whole failed.
                sink.clear_diagnostics();
                self.set_state(
                    if success {
                        RunState::Succeeded
                    } else {
                        RunState::Failed
                    },
                    sink,
                );
                sink.annotations_invalidated();
                self.clear_on_next_input = true;
            }
            RunnerEvent::OutputChunk(chunk) => {
                if !output_scan::is_watch_usage_banner(&chunk) {
                    sink.append_log(&chunk);
                }
            }
            RunnerEvent::StderrChunk(chunk) => {
                if self.clear_on_next_input {
                    self.clear_on_next_input = false;
                    self.parsing.clear();
                    sink.clear_log();
                    self.set_state(RunState::Running, sink);
                }
                let stripped = output_scan::strip_ansi_escapes(&chunk);
                if self.settings.enable_snapshot_update_messages
                    && stripped.contains(output_scan::SNAPSHOT_FAILURE_MARKER)
                {
                    sink.snapshot_failure_detected();
                }
                sink.append_log(&stripped);
            }
            RunnerEvent::NonTerminalError(message) => {
                sink.append_log(&format!("Received an error from the runner: {message}"));
            }
            RunnerEvent::Exception { kind, message } => {
                sink.append_log(&format!("Exception raised: [{kind}]: {message}"));
            }
            RunnerEvent::TerminalError(message) => {
                sink.append_log(&format!("Exception raised: {message}"));
            }
            RunnerEvent::RunnerShutdown => {
                sink.append_log("Closed the test runner.");
                self.set_state(RunState::Stopped, sink);
            }
        }
    }

    /// Marks the start of a parse pass for `file`.
    ///
    /// Until [`finish_parse`](Self::finish_parse), annotation requests for
    /// the file are dropped -- a parse result mid-update must never be read.
    pub fn begin_parse(&mut self, file: &Utf8Path) {
        self.parsing.insert(file.to_owned());
    }

    /// Marks the end of a parse pass for `file`.
    pub fn finish_parse(&mut self, file: &Utf8Path) {
        self.parsing.remove(file);
    }

    /// Rebuilds and emits the full annotation set for `file`.
    ///
    /// Returns false without emitting anything if `file` has a parse pass
    /// in progress or is not a test file. Everything emitted is a full
    /// replacement of whatever the host previously rendered for the file.
    pub fn annotate(
        &self,
        file: &Utf8Path,
        parse: &ParseResult,
        sink: &mut dyn EditorSink,
    ) -> bool {
        if self.parsing.contains(file) || !self.matcher.is_test_file(file) {
            return false;
        }
        let FileAnnotations {
            partition,
            diagnostics,
            inline_failures,
        } = annotate_file(
            file,
            parse,
            &self.reconciler,
            self.settings.enable_inline_error_messages,
        );
        for status in TestStatus::ALL {
            sink.replace_decorations(file, status, partition.decorations_for(status));
        }
        sink.replace_inline_failures(file, inline_failures);
        sink.replace_diagnostics(file, diagnostics);
        true
    }

    fn set_state(&mut self, state: RunState, sink: &mut dyn EditorSink) {
        if self.state != state {
            self.state = state;
            sink.run_state_changed(state);
        }
    }
}
