// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The run-side view: results produced by one test-runner invocation.

use crate::errors::TestStatusParseError;
use camino::Utf8PathBuf;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

/// The name of a single test, as declared in source and reported by the
/// runner.
///
/// Names are not guaranteed unique within a file: the runner keys results by
/// name, so two same-named tests in one file reconcile to the same record.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TestName(SmolStr);

impl TestName {
    /// Creates a new test name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The reconciled status of a test: what the current run-result snapshot
/// knows about it.
///
/// This is a closed enumeration. A test declared in source but absent from
/// the snapshot (the runner re-ran only tests related to changes, say) is
/// [`Unknown`](Self::Unknown) -- that is a normal outcome, never an error.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStatus {
    /// The test ran and passed.
    KnownSuccess,

    /// The test ran and failed.
    KnownFail,

    /// The runner skipped the test.
    KnownSkip,

    /// The snapshot carries no record of the test.
    Unknown,
}

impl TestStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 4] = [
        Self::KnownSuccess,
        Self::KnownFail,
        Self::KnownSkip,
        Self::Unknown,
    ];

    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["known-success", "known-fail", "known-skip", "unknown"]
    }

    /// The human-readable label shown when hovering a status marker.
    pub fn describe(self) -> &'static str {
        match self {
            Self::KnownSuccess => "Passed",
            Self::KnownFail => "Failed",
            Self::KnownSkip => "Skipped",
            Self::Unknown => {
                "Test has not run yet, due to selective re-running of related tests only"
            }
        }
    }

    /// Returns true for [`KnownFail`](Self::KnownFail).
    pub fn is_fail(self) -> bool {
        self == Self::KnownFail
    }
}

impl FromStr for TestStatus {
    type Err = TestStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "known-success" => Ok(Self::KnownSuccess),
            "known-fail" => Ok(Self::KnownFail),
            "known-skip" => Ok(Self::KnownSkip),
            "unknown" => Ok(Self::Unknown),
            other => Err(TestStatusParseError::new(other)),
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::KnownSuccess => "known-success",
            Self::KnownFail => "known-fail",
            Self::KnownSkip => "known-skip",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The outcome of a single assertion, as reported by the runner.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    /// The name of the test the assertion belongs to.
    pub test_name: TestName,

    /// The status the runner reported.
    pub status: TestStatus,

    /// 1-indexed line from the runner's own stack-line mapping.
    ///
    /// This comes from the runtime stack trace, so it may differ from the
    /// parser's line numbering for the same assertion.
    pub line: u32,

    /// A one-line failure message, if the runner produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terse_message: Option<String>,

    /// A longer failure message, if the runner produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_message: Option<String>,
}

impl AssertionResult {
    /// The preferred human-readable message: terse over short.
    pub fn message(&self) -> Option<&str> {
        self.terse_message
            .as_deref()
            .or(self.short_message.as_deref())
    }

    /// Checks the failure-message invariant: a [`TestStatus::KnownFail`]
    /// record carries at least one of the two messages.
    pub fn has_required_messages(&self) -> bool {
        !self.status.is_fail() || self.message().is_some()
    }
}

/// All assertion results the runner reported for one file, in runner order.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Absolute path of the file.
    pub file_path: Utf8PathBuf,

    /// The assertion results, in the order the runner emitted them.
    #[serde(default)]
    pub assertions: Vec<AssertionResult>,
}

/// The full outcome of one test-runner invocation.
///
/// Exactly one snapshot is current at a time; a new snapshot fully replaces
/// the previous one. A snapshot may be partial -- the runner is free to
/// re-run only tests related to changes -- which is why declared tests with
/// no record here reconcile to [`TestStatus::Unknown`].
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResultSnapshot {
    /// Whether the run as a whole succeeded.
    pub success: bool,

    /// When the run completed, including the offset from UTC.
    pub timestamp: DateTime<FixedOffset>,

    /// Per-file reports, in the order the runner emitted them.
    #[serde(default)]
    pub file_reports: Vec<FileReport>,
}
