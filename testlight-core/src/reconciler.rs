// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciling declared tests with run results.
//!
//! The main type in this module is [`TestReconciler`], which ingests one
//! [`RunResultSnapshot`] at a time and answers status queries keyed by file
//! path and test name.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::collections::HashMap;
use testlight_metadata::{AssertionResult, RunResultSnapshot, TestName, TestStatus};

/// Maps run results onto declared tests, by exact file path and test name.
///
/// Holds the index built from the current snapshot. [`update`](Self::update)
/// replaces the index as a unit, so queries never observe a partially built
/// index, and nothing from a superseded snapshot survives -- a (file, name)
/// pair present in the old snapshot but absent from the new one reconciles
/// to [`TestStatus::Unknown`], not to its old value.
#[derive(Debug, Default)]
pub struct TestReconciler {
    index: SnapshotIndex,
}

/// The index built from one snapshot. Replaced wholesale on update.
#[derive(Debug, Default)]
struct SnapshotIndex {
    files: IndexMap<Utf8PathBuf, FileRecord>,
}

#[derive(Debug, Default)]
struct FileRecord {
    /// Assertion results in runner order.
    assertions: Vec<AssertionResult>,

    /// Test name -> index into `assertions`. A later duplicate wins.
    by_name: HashMap<TestName, usize>,
}

/// One file's failing slice of the current snapshot: only its
/// [`TestStatus::KnownFail`] assertions, in runner order.
#[derive(Clone, Debug)]
pub struct FailedReport<'a> {
    /// Absolute path the failures were reported against.
    pub file_path: &'a Utf8Path,

    /// The failing assertions.
    pub failures: Vec<&'a AssertionResult>,
}

impl TestReconciler {
    /// Creates a reconciler with an empty index: every query answers
    /// [`TestStatus::Unknown`] until the first snapshot arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index with one built from `snapshot`.
    ///
    /// Every file report and every assertion therein is indexed. Duplicate
    /// (file, name) pairs within one snapshot resolve to the last record
    /// emitted. A report with zero assertions is valid and contributes
    /// nothing.
    pub fn update(&mut self, snapshot: RunResultSnapshot) {
        let mut files: IndexMap<Utf8PathBuf, FileRecord> =
            IndexMap::with_capacity(snapshot.file_reports.len());
        for report in snapshot.file_reports {
            let record = files.entry(report.file_path).or_default();
            for assertion in report.assertions {
                record
                    .by_name
                    .insert(assertion.test_name.clone(), record.assertions.len());
                record.assertions.push(assertion);
            }
        }
        self.index = SnapshotIndex { files };
    }

    /// Returns the assertion record for `(file, name)`, if the current
    /// snapshot has one. Both parts match exactly.
    pub fn assertion_for(&self, file: &Utf8Path, name: &TestName) -> Option<&AssertionResult> {
        let record = self.index.files.get(file)?;
        let ix = *record.by_name.get(name)?;
        record.assertions.get(ix)
    }

    /// Returns the reconciled status for `(file, name)`.
    ///
    /// A pair with no record in the current snapshot is
    /// [`TestStatus::Unknown`], never an error.
    pub fn status_for(&self, file: &Utf8Path, name: &TestName) -> TestStatus {
        self.assertion_for(file, name)
            .map_or(TestStatus::Unknown, |assertion| assertion.status)
    }

    /// Returns every file with at least one failing assertion, each
    /// filtered to its [`TestStatus::KnownFail`] assertions, in snapshot
    /// order.
    pub fn failed_reports(&self) -> Vec<FailedReport<'_>> {
        self.index
            .files
            .iter()
            .filter_map(|(path, record)| failed_report(path, record))
            .collect()
    }

    /// Returns `file`'s failing slice of the current snapshot, if it has
    /// any failing assertions.
    pub fn failed_report_for(&self, file: &Utf8Path) -> Option<FailedReport<'_>> {
        let (path, record) = self.index.files.get_key_value(file)?;
        failed_report(path, record)
    }
}

fn failed_report<'a>(path: &'a Utf8PathBuf, record: &'a FileRecord) -> Option<FailedReport<'a>> {
    let failures: Vec<_> = record
        .assertions
        .iter()
        .filter(|assertion| assertion.status.is_fail())
        .collect();
    if failures.is_empty() {
        None
    } else {
        Some(FailedReport {
            file_path: path.as_path(),
            failures,
        })
    }
}
