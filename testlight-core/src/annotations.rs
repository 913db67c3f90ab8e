// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building inline annotations for one file.
//!
//! [`annotate_file`] combines a file's parse result with the reconciler's
//! current snapshot and produces everything the host needs to refresh the
//! file: a four-way status partition with marker decorations, the
//! replacement diagnostic set, and optional inline failure messages.
//!
//! Positions convert here and nowhere else: the parser and the runner both
//! speak 1-indexed lines and columns, editor ranges are 0-indexed.

use crate::reconciler::TestReconciler;
use camino::Utf8Path;
use testlight_metadata::{ParseResult, TestBlock, TestStatus};

/// The source tag attached to every diagnostic this crate produces.
pub const DIAGNOSTIC_SOURCE: &str = "testlight";

/// Width in columns of a failing-assertion diagnostic range.
const DIAGNOSTIC_SPAN: u32 = 6;

/// A 0-indexed position, as consumed by editor hosts.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Position {
    /// 0-indexed line.
    pub line: u32,

    /// 0-indexed column.
    pub column: u32,
}

/// A 0-indexed range with an inclusive start and exclusive end, both on one
/// line for everything this crate produces.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Range {
    /// Start of the range.
    pub start: Position,

    /// End of the range.
    pub end: Position,
}

impl Range {
    /// A range spanning `start_column..end_column` on a single 0-indexed
    /// line.
    pub fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start: Position {
                line,
                column: start_column,
            },
            end: Position {
                line,
                column: end_column,
            },
        }
    }
}

/// Severity of a diagnostic. Only errors are currently produced.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    /// A failing assertion.
    Error,
}

/// A workspace problem anchored to a source range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    /// Where the problem is.
    pub range: Range,

    /// The runner's failure message.
    pub message: String,

    /// Always [`Severity::Error`] today.
    pub severity: Severity,

    /// [`DIAGNOSTIC_SOURCE`].
    pub source: &'static str,
}

/// A status marker anchored to a test declaration, with a hover label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decoration {
    /// A minimal marker range at the declaration start, not the full block.
    pub range: Range,

    /// Human-readable label for the status.
    pub hover: &'static str,
}

/// An inline failure message anchored to a failing assertion's line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InlineFailure {
    /// Zero-width range at the start of the failing line.
    pub range: Range,

    /// The runner's failure message.
    pub message: String,
}

/// One file's test blocks, partitioned by reconciled status.
#[derive(Clone, Debug, Default)]
pub struct StatusPartition<'a> {
    /// Blocks whose tests passed.
    pub passed: Vec<&'a TestBlock>,

    /// Blocks whose tests failed.
    pub failed: Vec<&'a TestBlock>,

    /// Blocks whose tests were skipped.
    pub skipped: Vec<&'a TestBlock>,

    /// Blocks the current snapshot knows nothing about.
    pub unknown: Vec<&'a TestBlock>,
}

impl<'a> StatusPartition<'a> {
    /// The group of blocks reconciled to `status`.
    pub fn group(&self, status: TestStatus) -> &[&'a TestBlock] {
        match status {
            TestStatus::KnownSuccess => &self.passed,
            TestStatus::KnownFail => &self.failed,
            TestStatus::KnownSkip => &self.skipped,
            TestStatus::Unknown => &self.unknown,
        }
    }

    /// Marker decorations for the group reconciled to `status`.
    ///
    /// Each marker is anchored at the declaration start and spans two
    /// columns past the start column -- a dot-sized range, not the whole
    /// block.
    pub fn decorations_for(&self, status: TestStatus) -> Vec<Decoration> {
        self.group(status)
            .iter()
            .map(|block| {
                let line = block.start.line.saturating_sub(1);
                let column = block.start.column.saturating_sub(1);
                Decoration {
                    range: Range::on_line(line, column, block.start.column + 1),
                    hover: status.describe(),
                }
            })
            .collect()
    }
}

/// Everything needed to refresh one file's annotations.
///
/// Consumers must treat each piece as a full replacement for whatever they
/// previously rendered for the file, never as an increment -- otherwise a
/// now-passing assertion keeps its stale error marker.
#[derive(Clone, Debug, Default)]
pub struct FileAnnotations<'a> {
    /// Test blocks partitioned by status.
    pub partition: StatusPartition<'a>,

    /// The file's replacement diagnostic set.
    pub diagnostics: Vec<Diagnostic>,

    /// Inline failure messages; empty when the inline-message setting is
    /// off.
    pub inline_failures: Vec<InlineFailure>,
}

/// Builds the full annotation set for `file` from its parse result and the
/// reconciler's current snapshot.
///
/// Each failing assertion is located by matching the runner-reported line
/// against the parse result's assertion call sites; when no call site sits
/// on that line the diagnostic is anchored at column 0.
pub fn annotate_file<'a>(
    file: &Utf8Path,
    parse: &'a ParseResult,
    reconciler: &TestReconciler,
    inline_messages: bool,
) -> FileAnnotations<'a> {
    let mut partition = StatusPartition::default();
    for block in &parse.test_blocks {
        match reconciler.status_for(file, &block.name) {
            TestStatus::KnownSuccess => partition.passed.push(block),
            TestStatus::KnownFail => partition.failed.push(block),
            TestStatus::KnownSkip => partition.skipped.push(block),
            TestStatus::Unknown => partition.unknown.push(block),
        }
    }

    let mut diagnostics = Vec::new();
    let mut inline_failures = Vec::new();
    if let Some(report) = reconciler.failed_report_for(file) {
        for assertion in &report.failures {
            // Runner lines are 1-indexed.
            let line = assertion.line.saturating_sub(1);
            let start_column = parse
                .assertion_at_line(assertion.line)
                .map_or(0, |expr| expr.start.column.saturating_sub(1));
            let message = assertion.message().unwrap_or_default().to_owned();
            if inline_messages {
                inline_failures.push(InlineFailure {
                    range: Range::on_line(line, 0, 0),
                    message: message.clone(),
                });
            }
            diagnostics.push(Diagnostic {
                range: Range::on_line(line, start_column, start_column + DIAGNOSTIC_SPAN),
                message,
                severity: Severity::Error,
                source: DIAGNOSTIC_SOURCE,
            });
        }
    }

    FileAnnotations {
        partition,
        diagnostics,
        inline_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use testlight_metadata::{
        AssertionExpr, AssertionResult, FileReport, RunResultSnapshot, SourcePosition,
    };

    const FILE: &str = "/work/app/math.test.ts";

    fn block(name: &str, line: u32, column: u32) -> TestBlock {
        TestBlock {
            name: name.into(),
            start: SourcePosition::new(line, column),
            end: SourcePosition::new(line + 2, 3),
        }
    }

    fn failing(name: &str, line: u32, terse: &str) -> AssertionResult {
        AssertionResult {
            test_name: name.into(),
            status: TestStatus::KnownFail,
            line,
            terse_message: Some(terse.to_owned()),
            short_message: None,
        }
    }

    fn passing(name: &str, line: u32) -> AssertionResult {
        AssertionResult {
            test_name: name.into(),
            status: TestStatus::KnownSuccess,
            line,
            terse_message: None,
            short_message: None,
        }
    }

    fn reconciler_with(assertions: Vec<AssertionResult>) -> TestReconciler {
        let mut reconciler = TestReconciler::new();
        reconciler.update(RunResultSnapshot {
            success: assertions.iter().all(|a| !a.status.is_fail()),
            timestamp: DateTime::parse_from_rfc3339("2026-08-07T12:30:00+00:00").unwrap(),
            file_reports: vec![FileReport {
                file_path: FILE.into(),
                assertions,
            }],
        });
        reconciler
    }

    #[test]
    fn blocks_partition_four_ways_with_absent_as_unknown() {
        let parse = ParseResult {
            test_blocks: vec![
                block("adds", 3, 1),
                block("subtracts", 8, 1),
                block("divides", 13, 1),
                block("multiplies", 18, 1),
            ],
            assertions: Vec::new(),
        };
        let reconciler = reconciler_with(vec![
            passing("adds", 4),
            failing("subtracts", 9, "expected 1 to be 2"),
            AssertionResult {
                test_name: "divides".into(),
                status: TestStatus::KnownSkip,
                line: 14,
                terse_message: None,
                short_message: None,
            },
            // `multiplies` is absent from the snapshot.
        ]);

        let annotations =
            annotate_file(Utf8Path::new(FILE), &parse, &reconciler, false);
        let partition = &annotations.partition;
        assert_eq!(partition.passed[0].name, "adds".into());
        assert_eq!(partition.failed[0].name, "subtracts".into());
        assert_eq!(partition.skipped[0].name, "divides".into());
        assert_eq!(partition.unknown[0].name, "multiplies".into());
    }

    #[test]
    fn marker_ranges_span_two_columns_past_the_start() {
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 5)],
            assertions: Vec::new(),
        };
        let reconciler = reconciler_with(vec![passing("adds", 4)]);

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, false);
        let markers = annotations
            .partition
            .decorations_for(TestStatus::KnownSuccess);
        // 1-indexed (3, 5) becomes the 0-indexed two-column range 4..6 on
        // line 2.
        assert_eq!(markers, vec![Decoration {
            range: Range::on_line(2, 4, 6),
            hover: "Passed",
        }]);

        assert!(
            annotations
                .partition
                .decorations_for(TestStatus::KnownFail)
                .is_empty()
        );
    }

    #[test]
    fn unknown_marker_carries_the_selective_run_label() {
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 1)],
            assertions: Vec::new(),
        };
        let reconciler = TestReconciler::new();

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, false);
        let markers = annotations.partition.decorations_for(TestStatus::Unknown);
        assert_eq!(
            markers[0].hover,
            "Test has not run yet, due to selective re-running of related tests only"
        );
    }

    #[test]
    fn diagnostics_anchor_to_the_assertion_on_the_reported_line() {
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 1)],
            assertions: vec![
                AssertionExpr {
                    start: SourcePosition::new(4, 3),
                },
                AssertionExpr {
                    start: SourcePosition::new(4, 20),
                },
            ],
        };
        let reconciler = reconciler_with(vec![failing("adds", 4, "expected 2 to be 3")]);

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, false);
        assert_eq!(annotations.diagnostics, vec![Diagnostic {
            // Runner line 4 -> 0-indexed line 3; first assertion on the
            // line wins, column 3 -> 0-indexed 2, spanning 6 columns.
            range: Range::on_line(3, 2, 8),
            message: "expected 2 to be 3".to_owned(),
            severity: Severity::Error,
            source: DIAGNOSTIC_SOURCE,
        }]);
        assert!(annotations.inline_failures.is_empty());
    }

    #[test]
    fn diagnostics_fall_back_to_column_zero() {
        // No assertion call site on the reported line.
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 1)],
            assertions: vec![AssertionExpr {
                start: SourcePosition::new(10, 7),
            }],
        };
        let reconciler = reconciler_with(vec![failing("adds", 4, "expected 2 to be 3")]);

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, false);
        assert_eq!(annotations.diagnostics[0].range, Range::on_line(3, 0, 6));
    }

    #[test]
    fn inline_failures_follow_the_setting() {
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 1)],
            assertions: Vec::new(),
        };
        let reconciler = reconciler_with(vec![failing("adds", 4, "expected 2 to be 3")]);

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, true);
        assert_eq!(annotations.inline_failures, vec![InlineFailure {
            range: Range::on_line(3, 0, 0),
            message: "expected 2 to be 3".to_owned(),
        }]);
    }

    #[test]
    fn failures_in_other_files_produce_no_diagnostics_here() {
        let parse = ParseResult {
            test_blocks: vec![block("adds", 3, 1)],
            assertions: Vec::new(),
        };
        let mut reconciler = TestReconciler::new();
        reconciler.update(RunResultSnapshot {
            success: false,
            timestamp: DateTime::parse_from_rfc3339("2026-08-07T12:30:00+00:00").unwrap(),
            file_reports: vec![FileReport {
                file_path: "/work/app/other.test.ts".into(),
                assertions: vec![failing("adds", 4, "expected 2 to be 3")],
            }],
        });

        let annotations = annotate_file(Utf8Path::new(FILE), &parse, &reconciler, true);
        assert!(annotations.diagnostics.is_empty());
        assert!(annotations.inline_failures.is_empty());
        // The block still partitions -- as Unknown, since this file has no
        // record.
        assert_eq!(annotations.partition.unknown.len(), 1);
    }
}
