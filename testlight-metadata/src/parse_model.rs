// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The parse-side view: test declarations and assertion call sites.
//!
//! Produced per file by the external syntax parser. A parse result lives
//! until the next parse of the same file (or the file's closure); the core
//! only ever borrows it for the duration of one annotation pass.

use crate::TestName;
use serde::{Deserialize, Serialize};

/// A position in source text, 1-indexed on both axes (parser convention).
///
/// Editor-facing ranges are 0-indexed; conversion happens where annotations
/// are built, not here.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct SourcePosition {
    /// 1-indexed line.
    pub line: u32,

    /// 1-indexed column.
    pub column: u32,
}

impl SourcePosition {
    /// Creates a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A declared test, as parsed out of source text.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct TestBlock {
    /// The declared name. Not guaranteed unique within a file.
    pub name: TestName,

    /// Start of the declaration.
    pub start: SourcePosition,

    /// End of the declaration.
    pub end: SourcePosition,
}

/// An assertion call site, as parsed out of source text.
///
/// Only the start position is needed: it locates the nearest assertion for a
/// failing runtime stack line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct AssertionExpr {
    /// Start of the call site.
    pub start: SourcePosition,
}

/// One file's parsed test structure: declared tests and assertion call
/// sites, each in document order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ParseResult {
    /// Declared tests, in document order.
    pub test_blocks: Vec<TestBlock>,

    /// Assertion call sites, in document order.
    pub assertions: Vec<AssertionExpr>,
}

impl ParseResult {
    /// Returns the first assertion (document order) whose 1-indexed start
    /// line equals `line`.
    ///
    /// When several assertions share a line there is no further tie-break:
    /// the first one found wins.
    pub fn assertion_at_line(&self, line: u32) -> Option<&AssertionExpr> {
        self.assertions.iter().find(|expr| expr.start.line == line)
    }
}
