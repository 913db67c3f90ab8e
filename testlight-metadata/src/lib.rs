// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured data model for [testlight](https://crates.io/crates/testlight-core).
//!
//! Two independently-produced views of a test suite cross the testlight
//! process boundary: the *parse-side* view (declared tests and assertion
//! call sites with source positions, produced by a syntax parser) and the
//! *run-side* view (assertion results keyed by file and test name, produced
//! by the test runner). This crate defines both, so the parser, the runner
//! glue, and the reconciliation core in `testlight-core` agree on shapes.
//!
//! Nothing here executes tests or parses source text.

mod errors;
mod parse_model;
mod run_results;

pub use errors::*;
pub use parse_model::*;
pub use run_results::*;
