// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core reconciliation and annotation logic for testlight.
//!
//! testlight maps statically parsed test declarations to the results of an
//! asynchronous test run, producing inline status decorations and workspace
//! diagnostics for an editor host. The two views disagree in shape -- syntax
//! positions on one side, runtime names and stack lines on the other -- and
//! a run may cover only a subset of the declared tests, so reconciliation
//! has to be total: every declared test resolves to a status, with "the
//! runner didn't mention it" a first-class outcome.
//!
//! The host drives everything through a [`session::RunSession`]: runner
//! notifications go in through [`session::RunSession::handle_event`], and
//! decorations, diagnostics, and log lines come out through an
//! [`events::EditorSink`] implementation. Launching the runner, parsing
//! source text, and rendering are the host's job, not this crate's.

pub mod annotations;
pub mod config;
pub mod errors;
pub mod events;
pub mod output_scan;
pub mod reconciler;
pub mod session;
pub mod test_files;
