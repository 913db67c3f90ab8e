// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testlight.

use thiserror::Error;

/// An error that occurred while compiling a
/// [`TestFileMatcher`](crate::test_files::TestFileMatcher) from settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestFileMatcherError {
    /// One of the configured test-match globs failed to compile.
    #[error("invalid test-match glob `{glob}`")]
    InvalidGlob {
        /// The pattern as configured.
        glob: String,

        /// The underlying globset error.
        #[source]
        error: globset::Error,
    },

    /// The fallback test-name regex failed to compile.
    #[error("invalid test-name regex `{regex}`")]
    InvalidRegex {
        /// The pattern as configured.
        regex: String,

        /// The underlying regex error.
        #[source]
        error: regex::Error,
    },
}

/// An error that occurred while deserializing host-provided settings JSON.
#[derive(Debug, Error)]
#[error("failed to parse testlight settings")]
pub struct SettingsParseError {
    #[source]
    error: serde_json::Error,
}

impl SettingsParseError {
    pub(crate) fn new(error: serde_json::Error) -> Self {
        Self { error }
    }
}
