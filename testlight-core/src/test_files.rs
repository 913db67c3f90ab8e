// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deciding whether a file participates in the test suite.
//!
//! The main type is [`TestFileMatcher`], compiled once from [`Settings`].

use crate::{config::Settings, errors::TestFileMatcherError};
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;

/// Decides whether a path is a test file under the project's conventions.
///
/// Glob-style test-match patterns, when configured, take precedence over the
/// fallback test-name regex; the regex is only consulted when the glob list
/// is empty. Matchers are compiled once at construction -- a settings change
/// builds a new matcher rather than mutating this one.
#[derive(Debug)]
pub struct TestFileMatcher {
    /// Compiled glob matchers, applied to the absolute path. `None` when no
    /// patterns are configured.
    globs: Option<DebugIgnore<GlobSet>>,

    /// Fallback regex, applied to the root-relative, slash-normalized path.
    test_regex: DebugIgnore<Regex>,

    root_path: Utf8PathBuf,
}

impl TestFileMatcher {
    /// Compiles a matcher from the given settings.
    pub fn new(settings: &Settings) -> Result<Self, TestFileMatcherError> {
        let globs = if settings.test_match.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &settings.test_match {
                // globset matches dot-files by default, which is what the
                // runner's own matching does.
                let glob = GlobBuilder::new(pattern)
                    .backslash_escape(false)
                    .build()
                    .map_err(|error| TestFileMatcherError::InvalidGlob {
                        glob: pattern.clone(),
                        error,
                    })?;
                builder.add(glob);
            }
            let set = builder.build().map_err(|error| {
                let glob = error.glob().unwrap_or("<unknown>").to_owned();
                TestFileMatcherError::InvalidGlob { glob, error }
            })?;
            Some(DebugIgnore(set))
        };

        let test_regex =
            Regex::new(&settings.test_regex).map_err(|error| TestFileMatcherError::InvalidRegex {
                regex: settings.test_regex.clone(),
                error,
            })?;

        Ok(Self {
            globs,
            test_regex: DebugIgnore(test_regex),
            root_path: settings.root_path.clone(),
        })
    }

    /// Returns true if the runner would treat `path` as a test file.
    ///
    /// `path` is expected to be absolute. Paths outside the project root are
    /// fine: the fallback regex is matched against the `..`-prefixed
    /// relative path.
    pub fn is_test_file(&self, path: &Utf8Path) -> bool {
        if let Some(globs) = &self.globs {
            return globs.is_match(path.as_str());
        }
        let relative = relative_to_root(&self.root_path, path);
        self.test_regex
            .find(&relative)
            .is_some_and(|m| !m.is_empty())
    }
}

/// Computes `path` relative to `root`, normalized to forward slashes.
fn relative_to_root(root: &Utf8Path, path: &Utf8Path) -> String {
    let relative = pathdiff::diff_utf8_paths(path, root).unwrap_or_else(|| path.to_owned());
    if std::path::MAIN_SEPARATOR == '\\' {
        relative.as_str().replace('\\', "/")
    } else {
        relative.into_string()
    }
}
