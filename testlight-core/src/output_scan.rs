// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scanning raw runner output.
//!
//! Runner stdout/stderr chunks arrive with terminal escape sequences
//! embedded. This module strips them and recognizes the two markers the
//! session reacts to: the snapshot-failure line and the watch-mode usage
//! banner.

use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Marker substring identifying a snapshot-assertion failure in runner
/// output.
pub const SNAPSHOT_FAILURE_MARKER: &str = "snapshot test failed";

/// Banner the runner prints while idling in watch mode; noise, not worth
/// forwarding to the log.
pub const WATCH_USAGE_BANNER: &str = "Watch Usage";

/// CSI-style escape sequences: ESC (U+001B) or the single-byte CSI
/// introducer (U+009B), then intermediate bytes, optional numeric
/// parameters, and a final byte.
static ANSI_ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{1b}\u{9b}][\\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]")
        .expect("ANSI escape pattern is valid")
});

/// Strips CSI-style escape sequences from a chunk of runner output.
pub fn strip_ansi_escapes(chunk: &str) -> Cow<'_, str> {
    ANSI_ESCAPE_REGEX.replace_all(chunk, "")
}

/// Returns true if `chunk`, after escape stripping, contains the
/// snapshot-failure marker.
///
/// Detection is pure and per-chunk; the caller decides whether a positive
/// result triggers the snapshot-update workflow (and ignores it when that
/// workflow is disabled).
pub fn detect_snapshot_failure(chunk: &str) -> bool {
    strip_ansi_escapes(chunk).contains(SNAPSHOT_FAILURE_MARKER)
}

/// Returns true if `chunk` is the watch-mode usage banner.
pub fn is_watch_usage_banner(chunk: &str) -> bool {
    chunk.contains(WATCH_USAGE_BANNER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_sequences() {
        let chunk = "\u{1b}[31mFAILED\u{1b}[0m snapshot test failed";
        assert_eq!(strip_ansi_escapes(chunk), "FAILED snapshot test failed");
        assert!(detect_snapshot_failure(chunk));
    }

    #[test]
    fn strips_the_single_byte_csi_introducer() {
        let chunk = "\u{9b}1mbold\u{9b}0m";
        assert_eq!(strip_ansi_escapes(chunk), "bold");
    }

    #[test]
    fn strips_multi_parameter_sequences() {
        let chunk = "\u{1b}[1;31;4munderlined red\u{1b}[0m";
        assert_eq!(strip_ansi_escapes(chunk), "underlined red");
    }

    #[test]
    fn plain_text_passes_through_borrowed() {
        let chunk = "Tests: 3 passed, 3 total";
        assert!(matches!(strip_ansi_escapes(chunk), Cow::Borrowed(_)));
    }

    #[test]
    fn detection_requires_the_marker() {
        assert!(!detect_snapshot_failure("Tests: 1 failed, 3 total"));
        assert!(detect_snapshot_failure("1 snapshot test failed."));
        // The marker may itself be interrupted by escapes around it.
        assert!(detect_snapshot_failure(
            "\u{1b}[1msnapshot test failed\u{1b}[0m"
        ));
    }

    #[test]
    fn recognizes_the_watch_banner() {
        assert!(is_watch_usage_banner("Watch Usage: Press w to show more."));
        assert!(!is_watch_usage_banner("Ran all test suites."));
    }
}
