// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::SettingsParseError;
use camino::Utf8PathBuf;
use serde::Deserialize;

/// The conventional fallback pattern for test-file names: anything under a
/// `__tests__` directory, or any `.test.` / `.spec.` source file.
pub const DEFAULT_TEST_REGEX: &str = r"(/__tests__/.*|\.(test|spec))\.[jt]sx?$";

/// Settings supplied by the editor host.
///
/// Field names follow the host's camelCase settings JSON. Every field has a
/// default, so a partial document deserializes cleanly.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Start the runner as soon as a session is created.
    pub auto_start: bool,

    /// Attach inline failure messages next to failing assertions.
    pub enable_inline_error_messages: bool,

    /// Offer the snapshot-update workflow when a snapshot failure is
    /// detected in runner output. When false, detection results are
    /// ignored.
    pub enable_snapshot_update_messages: bool,

    /// The project root. The fallback test-name regex matches against paths
    /// relative to this.
    pub root_path: Utf8PathBuf,

    /// Glob-style test-match patterns. When non-empty, these take
    /// precedence over [`test_regex`](Self::test_regex).
    pub test_match: Vec<String>,

    /// Fallback test-name regex, matched against root-relative,
    /// slash-normalized paths.
    pub test_regex: String,

    /// Location of the test framework's package metadata, for version
    /// detection.
    pub package_json: Option<Utf8PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_start: true,
            enable_inline_error_messages: true,
            enable_snapshot_update_messages: false,
            root_path: Utf8PathBuf::new(),
            test_match: Vec::new(),
            test_regex: DEFAULT_TEST_REGEX.to_owned(),
            package_json: None,
        }
    }
}

impl Settings {
    /// Parses settings from the host's JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsParseError> {
        serde_json::from_str(json).map_err(SettingsParseError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn partial_document_fills_defaults() {
        let json = indoc! {r#"
            {
              "rootPath": "/work/app",
              "testMatch": ["**/*.test.ts"],
              "autoStart": false
            }
        "#};
        let settings = Settings::from_json_str(json).unwrap();
        assert!(!settings.auto_start);
        assert_eq!(settings.root_path, "/work/app");
        assert_eq!(settings.test_match, vec!["**/*.test.ts".to_owned()]);
        assert_eq!(settings.test_regex, DEFAULT_TEST_REGEX);
        assert!(settings.enable_inline_error_messages);
        assert!(settings.package_json.is_none());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let error = Settings::from_json_str("{ not json").unwrap_err();
        assert!(error.to_string().contains("settings"));
    }
}
