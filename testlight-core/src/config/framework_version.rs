// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;

/// The major version assumed when none can be detected.
pub const FALLBACK_MAJOR_VERSION: u64 = 18;

/// The oldest major version that reports selective re-runs in a form the
/// reconciler fully understands. Older frameworks work, with a warning.
pub const RECOMMENDED_MAJOR_VERSION: u64 = 20;

/// The subset of the framework's package metadata we care about.
#[derive(Debug, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    version: Option<String>,
}

/// Reads the test framework's major version from its package metadata.
///
/// Returns [`FALLBACK_MAJOR_VERSION`] when no path is configured, the file
/// is missing, the JSON is malformed, the version field is absent, or the
/// version does not start with an integer. None of these are surfaced as
/// failures; the version only ever affects a warning.
pub fn detect_major_version(package_json: Option<&Utf8Path>) -> u64 {
    let Some(path) = package_json else {
        debug!("no package metadata configured, assuming major version {FALLBACK_MAJOR_VERSION}");
        return FALLBACK_MAJOR_VERSION;
    };
    match read_major_version(path) {
        Some(version) => version,
        None => {
            debug!(
                "unable to detect framework version from `{path}`, \
                 assuming major version {FALLBACK_MAJOR_VERSION}"
            );
            FALLBACK_MAJOR_VERSION
        }
    }
}

fn read_major_version(path: &Utf8Path) -> Option<u64> {
    let contents = std::fs::read_to_string(path).ok()?;
    let metadata: PackageMetadata = serde_json::from_str(&contents).ok()?;
    parse_major_version(&metadata.version?)
}

/// Parses the leading integer out of a version string (`"20.0.3"` -> 20).
fn parse_major_version(version: &str) -> Option<u64> {
    let end = version
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(version.len());
    version[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use test_case::test_case;

    #[test_case("20.0.3", Some(20); "plain semver")]
    #[test_case("18.2.0-beta.1", Some(18); "prerelease")]
    #[test_case("21", Some(21); "bare major")]
    #[test_case("next", None; "non-numeric")]
    #[test_case("", None; "empty")]
    fn major_version_parsing(version: &str, expected: Option<u64>) {
        assert_eq!(parse_major_version(version), expected);
    }

    #[test]
    fn detects_version_from_package_metadata() {
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "jest", "version": "23.6.0"}"#).unwrap();
        assert_eq!(detect_major_version(Some(&path)), 23);
    }

    #[test]
    fn falls_back_to_18() {
        // No path configured.
        assert_eq!(detect_major_version(None), FALLBACK_MAJOR_VERSION);

        let dir = Utf8TempDir::new().unwrap();

        // Missing file.
        let missing = dir.path().join("package.json");
        assert_eq!(detect_major_version(Some(&missing)), FALLBACK_MAJOR_VERSION);

        // Malformed JSON.
        let malformed = dir.path().join("malformed.json");
        std::fs::write(&malformed, "{ nope").unwrap();
        assert_eq!(
            detect_major_version(Some(&malformed)),
            FALLBACK_MAJOR_VERSION
        );

        // Missing version field.
        let versionless = dir.path().join("versionless.json");
        std::fs::write(&versionless, r#"{"name": "jest"}"#).unwrap();
        assert_eq!(
            detect_major_version(Some(&versionless)),
            FALLBACK_MAJOR_VERSION
        );

        // Unparsable version.
        let unparsable = dir.path().join("unparsable.json");
        std::fs::write(&unparsable, r#"{"version": "latest"}"#).unwrap();
        assert_eq!(
            detect_major_version(Some(&unparsable)),
            FALLBACK_MAJOR_VERSION
        );
    }
}
