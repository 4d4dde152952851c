//! Extracts build target names from `.yourbase.yml`.
//!
//! Only the `build_targets[].name` fields are read; the rest of the build
//! configuration schema belongs to the build tool.

use serde::Deserialize;
use std::path::Path;

use crate::error::Error;
use crate::types::BuildTarget;

/// The configuration could be read but not understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct MalformedConfig {
    pub reason: String,
}

impl MalformedConfig {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Attach the path of the offending file.
    pub fn at(self, path: &Path) -> Error {
        Error::malformed(path, self.reason)
    }
}

#[derive(Debug, Deserialize)]
struct BuildConfigDocument {
    build_targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TargetParser;

impl TargetParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the targets of a configuration document, in declaration order.
    ///
    /// Duplicate names are kept.
    pub fn parse(&self, raw: &str) -> Result<Vec<BuildTarget>, MalformedConfig> {
        let document: BuildConfigDocument =
            serde_yaml::from_str(raw).map_err(|e| MalformedConfig::new(e.to_string()))?;

        document
            .build_targets
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                if entry.name.is_empty() {
                    Err(MalformedConfig::new(format!(
                        "build_targets[{index}]: name must not be empty"
                    )))
                } else {
                    Ok(BuildTarget::new(entry.name))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(targets: &[BuildTarget]) -> Vec<&str> {
        targets.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_parse_targets_in_order() {
        let targets = TargetParser::new()
            .parse("build_targets:\n  - name: foo\n  - name: bar\n")
            .unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo"), BuildTarget::new("bar")]);
    }

    #[test]
    fn test_parse_ignores_other_keys() {
        let raw = r#"
dependencies:
  build:
    - go:1.15
build_targets:
  - name: default
    commands:
      - go test ./...
    environment:
      - CGO_ENABLED=0
  - name: release
    build_after:
      - default
ci:
  builds:
    - name: tests
      build_target: default
"#;
        let targets = TargetParser::new().parse(raw).unwrap();
        assert_eq!(names(&targets), vec!["default", "release"]);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let targets = TargetParser::new()
            .parse("build_targets:\n  - name: a\n  - name: a\n")
            .unwrap();
        assert_eq!(names(&targets), vec!["a", "a"]);
    }

    #[test]
    fn test_parse_empty_target_list() {
        let targets = TargetParser::new().parse("build_targets: []\n").unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_missing_build_targets_is_malformed() {
        assert!(TargetParser::new().parse("not_build_targets: []\n").is_err());
    }

    #[test]
    fn test_non_mapping_document_is_malformed() {
        let parser = TargetParser::new();
        assert!(parser.parse("- name: foo\n").is_err());
        assert!(parser.parse("just a string").is_err());
        assert!(parser.parse("").is_err());
    }

    #[test]
    fn test_invalid_target_entries_are_malformed() {
        let parser = TargetParser::new();
        assert!(parser.parse("build_targets: foo\n").is_err());
        assert!(parser.parse("build_targets:\n  - commands: []\n").is_err());

        let err = parser.parse("build_targets:\n  - name: \"\"\n").unwrap_err();
        assert!(err.reason.contains("build_targets[0]"));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        assert!(TargetParser::new().parse("build_targets: [\n").is_err());
    }

    #[test]
    fn test_malformed_at_path() {
        let err = MalformedConfig::new("bad").at(Path::new("/w/.yourbase.yml"));
        assert!(err.is_malformed_config());
        assert_eq!(err.to_string(), "Malformed build configuration /w/.yourbase.yml: bad");
    }
}
