// crates/snippet_scanner/src/lib.rs

//! Reads the raw lines of one source file and collects its tagged snippets.
//!
//! Scanning is a single left-to-right pass. A file without the
//! `[SNIPPETS_SEPARATION enabled]` marker is reported as disabled and nothing
//! else is looked at.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use snippet_markers::{end_marker, is_enable_marker, prefix_override, start_marker, DEFAULT_PREFIX};
use thiserror::Error;

/// What to do when a file opens the same snippet name twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the scan with [`ScanError::DuplicateSnippet`].
    #[default]
    Reject,
    /// The later pair replaces the earlier one, keeping its original position.
    Overwrite,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            other => Err(format!(
                "unknown duplicate policy '{}' (expected 'reject' or 'overwrite')",
                other
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => f.write_str("reject"),
            DuplicatePolicy::Overwrite => f.write_str("overwrite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Prefix used when the file has no `[SNIPPETS_PREFIX ...]` marker.
    pub default_prefix: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            default_prefix: DEFAULT_PREFIX.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Structural problems in a file's markers. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("{}:{line}: mismatched tags, expected [END {expected}] but found [END {found}]", .path.display())]
    MismatchedTags {
        path: PathBuf,
        line: usize,
        expected: String,
        found: String,
    },
    #[error("{}:{line}: found [END {found}] with no open snippet", .path.display())]
    UnopenedEnd {
        path: PathBuf,
        line: usize,
        found: String,
    },
    #[error("{}: snippet '{name}' opened on line {line} is never closed", .path.display())]
    Unterminated {
        path: PathBuf,
        line: usize,
        name: String,
    },
    #[error("{}:{line}: snippet '{name}' is defined more than once", .path.display())]
    DuplicateSnippet {
        path: PathBuf,
        line: usize,
        name: String,
    },
}

/// One tagged region, start and end marker lines included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub lines: Vec<String>,
}

/// Everything the scanner learned about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub enabled: bool,
    pub prefix: String,
    /// In order of first appearance in the file.
    pub snippets: Vec<Snippet>,
}

impl ExtractionConfig {
    fn disabled(prefix: &str) -> Self {
        Self {
            enabled: false,
            prefix: prefix.to_string(),
            snippets: Vec::new(),
        }
    }

    pub fn snippet(&self, name: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.name == name)
    }

    pub fn snippet_names(&self) -> impl Iterator<Item = &str> {
        self.snippets.iter().map(|s| s.name.as_str())
    }
}

/// Scans the lines of the file at `path`.
///
/// `path` is only used to label errors; nothing is read from disk.
pub fn scan<S: AsRef<str>>(
    lines: &[S],
    path: &Path,
    options: &ScanOptions,
) -> Result<ExtractionConfig, ScanError> {
    if !lines.iter().any(|l| is_enable_marker(l.as_ref())) {
        return Ok(ExtractionConfig::disabled(&options.default_prefix));
    }

    let prefix = lines
        .iter()
        .find_map(|l| prefix_override(l.as_ref()))
        .unwrap_or(options.default_prefix.as_str())
        .to_string();

    let mut snippets: Vec<Snippet> = Vec::new();
    // (index into `snippets`, line number of its start marker)
    let mut open: Option<(usize, usize)> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_no = idx + 1;

        if let Some(start) = start_marker(line) {
            // Markers do not nest; the open snippet never got its end marker.
            if let Some((prev, opened_at)) = open {
                return Err(ScanError::Unterminated {
                    path: path.to_path_buf(),
                    line: opened_at,
                    name: snippets[prev].name.clone(),
                });
            }
            let slot = match snippets.iter().position(|s| s.name == start.name) {
                Some(existing) => match options.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(ScanError::DuplicateSnippet {
                            path: path.to_path_buf(),
                            line: line_no,
                            name: start.name.to_string(),
                        });
                    }
                    DuplicatePolicy::Overwrite => {
                        log::debug!(
                            "{}:{}: overwriting earlier snippet '{}'",
                            path.display(),
                            line_no,
                            start.name
                        );
                        snippets[existing].lines.clear();
                        existing
                    }
                },
                None => {
                    snippets.push(Snippet {
                        name: start.name.to_string(),
                        lines: Vec::new(),
                    });
                    snippets.len() - 1
                }
            };
            open = Some((slot, line_no));
        }

        if let Some((slot, _)) = open {
            snippets[slot].lines.push(line.to_string());
        }

        if let Some(end) = end_marker(line) {
            let (slot, _) = open.ok_or_else(|| ScanError::UnopenedEnd {
                path: path.to_path_buf(),
                line: line_no,
                found: end.name.to_string(),
            })?;
            if snippets[slot].name != end.name {
                return Err(ScanError::MismatchedTags {
                    path: path.to_path_buf(),
                    line: line_no,
                    expected: snippets[slot].name.clone(),
                    found: end.name.to_string(),
                });
            }
            open = None;
        }
    }

    if let Some((slot, line)) = open {
        return Err(ScanError::Unterminated {
            path: path.to_path_buf(),
            line,
            name: snippets[slot].name.clone(),
        });
    }

    Ok(ExtractionConfig {
        enabled: true,
        prefix,
        snippets,
    })
}

/// Convenience wrapper over [`scan`] for a whole file's content.
pub fn scan_content(
    content: &str,
    path: &Path,
    options: &ScanOptions,
) -> Result<ExtractionConfig, ScanError> {
    let lines: Vec<&str> = content.lines().collect();
    scan(&lines, path, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_default(content: &str) -> Result<ExtractionConfig, ScanError> {
        scan_content(content, Path::new("./src/app.js"), &ScanOptions::default())
    }

    #[test]
    fn test_disabled_without_enable_marker() {
        let content = "\
// [SNIPPETS_PREFIX custom_]
// [START foo]
foo();
// [END bar]";
        let config = scan_default(content).unwrap();
        assert!(!config.enabled);
        assert!(config.snippets.is_empty());
    }

    #[test]
    fn test_default_prefix() {
        let config = scan_default("// [SNIPPETS_SEPARATION enabled]").unwrap();
        assert!(config.enabled);
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn test_prefix_override_anywhere_in_file() {
        let content = "\
// [START a]
a();
// [END a]
// [SNIPPETS_PREFIX web_]
// [SNIPPETS_SEPARATION enabled]";
        let config = scan_default(content).unwrap();
        assert_eq!(config.prefix, "web_");
    }

    #[test]
    fn test_snippet_bounds_are_inclusive() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
function outer() {
  // [START inner]
  inner();
  more();
  // [END inner]
}";
        let config = scan_default(content).unwrap();
        let snippet = config.snippet("inner").unwrap();
        assert_eq!(snippet.lines.len(), 5 - 2 + 1);
        assert_eq!(snippet.lines.first().unwrap(), "  // [START inner]");
        assert_eq!(snippet.lines.last().unwrap(), "  // [END inner]");
    }

    #[test]
    fn test_snippets_keep_file_order() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START zeta]
// [END zeta]
// [START alpha]
// [END alpha]";
        let config = scan_default(content).unwrap();
        let names: Vec<&str> = config.snippet_names().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_mismatched_tags() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START foo]
foo();
// [END bar]";
        let err = scan_default(content).unwrap_err();
        assert_eq!(
            err,
            ScanError::MismatchedTags {
                path: PathBuf::from("./src/app.js"),
                line: 4,
                expected: "foo".into(),
                found: "bar".into(),
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("foo") && msg.contains("bar") && msg.contains("./src/app.js"));
    }

    #[test]
    fn test_end_without_start() {
        let content = "// [SNIPPETS_SEPARATION enabled]\n// [END foo]";
        let err = scan_default(content).unwrap_err();
        assert!(matches!(err, ScanError::UnopenedEnd { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_snippet() {
        let content = "// [SNIPPETS_SEPARATION enabled]\n// [START foo]\nfoo();";
        let err = scan_default(content).unwrap_err();
        assert_eq!(
            err,
            ScanError::Unterminated {
                path: PathBuf::from("./src/app.js"),
                line: 2,
                name: "foo".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START foo]
one();
// [END foo]
// [START foo]
two();
// [END foo]";
        let err = scan_default(content).unwrap_err();
        assert!(matches!(err, ScanError::DuplicateSnippet { line: 5, .. }));
    }

    #[test]
    fn test_duplicate_overwrite_keeps_position() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START foo]
one();
// [END foo]
// [START bar]
// [END bar]
// [START foo]
two();
// [END foo]";
        let options = ScanOptions {
            duplicate_policy: DuplicatePolicy::Overwrite,
            ..ScanOptions::default()
        };
        let config = scan_content(content, Path::new("a.js"), &options).unwrap();
        let names: Vec<&str> = config.snippet_names().collect();
        assert_eq!(names, vec!["foo", "bar"]);
        assert_eq!(config.snippet("foo").unwrap().lines[1], "two();");
    }

    #[test]
    fn test_start_inside_open_snippet_is_unterminated() {
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START first]
a();
// [START second]
b();
// [END second]";
        let err = scan_default(content).unwrap_err();
        assert_eq!(
            err,
            ScanError::Unterminated {
                path: PathBuf::from("./src/app.js"),
                line: 2,
                name: "first".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("reject".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Reject));
        assert_eq!("Overwrite".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Overwrite));
        assert!("skip".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::Overwrite.to_string(), "overwrite");
    }
}
