// crates/separate_snippets/src/processor.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use find_source_files::SourceFile;
use snippet_normalizer::NormalizedSnippet;
use snippet_scanner::scan;

use crate::config::SeparateConfig;
use crate::output::{snippet_dir, snippet_file_name, SnippetWriter};

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub display_path: String,
    pub enabled: bool,
    /// One entry per snippet, in file order.
    pub written: Vec<PathBuf>,
}

/// Scans one file and hands every snippet, normalized, to `writer`.
///
/// Files without the enable marker are skipped. Marker errors abort with the
/// scanner's error, which names the file and the offending snippet.
pub fn process_file(
    file: &SourceFile,
    config: &SeparateConfig,
    writer: &dyn SnippetWriter,
) -> Result<FileReport> {
    let lines = file
        .read_lines()
        .with_context(|| format!("Failed to read {}", file.path.display()))?;

    let extraction = scan(&lines, Path::new(&file.display_path), &config.scan_options())?;
    if !extraction.enabled {
        log::debug!("{}: extraction not enabled, skipping", file.display_path);
        return Ok(FileReport {
            display_path: file.display_path.clone(),
            enabled: false,
            written: Vec::new(),
        });
    }

    let dir = snippet_dir(&config.output_dir(), &file.display_path, &config.extension);
    log::info!(
        "{}: {} snippet(s) with prefix '{}' -> {}",
        file.display_path,
        extraction.snippets.len(),
        extraction.prefix,
        dir.display()
    );

    let mut written = Vec::with_capacity(extraction.snippets.len());
    for snippet in &extraction.snippets {
        let normalized =
            NormalizedSnippet::from_raw(&snippet.lines, &file.display_path, &extraction.prefix);
        let content = normalized.render(&config.regenerate_command);
        let file_name = snippet_file_name(&snippet.name, &config.extension);
        written.push(writer.write_snippet(&dir, &file_name, &content)?);
    }

    Ok(FileReport {
        display_path: file.display_path.clone(),
        enabled: true,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Records every write instead of touching the disk.
    #[derive(Default)]
    struct RecordingWriter {
        writes: RefCell<Vec<(PathBuf, String)>>,
    }

    impl SnippetWriter for RecordingWriter {
        fn write_snippet(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
            let path = dir.join(file_name);
            self.writes.borrow_mut().push((path.clone(), content.to_string()));
            Ok(path)
        }
    }

    /// Always fails, to check that write errors propagate.
    struct FailingWriter;

    impl SnippetWriter for FailingWriter {
        fn write_snippet(&self, _dir: &Path, _file_name: &str, _content: &str) -> Result<PathBuf> {
            Err(anyhow!("Simulated write failure"))
        }
    }

    fn source_file(root: &Path, rel: &str, content: &str) -> SourceFile {
        let path = root.join(rel);
        fs::write(&path, content).unwrap();
        SourceFile {
            path,
            display_path: format!("./{}", rel),
        }
    }

    fn config_for(root: &Path) -> SeparateConfig {
        SeparateConfig {
            root: root.to_path_buf(),
            ..SeparateConfig::default()
        }
    }

    #[test]
    fn test_disabled_file_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let file = source_file(tmp.path(), "plain.js", "// [START a]\n// [END a]\n");
        let writer = RecordingWriter::default();

        let report = process_file(&file, &config_for(tmp.path()), &writer).unwrap();
        assert_eq!(report.display_path, "./plain.js");
        assert!(!report.enabled);
        assert!(writer.writes.borrow().is_empty());
    }

    #[test]
    fn test_each_snippet_is_written_under_the_file_slug() {
        let tmp = TempDir::new().unwrap();
        let content = "\
// [SNIPPETS_SEPARATION enabled]
// [START first]
one();
// [END first]
// [START second]
two();
// [END second]
";
        let file = source_file(tmp.path(), "auth.v9.js", content);
        let writer = RecordingWriter::default();

        let report = process_file(&file, &config_for(tmp.path()), &writer).unwrap();
        assert_eq!(report.display_path, "./auth.v9.js");
        let dir = tmp.path().join("snippets").join("auth-v9");
        assert_eq!(report.written, vec![dir.join("first.js"), dir.join("second.js")]);

        let writes = writer.writes.borrow();
        assert!(writes[0].1.starts_with("// This snippet file was generated"));
        assert!(writes[0].1.contains("// ./auth.v9.js"));
        assert!(writes[0].1.ends_with("// [START modular_first]\none();\n// [END modular_first]"));
    }

    #[test]
    fn test_mismatched_tags_abort() {
        let tmp = TempDir::new().unwrap();
        let content = "// [SNIPPETS_SEPARATION enabled]\n// [START foo]\n// [END bar]\n";
        let file = source_file(tmp.path(), "broken.js", content);

        let err = process_file(&file, &config_for(tmp.path()), &RecordingWriter::default())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("./broken.js"));
        assert!(msg.contains("foo") && msg.contains("bar"));
    }

    #[test]
    fn test_write_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let content = "// [SNIPPETS_SEPARATION enabled]\n// [START a]\n// [END a]\n";
        let file = source_file(tmp.path(), "a.js", content);
        assert!(process_file(&file, &config_for(tmp.path()), &FailingWriter).is_err());
    }

    #[test]
    fn test_unreadable_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let file = SourceFile {
            path: tmp.path().join("missing.js"),
            display_path: "./missing.js".into(),
        };
        let err = process_file(&file, &config_for(tmp.path()), &RecordingWriter::default())
            .unwrap_err();
        assert!(err.to_string().contains("missing.js"));
    }
}
