// crates/separate_snippets/src/output.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// `./src/auth.v9.js` → `src/auth-v9`.
///
/// Drops the source extension and the leading `./`, then turns every
/// remaining `.` into `-`.
pub fn file_slug(display_path: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    let without_ext = display_path.strip_suffix(&suffix).unwrap_or(display_path);
    let without_dot_dir = without_ext.strip_prefix("./").unwrap_or(without_ext);
    without_dot_dir.replace('.', "-")
}

pub fn snippet_dir(output_root: &Path, display_path: &str, extension: &str) -> PathBuf {
    output_root.join(file_slug(display_path, extension))
}

/// Uses the raw, unprefixed snippet name.
pub fn snippet_file_name(name: &str, extension: &str) -> String {
    format!("{}.{}", name, extension)
}

/// Where generated snippet text goes.
pub trait SnippetWriter {
    /// Writes `content` to `dir/file_name`, creating `dir` if needed.
    fn write_snippet(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf>;
}

/// Writes snippet files to disk.
pub struct FsSnippetWriter;

impl SnippetWriter for FsSnippetWriter {
    fn write_snippet(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create snippet directory {}", dir.display()))?;
        let path = dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write snippet {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

/// Reports where each snippet would go without touching the disk.
pub struct DryRunWriter;

impl SnippetWriter for DryRunWriter {
    fn write_snippet(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        log::info!("[dry-run] {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}
