// crates/find_source_files/src/lib.rs

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A candidate file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path used to read the file.
    pub path: PathBuf,
    /// Path relative to the scan root, `./`-prefixed and `/`-separated.
    /// This is what ends up in generated headers and output directory names.
    pub display_path: String,
}

impl SourceFile {
    pub fn read_lines(&self) -> io::Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().map(String::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Extension without the leading dot, matched exactly.
    pub extension: String,
    /// Directory names skipped wherever they appear.
    pub excluded_dirs: Vec<String>,
    /// Directories skipped entirely (e.g. the output root).
    pub excluded_roots: Vec<PathBuf>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extension: "js".to_string(),
            excluded_dirs: vec!["node_modules".to_string()],
            excluded_roots: Vec::new(),
        }
    }
}

/// True if any component of `relative` is one of the excluded directory names.
pub fn is_excluded(relative: &Path, options: &DiscoveryOptions) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => options
            .excluded_dirs
            .iter()
            .any(|ex| name.to_str() == Some(ex.as_str())),
        _ => false,
    })
}

/// Renders a root-relative path as `./a/b.js`.
pub fn display_path(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("./{}", parts.join("/"))
}

/// Walks `root` and returns every regular file with the configured extension,
/// in a stable order (entries sorted by file name within each directory).
pub fn find_source_files(root: &Path, options: &DiscoveryOptions) -> io::Result<Vec<SourceFile>> {
    let finder = SourceFileFinder::new(root, options)?;
    finder.find()
}

// === Private Implementation === //

struct SourceFileFinder<'a> {
    root: PathBuf,
    excluded_roots: Vec<PathBuf>,
    options: &'a DiscoveryOptions,
}

impl<'a> SourceFileFinder<'a> {
    fn new(root: &Path, options: &'a DiscoveryOptions) -> io::Result<Self> {
        let root = root.canonicalize()?;
        // An output root that does not exist yet has nothing in it to skip.
        let excluded_roots = options
            .excluded_roots
            .iter()
            .filter_map(|p| p.canonicalize().ok())
            .collect();
        Ok(Self {
            root,
            excluded_roots,
            options,
        })
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    fn skip(&self, entry: &DirEntry) -> bool {
        let path = entry.path();
        if self.excluded_roots.iter().any(|ex| path.starts_with(ex)) {
            log::debug!("Skipping excluded root {}", path.display());
            return true;
        }
        entry.file_type().is_dir() && is_excluded(self.relative(path), self.options)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext == self.options.extension)
            .unwrap_or(false)
    }

    fn find(&self) -> io::Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.skip(e));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.has_extension(entry.path()) {
                continue;
            }
            let path = entry.into_path();
            let display_path = display_path(self.relative(&path));
            files.push(SourceFile { path, display_path });
        }

        log::debug!(
            "{} candidate .{} file(s) under {}",
            files.len(),
            self.options.extension,
            self.root.display()
        );
        Ok(files)
    }
}
