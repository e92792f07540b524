// crates/separate_snippets/src/config.rs

use std::path::PathBuf;

use find_source_files::DiscoveryOptions;
use snippet_markers::DEFAULT_PREFIX;
use snippet_normalizer::DEFAULT_REGENERATE_COMMAND;
use snippet_scanner::{DuplicatePolicy, ScanOptions};

/// Directory names never scanned for snippets.
pub const DEPENDENCY_DIRS: &[&str] = &["node_modules"];

/// Runtime configuration for one extraction run, composed from the CLI.
#[derive(Clone, Debug)]
pub struct SeparateConfig {
    /// Directory scanned for source files.
    pub root: PathBuf,
    /// Where snippet directories are written; relative paths are taken from `root`.
    pub output_root: PathBuf,
    /// Source extension without the dot, e.g. `js`.
    pub extension: String,
    pub default_prefix: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Named in every generated header.
    pub regenerate_command: String,
    /// Scan and normalize, but write nothing.
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for SeparateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_root: PathBuf::from("snippets"),
            extension: "js".to_string(),
            default_prefix: DEFAULT_PREFIX.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            regenerate_command: DEFAULT_REGENERATE_COMMAND.to_string(),
            dry_run: false,
            verbose: false,
        }
    }
}

impl SeparateConfig {
    pub fn output_dir(&self) -> PathBuf {
        if self.output_root.is_absolute() {
            self.output_root.clone()
        } else {
            self.root.join(&self.output_root)
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            default_prefix: self.default_prefix.clone(),
            duplicate_policy: self.duplicate_policy,
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            extension: self.extension.clone(),
            excluded_dirs: DEPENDENCY_DIRS.iter().map(|d| d.to_string()).collect(),
            excluded_roots: vec![self.output_dir()],
        }
    }
}
