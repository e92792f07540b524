// crates/separate_snippets/src/lib.rs

//! Splits tagged regions of source files into standalone snippet files.
//!
//! Files are discovered under the configured root, scanned for
//! `[SNIPPETS_SEPARATION enabled]`, and every `[START x]` / `[END x]` pair
//! in an enabled file is normalized and written to
//! `<output>/<file-slug>/x.<ext>`. Processing is sequential and stops at the
//! first error.

pub mod config;
pub mod output;
pub mod processor;

use std::fmt;

use anyhow::{Context, Result};
use find_source_files::find_source_files;

pub use config::SeparateConfig;
pub use output::{DryRunWriter, FsSnippetWriter, SnippetWriter};
pub use processor::{process_file, FileReport};

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_enabled: usize,
    pub snippets_written: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned {} file(s), {} with snippets enabled, {} snippet(s) written",
            self.files_scanned, self.files_enabled, self.snippets_written
        )
    }
}

/// Runs extraction with the writer implied by `config.dry_run`.
pub fn run(config: &SeparateConfig) -> Result<RunSummary> {
    if config.dry_run {
        run_with_writer(config, &DryRunWriter)
    } else {
        run_with_writer(config, &FsSnippetWriter)
    }
}

pub fn run_with_writer(config: &SeparateConfig, writer: &dyn SnippetWriter) -> Result<RunSummary> {
    let files = find_source_files(&config.root, &config.discovery_options())
        .with_context(|| format!("Failed to scan {} for source files", config.root.display()))?;

    let mut summary = RunSummary::default();
    for file in &files {
        let report = process_file(file, config, writer)?;
        summary.files_scanned += 1;
        if report.enabled {
            summary.files_enabled += 1;
            summary.snippets_written += report.written.len();
        }
    }
    Ok(summary)
}
