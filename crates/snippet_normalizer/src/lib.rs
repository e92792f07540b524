// crates/snippet_normalizer/src/lib.rs

//! Turns the raw lines of one snippet into a standalone file.
//!
//! The steps run in a fixed order, each one a plain `Vec<String>` transform:
//!
//!  1. rewrite single-line `const { .. } = require(..)` into `import`,
//!  2. prefix the names in `[START ..]` / `[END ..]` markers,
//!  3. flatten the common indentation,
//!  4. drop the blank line that usually follows the start marker,
//!  5. prepend the provenance header.

use snippet_markers::{end_marker, is_comment_line, require_import, start_marker};

/// Command named in the header as the way to regenerate snippet files.
pub const DEFAULT_REGENERATE_COMMAND: &str = "npm run snippets";

/// A snippet after all body transforms, ready to be rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSnippet {
    /// Display path of the file the snippet came from.
    pub source_path: String,
    pub body: Vec<String>,
}

impl NormalizedSnippet {
    pub fn from_raw<S: AsRef<str>>(raw_lines: &[S], source_path: &str, prefix: &str) -> Self {
        let lines: Vec<String> = raw_lines.iter().map(|l| l.as_ref().to_string()).collect();
        let lines = rewrite_imports(lines);
        let lines = prefix_markers(lines, prefix);
        let lines = flatten_indentation(lines);
        let body = remove_leading_blank(lines);
        Self {
            source_path: source_path.to_string(),
            body,
        }
    }

    /// Header, a blank separator, then the body, joined with `\n`.
    pub fn render(&self, regenerate_command: &str) -> String {
        let mut out = provenance_header(&self.source_path, regenerate_command);
        out.push(String::new());
        out.extend(self.body.iter().cloned());
        out.join("\n")
    }
}

/// Normalizes `raw_lines` and renders them with the default header.
pub fn normalize<S: AsRef<str>>(raw_lines: &[S], source_path: &str, prefix: &str) -> String {
    NormalizedSnippet::from_raw(raw_lines, source_path, prefix).render(DEFAULT_REGENERATE_COMMAND)
}

/// `const { A, B } = require(M)` becomes `import {A, B} from M`; the rest of
/// the line is kept. Multi-line requires are left alone.
pub fn rewrite_imports(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| match require_import(&line) {
            Some(found) => format!(
                "{}import {{{}}} from {}{}",
                &line[..found.range.start],
                found.idents,
                found.module,
                &line[found.range.end..]
            ),
            None => line,
        })
        .collect()
}

pub fn prefix_markers(lines: Vec<String>, prefix: &str) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| {
            let line = match start_marker(&line) {
                Some(m) => m.rename(&line, &format!("{}{}", prefix, m.name)),
                None => line,
            };
            match end_marker(&line) {
                Some(m) => m.rename(&line, &format!("{}{}", prefix, m.name)),
                None => line,
            }
        })
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Strips the smallest indentation found on a non-blank line from every line.
/// Blank lines come out empty.
pub fn flatten_indentation(lines: Vec<String>) -> Vec<String> {
    let min_indent = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| {
            if is_blank(&line) {
                String::new()
            } else {
                line.chars().skip(min_indent).collect()
            }
        })
        .collect()
}

/// Removes the first non-comment line if it is blank.
pub fn remove_leading_blank(mut lines: Vec<String>) -> Vec<String> {
    if let Some(idx) = lines.iter().position(|l| !is_comment_line(l)) {
        if is_blank(&lines[idx]) {
            lines.remove(idx);
        }
    }
    lines
}

pub fn provenance_header(source_path: &str, regenerate_command: &str) -> Vec<String> {
    vec![
        "// This snippet file was generated by processing the source file:".to_string(),
        format!("// {}", source_path),
        "//".to_string(),
        format!(
            "// To update the snippets in this file, edit the source and then run '{}'.",
            regenerate_command
        ),
    ]
}
