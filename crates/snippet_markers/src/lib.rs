// crates/snippet_markers/src/lib.rs

//! Marker grammar shared by the scanner and the normalizer.
//!
//! Every marker lives inside a source comment:
//!
//!  * `[SNIPPETS_SEPARATION enabled]` opts a file into extraction,
//!  * `[SNIPPETS_PREFIX name_]` overrides the prefix for that file,
//!  * `[START name]` / `[END name]` bracket one snippet.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix applied to snippet names when a file does not override it.
pub const DEFAULT_PREFIX: &str = "modular_";

/// Lines starting with this are treated as comments by the normalizer.
pub const COMMENT_PREFIX: &str = "//";

// ---------------------------------------------------------------------------
//  Regexes
// ---------------------------------------------------------------------------

static ENABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[SNIPPETS_SEPARATION\s+enabled\]").unwrap());

static PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[SNIPPETS_PREFIX\s+([A-Za-z0-9_]+)\]").unwrap());

static START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[START\s+([A-Za-z_]+)\s*\]").unwrap());

static END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[END\s+([A-Za-z_]+)\s*\]").unwrap());

// `const { a, b } = require('./m')`, single line only
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"const\s*\{\s*(.+?)\s*\}\s*=\s*require\((.+?)\)").unwrap());

/// A boundary marker found on a line: the captured name and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    pub name: &'a str,
    /// Byte range of `name` inside the line.
    pub range: Range<usize>,
}

impl<'a> MarkerMatch<'a> {
    /// Returns `line` with the marker name replaced by `new_name`.
    pub fn rename(&self, line: &str, new_name: &str) -> String {
        let mut out = String::with_capacity(line.len() + new_name.len());
        out.push_str(&line[..self.range.start]);
        out.push_str(new_name);
        out.push_str(&line[self.range.end..]);
        out
    }
}

fn capture_name<'a>(re: &Regex, line: &'a str) -> Option<MarkerMatch<'a>> {
    let m = re.captures(line)?.get(1)?;
    Some(MarkerMatch {
        name: m.as_str(),
        range: m.range(),
    })
}

/// True if the line carries the `[SNIPPETS_SEPARATION enabled]` marker.
pub fn is_enable_marker(line: &str) -> bool {
    ENABLE_RE.is_match(line)
}

/// The identifier of a `[SNIPPETS_PREFIX ...]` marker, if present.
pub fn prefix_override(line: &str) -> Option<&str> {
    PREFIX_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn start_marker(line: &str) -> Option<MarkerMatch<'_>> {
    capture_name(&START_RE, line)
}

pub fn end_marker(line: &str) -> Option<MarkerMatch<'_>> {
    capture_name(&END_RE, line)
}

/// A single-line destructured `require` found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireImport<'a> {
    /// Identifier list, surrounding whitespace excluded.
    pub idents: &'a str,
    /// Module expression, verbatim.
    pub module: &'a str,
    /// Byte range of the whole `const ... require(...)` expression.
    pub range: Range<usize>,
}

pub fn require_import(line: &str) -> Option<RequireImport<'_>> {
    let caps = REQUIRE_RE.captures(line)?;
    Some(RequireImport {
        idents: caps.get(1)?.as_str(),
        module: caps.get(2)?.as_str(),
        range: caps.get(0)?.range(),
    })
}

pub fn is_comment_line(line: &str) -> bool {
    line.starts_with(COMMENT_PREFIX)
}
