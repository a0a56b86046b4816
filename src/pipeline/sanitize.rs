//! Post-processing for model output: drops list items that carry no content
//! and keeps at most one blank line in a row.

use std::sync::OnceLock;

use regex::Regex;

/// Bare markers: `-`, `3.`, `12)`, `b)`, `C.` with nothing after them.
fn marker_only() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:-|\d+[.)]|[A-Za-z][.)])$").expect("static marker pattern")
    })
}

/// True for lines that are blank or nothing but a list marker.
pub fn is_hollow(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || marker_only().is_match(trimmed)
}

/// Collapse runs of blank lines to one, dropping leading blanks.
fn collapse_blank_runs<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().map_or(true, |prev| prev.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }
    out
}

/// Remove hollow lines, then collapse blank runs. Lines with content pass
/// through byte-for-byte. Idempotent.
pub fn sanitize(text: &str) -> String {
    collapse_blank_runs(text.lines().filter(|line| !is_hollow(line))).join("\n")
}
