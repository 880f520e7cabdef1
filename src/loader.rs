//! Document loading and markup-to-text conversion.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr|h[1-6])\s*>").unwrap()
});

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").unwrap());

static RE_SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\u{a0}]+").unwrap());

/// Read the documentation export and normalize line endings.
/// Markup is left intact for the section splitter.
pub fn load(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(normalize_newlines(&raw))
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Convert a markup fragment to plain text, keeping paragraph structure.
///
/// Block-level breaks become newlines, every other tag is dropped, entities
/// are decoded, whitespace inside each line collapses to single spaces and
/// consecutive blank lines collapse to one.
pub fn html_to_text(fragment: &str) -> String {
    // Source newlines are layout only; breaks come from the markup
    let flat = fragment.replace('\n', " ");
    let broken = RE_LINE_BREAK.replace_all(&flat, "\n");
    let stripped = RE_TAG.replace_all(&broken, "");
    let decoded = html_escape::decode_html_entities(&stripped);

    let mut out = String::new();
    let mut blank_pending = false;
    for line in decoded.lines() {
        let line = collapse_whitespace(line);
        if line.is_empty() {
            blank_pending = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_pending {
                out.push('\n');
            }
        }
        out.push_str(&line);
        blank_pending = false;
    }
    out
}

/// Convert a markup fragment to a single line of text.
pub fn inline_text(fragment: &str) -> String {
    let stripped = RE_TAG.replace_all(fragment, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    collapse_whitespace(&decoded)
}

fn collapse_whitespace(text: &str) -> String {
    RE_SPACE_RUN.replace_all(text, " ").trim().to_string()
}
