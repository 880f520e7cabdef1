//! Description extractor — free text after the signature block.

use crate::loader::html_to_text;

/// Phrases that mark a function as deprecated, matched case-insensitively.
const DEPRECATION_MARKERS: &[&str] = &["deprecated"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub deprecated: bool,
}

/// Convert the remaining markup of a section into description text.
pub fn extract(html: &str) -> Description {
    let text = html_to_text(html);
    let deprecated = is_deprecated(&text);
    Description { text, deprecated }
}

pub fn is_deprecated(text: &str) -> bool {
    let lower = text.to_lowercase();
    DEPRECATION_MARKERS.iter().any(|m| lower.contains(m))
}
