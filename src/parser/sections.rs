//! Section splitter — partitions the document on `<a name="...">` anchors.

use crate::model::RawSection;
use regex::{CaptureMatches, Regex};
use std::iter::Peekable;
use std::sync::LazyLock;

static RE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a name="([^"]*?)">"#).unwrap());

static RE_H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h2[\s>]").unwrap());

/// Index sections that list functions rather than define them.
const LIST_SECTIONS: &[&str] = &["eel_list", "lua_list", "python_list", "function_list"];

/// How a section documents its function(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Function index, no definitions
    List,
    /// `lua_*`: signature in the first `<code>` block
    LuaOnly,
    /// `eel_*` / `python_*`
    OtherLanguage,
    /// `<div class="c_func|e_func|l_func|p_func">` blocks
    MultiLanguage,
}

impl SectionKind {
    pub fn of(identifier: &str) -> Self {
        if LIST_SECTIONS.contains(&identifier) {
            SectionKind::List
        } else if identifier.starts_with("lua_") {
            SectionKind::LuaOnly
        } else if identifier.starts_with("eel_") || identifier.starts_with("python_") {
            SectionKind::OtherLanguage
        } else {
            SectionKind::MultiLanguage
        }
    }
}

/// Lazy iterator over the anchored sections of a document, in source order.
pub struct Sections<'a> {
    text: &'a str,
    anchors: Peekable<CaptureMatches<'static, 'a>>,
}

/// Split a document into sections. Text before the first anchor is not a section.
pub fn split(text: &str) -> Sections<'_> {
    Sections {
        text,
        anchors: RE_ANCHOR.captures_iter(text).peekable(),
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = RawSection<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.anchors.next()?;
        let whole = caps.get(0)?;
        let identifier = caps.get(1).map_or("", |m| m.as_str());
        let end = match self.anchors.peek() {
            Some(next) => next.get(0).map_or(self.text.len(), |m| m.start()),
            None => self.text.len(),
        };
        Some(RawSection {
            identifier,
            html: &self.text[whole.end()..end],
        })
    }
}

/// Section content up to its first `<h2>` heading, which opens the next category.
pub fn body<'a>(section: &RawSection<'a>) -> &'a str {
    match RE_H2.find(section.html) {
        Some(m) => &section.html[..m.start()],
        None => section.html,
    }
}
