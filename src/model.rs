//! Data model for parsed ReaScript documentation — emitter-agnostic.

use std::fmt;

/// One anchored block of the documentation, borrowed from the loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSection<'a> {
    /// Value of the `<a name="...">` anchor, e.g. "AddMediaItemToTrack" or "lua_gfx.arc"
    pub identifier: &'a str,
    /// Markup between this anchor and the next one
    pub html: &'a str,
}

/// A single documented parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: String,
    pub optional: bool,
    /// Value from `name = value` notation
    pub default: Option<String>,
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional && self.default.is_none() {
            write!(f, "optional ")?;
        }
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(ref default) = self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// A value on the left-hand side of a documented call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnValue {
    pub ty: String,
    pub name: Option<String>,
    pub optional: bool,
}

/// A validated, fully parsed API function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    /// "reaper", "gfx", "reaper.array"; None for global functions
    pub namespace: Option<String>,
    /// Namespace was written in braces: `{reaper.array}.clear()`
    pub is_method: bool,
    pub returns: Vec<ReturnValue>,
    pub parameters: Vec<ParameterSpec>,
    pub varargs: bool,
    pub description: String,
    pub deprecated: bool,
    pub source_section: String,
    /// Signature text as it appeared in the documentation
    pub signature: String,
}

impl FunctionRecord {
    /// Return types joined with ", ", or None for void functions.
    pub fn return_type(&self) -> Option<String> {
        if self.returns.is_empty() {
            return None;
        }
        Some(
            self.returns
                .iter()
                .map(|r| r.ty.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Documentation language a signature is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Lua,
}

impl Language {
    pub fn label(self) -> &'static str {
        match self {
            Language::Lua => "Lua",
        }
    }
}

/// A function that could not be extracted. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: Language,
    pub section_id: String,
    pub raw_text: String,
    pub reason: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping malformed {} function in section '{}' - {}: '{}'",
            self.kind.label(),
            self.section_id,
            self.reason,
            self.raw_text
        )
    }
}

/// Result of one pass over a document.
#[derive(Debug, Default)]
pub struct Report {
    pub records: Vec<FunctionRecord>,
    pub warnings: Vec<ParseWarning>,
    /// Sections with no definition for the target language
    pub skipped: Vec<String>,
}
