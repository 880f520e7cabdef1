//! Signature extractor — finds call signatures and splits them into parts.
//!
//! Strategies are tried strictest first:
//!
//! 1. assignment: `integer retval, string buf = reaper.Name(params)`
//! 2. typed:      `MediaItem reaper.Name(params)`
//! 3. bare:       `gfx.arc(params)`
//! 4. embedded:   `... reaper.Name(params) ...` anywhere in the line

use crate::error::ExtractError;
use crate::loader::inline_text;
use crate::model::ReturnValue;
use crate::parser::params::{name_from_type, sanitize_identifier, sanitize_type};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// `{reaper.array}.clear` | `reaper.Foo` | `gfx.arc` | `Foo`
const QUALIFIED_NAME: &str =
    r"\{[A-Za-z_][A-Za-z0-9_.]*\}\.[A-Za-z_][A-Za-z0-9_]*|[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*";

static RE_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<rets>[^=()]+?)\s*=\s*(?P<name>{})\s*\((?P<params>.*)\)\s*;?$",
        QUALIFIED_NAME
    ))
    .unwrap()
});

static RE_TYPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<ret>[A-Za-z_][A-Za-z0-9_.]*\*?)\s+(?P<name>{})\s*\((?P<params>.*)\)\s*;?$",
        QUALIFIED_NAME
    ))
    .unwrap()
});

static RE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<name>{})\s*\((?P<params>.*)\)\s*;?$",
        QUALIFIED_NAME
    ))
    .unwrap()
});

static RE_EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:^|[\s:])(?P<name>{})\s*\((?P<params>[^()]*)\)",
        QUALIFIED_NAME
    ))
    .unwrap()
});

static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code[^>]*>(.*?)</code\s*>").unwrap());

// Only whitespace and line breaks between consecutive signature blocks
static RE_CODE_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\s|<br\s*/?>|&nbsp;)*$").unwrap());

static RE_BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static RE_LUA_FUNC_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\bclass\s*=\s*["'][^"']*\bl_func\b[^"']*["'][^>]*>(.*?)</div\s*>"#)
        .unwrap()
});

static RE_ANY_FUNC_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\bclass\s*=\s*["'][^"']*\b[celp]_func\b[^"']*["'][^>]*>.*?</div\s*>"#)
        .unwrap()
});

/// Types accepted as a lone return value besides Capitalized class names.
const KNOWN_TYPES: &[&str] = &["boolean", "string", "number", "integer", "function", "MediaItem"];

// -- Types --------------------------------------------------------------------

/// Which heuristic recognized a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Assignment,
    Typed,
    Bare,
    Embedded,
}

/// A call signature split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub returns: Vec<ReturnValue>,
    pub namespace: Option<String>,
    pub is_method: bool,
    pub name: String,
    pub raw_params: String,
    pub strategy: Strategy,
}

/// Candidate signature lines of a section and the markup that documents them.
#[derive(Debug, Default)]
pub struct SignatureBlock {
    pub lines: Vec<String>,
    pub description_html: String,
}

// -- Locating signatures ------------------------------------------------------

/// `lua_*` sections: the leading run of `<code>` blocks holds the signature(s);
/// everything after it is description.
pub fn locate_lua_only(body: &str) -> SignatureBlock {
    let mut block = SignatureBlock::default();
    let mut last_end: Option<usize> = None;

    for caps in RE_CODE.captures_iter(body) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some(end) = last_end {
            if !RE_CODE_GAP.is_match(&body[end..whole.start()]) {
                break;
            }
        }
        block.lines.extend(code_lines(inner.as_str()));
        last_end = Some(whole.end());
    }

    block.description_html = match last_end {
        Some(end) => body[end..].to_string(),
        None => body.to_string(),
    };
    block
}

/// Multi-language sections: the Lua signature lives in `<div class="l_func">`.
/// Returns None when the section has no Lua definition.
pub fn locate_multi_language(body: &str) -> Option<SignatureBlock> {
    let caps = RE_LUA_FUNC_DIV.captures(body)?;
    let inner = caps.get(1).map_or("", |m| m.as_str());

    let mut lines = Vec::new();
    for code in RE_CODE.captures_iter(inner) {
        if let Some(m) = code.get(1) {
            lines.extend(code_lines(m.as_str()));
        }
    }
    if lines.is_empty() {
        // No <code> wrapper: take the div text after the language label
        let text = inline_text(inner);
        let text = text.strip_prefix("Lua:").unwrap_or(&text).trim().to_string();
        if !text.is_empty() {
            lines.push(text);
        }
    }

    Some(SignatureBlock {
        lines,
        description_html: RE_ANY_FUNC_DIV.replace_all(body, "").into_owned(),
    })
}

fn code_lines(inner: &str) -> Vec<String> {
    RE_BR
        .split(inner)
        .map(|piece| tidy_call_spacing(&inline_text(piece)))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Undo the spaces left by stripped `<i>` markup: `Foo( MediaTrack tr )` → `Foo(MediaTrack tr)`.
fn tidy_call_spacing(line: &str) -> String {
    line.replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",")
        .replace("[ ", "[")
        .replace(" ]", "]")
}

// -- Extraction ---------------------------------------------------------------

/// Split one signature line into return values, name and raw parameter string.
pub fn extract(line: &str) -> Result<Signature, ExtractError> {
    let line = line.trim();

    if let Some(caps) = RE_ASSIGNMENT.captures(line) {
        let returns = parse_returns(&caps["rets"]).map_err(|e| e.with_text(line))?;
        return Ok(build(&caps, returns, Strategy::Assignment));
    }

    if let Some(caps) = RE_TYPED.captures(line) {
        let ty = &caps["ret"];
        let returns = if ty == "void" {
            Vec::new()
        } else {
            vec![ReturnValue {
                ty: sanitize_type(ty),
                name: None,
                optional: false,
            }]
        };
        return Ok(build(&caps, returns, Strategy::Typed));
    }

    if let Some(caps) = RE_BARE.captures(line) {
        return Ok(build(&caps, Vec::new(), Strategy::Bare));
    }

    if let Some(caps) = RE_EMBEDDED.captures(line) {
        return Ok(build(&caps, Vec::new(), Strategy::Embedded));
    }

    Err(ExtractError::SignatureNotFound {
        text: line.to_string(),
    })
}

fn build(caps: &Captures<'_>, returns: Vec<ReturnValue>, strategy: Strategy) -> Signature {
    let (namespace, is_method, name) = split_qualified_name(&caps["name"]);
    Signature {
        returns,
        namespace,
        is_method,
        name,
        raw_params: caps["params"].trim().to_string(),
        strategy,
    }
}

/// `{reaper.array}.clear` → (Some("reaper.array"), true, "clear")
fn split_qualified_name(qualified: &str) -> (Option<String>, bool, String) {
    if let Some(rest) = qualified.strip_prefix('{') {
        if let Some((ns, name)) = rest.split_once("}.") {
            return (Some(ns.to_string()), true, name.to_string());
        }
    }
    match qualified.rsplit_once('.') {
        Some((ns, name)) => (Some(ns.to_string()), false, name.to_string()),
        None => (None, false, qualified.to_string()),
    }
}

fn parse_returns(text: &str) -> Result<Vec<ReturnValue>, ExtractError> {
    text.split(',').map(parse_return_value).collect()
}

/// `[optional] Type name`, or a lone known/Capitalized type.
fn parse_return_value(text: &str) -> Result<ReturnValue, ExtractError> {
    let mut parts: Vec<&str> = text.split_whitespace().collect();

    let optional = parts.len() == 3 && parts[0] == "optional";
    if optional {
        parts.remove(0);
    }

    match parts.as_slice() {
        [ty, name] => Ok(ReturnValue {
            ty: sanitize_type(ty),
            name: Some(sanitize_identifier(name)),
            optional,
        }),
        [ty] if KNOWN_TYPES.contains(ty) || starts_with_uppercase(ty) => Ok(ReturnValue {
            ty: sanitize_type(ty),
            name: Some(sanitize_identifier(&name_from_type(ty))),
            optional,
        }),
        _ => Err(ExtractError::MalformedReturnValue {
            text: text.trim().to_string(),
        }),
    }
}

fn starts_with_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
