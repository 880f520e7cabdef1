//! Parameter list parser — `Type name, Type name[, Type name]`.

use crate::error::ExtractError;
use crate::model::ParameterSpec;
use regex::Regex;
use std::sync::LazyLock;

/// Types accepted without a parameter name, e.g. `reaper.Foo(boolean)`.
const NAMELESS_TYPES: &[&str] = &["boolean", "string", "number", "integer", "function", "MediaItem"];

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

// [optional] Type [name] [= default]
static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(optional)\s+)?",
        r"([A-Za-z_][A-Za-z0-9_.]*\*?)",
        r"(?:\s+([A-Za-z_][A-Za-z0-9_.]*))?",
        r"(?:\s*=\s*([^\s=]+))?$"
    ))
    .unwrap()
});

static RE_INVALID_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Parsed parameter list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParamList {
    pub params: Vec<ParameterSpec>,
    pub varargs: bool,
}

/// One comma-separated token and whether it began inside `[...]`.
struct Token {
    text: String,
    optional: bool,
}

/// Parse a raw parameter string into typed parameters.
///
/// Commas separate parameters at every bracket depth; a parameter is optional
/// when its first character sits inside a `[...]` group.
pub fn parse(raw: &str) -> Result<ParamList, ExtractError> {
    let tokens = tokenize(raw)?;
    let mut list = ParamList::default();

    let count = tokens.len();
    for (i, token) in tokens.into_iter().enumerate() {
        if token.text == "..." {
            if i + 1 != count {
                return Err(malformed(raw, "'...' must be the last parameter"));
            }
            list.varargs = true;
            continue;
        }
        list.params.push(parse_token(raw, &token)?);
    }

    Ok(list)
}

fn tokenize(raw: &str) -> Result<Vec<Token>, ExtractError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut optional = false;
    let mut seen_comma = false;

    let chars: Vec<char> = raw.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let next = chars[i + 1..].iter().copied().find(|c| !c.is_whitespace());
        match c {
            '[' => {
                // `Type name[, ...]` opens a group; `name[2]` is not a parameter
                if !current.is_empty() && next != Some(',') {
                    return Err(malformed(raw, "'[' inside a parameter"));
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return Err(malformed(raw, "unbalanced ']'"));
                }
                if !matches!(next, None | Some(',') | Some(']')) {
                    return Err(malformed(raw, "text after ']'"));
                }
                depth -= 1;
            }
            ',' => {
                push_token(raw, &mut tokens, &mut current, optional)?;
                seen_comma = true;
            }
            c if c.is_whitespace() && current.is_empty() => {}
            c => {
                if current.is_empty() {
                    optional = depth > 0;
                }
                current.push(c);
            }
        }
    }

    if depth != 0 {
        return Err(malformed(raw, "unclosed '['"));
    }
    if !current.trim().is_empty() || seen_comma {
        push_token(raw, &mut tokens, &mut current, optional)?;
    }
    Ok(tokens)
}

fn push_token(
    raw: &str,
    tokens: &mut Vec<Token>,
    current: &mut String,
    optional: bool,
) -> Result<(), ExtractError> {
    let text = current.trim().to_string();
    if text.is_empty() {
        return Err(malformed(raw, "empty parameter"));
    }
    tokens.push(Token { text, optional });
    current.clear();
    Ok(())
}

fn parse_token(raw: &str, token: &Token) -> Result<ParameterSpec, ExtractError> {
    let caps = RE_PARAM
        .captures(&token.text)
        .ok_or_else(|| malformed(raw, &format!("cannot read '{}'", token.text)))?;

    let keyword_optional = caps.get(1).is_some();
    let ty = &caps[2];
    let default = caps.get(4).map(|m| m.as_str().to_string());

    let name = match caps.get(3) {
        Some(name) => name.as_str().to_string(),
        None if NAMELESS_TYPES.contains(&ty) => name_from_type(ty),
        None => return Err(malformed(raw, &format!("'{}' has no type", token.text))),
    };

    Ok(ParameterSpec {
        name: sanitize_identifier(&name),
        ty: sanitize_type(ty),
        optional: token.optional || keyword_optional || default.is_some(),
        default,
    })
}

/// Name for a value documented only by its type: `boolean` → `boo`.
pub fn name_from_type(ty: &str) -> String {
    ty.chars().take(3).collect::<String>().to_lowercase()
}

/// Replace characters that are invalid in type names: `reaper.array` → `reaper_array`.
pub fn sanitize_type(ty: &str) -> String {
    RE_INVALID_IDENT
        .replace_all(ty.trim_end_matches('*'), "_")
        .into_owned()
}

/// Replace characters that are invalid in identifiers and escape Lua keywords.
pub fn sanitize_identifier(name: &str) -> String {
    let name = RE_INVALID_IDENT.replace_all(name, "_").into_owned();
    if LUA_KEYWORDS.contains(&name.as_str()) {
        format!("_{}", name)
    } else {
        name
    }
}

fn malformed(raw: &str, reason: &str) -> ExtractError {
    ExtractError::MalformedParameter {
        text: raw.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(ty: &str, name: &str, optional: bool) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            ty: ty.to_string(),
            optional,
            default: None,
        }
    }

    #[test]
    fn parse_required_params() {
        let list = parse("number amt, integer forceset, boolean doupd, integer centermode").unwrap();
        assert_eq!(
            list.params,
            vec![
                spec("number", "amt", false),
                spec("integer", "forceset", false),
                spec("boolean", "doupd", false),
                spec("integer", "centermode", false),
            ]
        );
        assert!(!list.varargs);
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse("").unwrap(), ParamList::default());
        assert_eq!(parse("   ").unwrap(), ParamList::default());
    }

    #[test]
    fn parse_optional_group() {
        let list = parse("string a[, integer b, boolean c]").unwrap();
        assert_eq!(
            list.params,
            vec![
                spec("string", "a", false),
                spec("integer", "b", true),
                spec("boolean", "c", true),
            ]
        );
    }

    #[test]
    fn parse_nested_optional_groups() {
        let list = parse("MediaTrack tr[, integer idx[, string name]]").unwrap();
        assert_eq!(list.params.len(), 3);
        assert!(!list.params[0].optional);
        assert!(list.params[1].optional);
        assert!(list.params[2].optional);
    }

    #[test]
    fn parse_optional_keyword_and_default() {
        let list = parse("optional string extra, integer flags = 0").unwrap();
        assert_eq!(list.params[0], spec("string", "extra", true));
        assert_eq!(list.params[1].default.as_deref(), Some("0"));
        assert!(list.params[1].optional);
    }

    #[test]
    fn parse_varargs() {
        let list = parse("string fmt, ...").unwrap();
        assert!(list.varargs);
        assert_eq!(list.params.len(), 1);

        let list = parse("integer source[, number scale, ...]").unwrap();
        assert!(list.varargs);
        assert_eq!(list.params.len(), 2);
    }

    #[test]
    fn varargs_must_be_last() {
        let err = parse("..., integer x").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedParameter { .. }));
    }

    #[test]
    fn nameless_known_type() {
        let list = parse("boolean").unwrap();
        assert_eq!(list.params, vec![spec("boolean", "boo", false)]);
    }

    #[test]
    fn untyped_name_is_malformed() {
        let err = parse("x,y,r,ang1,ang2[,antialias]").unwrap_err();
        match err {
            ExtractError::MalformedParameter { text, reason } => {
                assert_eq!(text, "x,y,r,ang1,ang2[,antialias]");
                assert_eq!(reason, "'x' has no type");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn stray_punctuation_is_malformed() {
        assert!(parse("integer a; integer b").is_err());
        assert!(parse("integer a,, integer b").is_err());
        assert!(parse("integer (a)").is_err());
    }

    #[test]
    fn unbalanced_brackets_are_malformed() {
        for raw in [
            "integer a[, integer b",
            "integer a], integer b",
            "integer a[[, integer b]",
            "[integer a]]",
            "]integer a[",
            "number buf[2]",
            "integer a[, integer b]x",
            "[integer a][integer b]",
            "[integer a] integer b",
        ] {
            let err = parse(raw).unwrap_err();
            assert!(
                matches!(err, ExtractError::MalformedParameter { .. }),
                "{} should be malformed",
                raw
            );
        }
    }

    #[test]
    fn bracket_inside_parameter_names_the_problem() {
        match parse("number buf[2]").unwrap_err() {
            ExtractError::MalformedParameter { reason, .. } => {
                assert_eq!(reason, "'[' inside a parameter")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        match parse("[integer a][integer b]").unwrap_err() {
            ExtractError::MalformedParameter { reason, .. } => assert_eq!(reason, "text after ']'"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn groups_may_open_after_a_name_or_a_comma() {
        let list = parse("string a [, integer b], [boolean c]").unwrap();
        let optional: Vec<_> = list.params.iter().map(|p| p.optional).collect();
        assert_eq!(optional, vec![false, true, true]);
    }

    #[test]
    fn name_from_type_counts_characters() {
        assert_eq!(name_from_type("MediaItem"), "med");
        assert_eq!(name_from_type("A€x"), "a€x");
        assert_eq!(name_from_type("ab"), "ab");
    }

    #[test]
    fn identifiers_are_sanitized() {
        let list = parse("string end, integer in, MediaItem_Take take.x").unwrap();
        assert_eq!(list.params[0].name, "_end");
        assert_eq!(list.params[1].name, "_in");
        assert_eq!(list.params[2].name, "take_x");
    }

    #[test]
    fn keyword_types_are_kept() {
        let list = parse("function callback, MediaTrack* tr").unwrap();
        assert_eq!(list.params[0], spec("function", "callback", false));
        assert_eq!(list.params[1], spec("MediaTrack", "tr", false));
    }

    #[test]
    fn round_trip_through_display() {
        for raw in [
            "MediaTrack tr, integer idx",
            "string a[, integer b[, boolean c]]",
            "optional string x, integer flags = 4",
            "ReaProject proj, string extname, string key",
        ] {
            let first = parse(raw).unwrap().params;
            let joined = first.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ");
            let second = parse(&joined).unwrap().params;
            assert_eq!(first, second, "round trip of {}", raw);
        }
    }
}
