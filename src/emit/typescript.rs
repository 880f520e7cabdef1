//! TypeScript emitter — ambient declarations for TypeScriptToLua.

use super::{custom_types, method_table, prefix_lines, Emitter};
use crate::model::{FunctionRecord, ParameterSpec, ReturnValue};

pub struct TypeScriptEmitter;

const PREAMBLE: &str = "/** @noSelfInFile **/";

/// Lua type → TypeScript type. Anything else is an opaque handle type.
const TYPE_MAP: &[(&str, &str)] = &[
    ("nil", "null"),
    ("any", "any"),
    ("boolean", "boolean"),
    ("string", "string"),
    ("number", "number"),
    ("integer", "number"),
    ("function", "Function"),
    // may be a list or a dict
    ("table", "any"),
];

const RESERVED_WORDS: &[&str] = &[
    "arguments", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "enum", "export", "extends", "finally", "import", "instanceof", "new", "super", "switch",
    "this", "throw", "try", "typeof", "var", "void", "with", "yield",
];

impl Emitter for TypeScriptEmitter {
    fn emit(&self, records: &[FunctionRecord]) -> String {
        let mut parts = vec![PREAMBLE.to_string()];

        let builtins: Vec<&str> = TYPE_MAP.iter().map(|(lua, _)| *lua).collect();
        let types = custom_types(records, &builtins);
        if !types.is_empty() {
            let mut decl = String::from("declare const opaqueTypeTag: unique symbol;\n");
            for ty in &types {
                decl.push_str(&format!(
                    "\ndeclare type {} = {{ readonly [opaqueTypeTag]: '{}' }};",
                    ty, ty
                ));
            }
            parts.push(decl);
        }

        for run in runs(records) {
            parts.push(format_run(run));
        }

        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "d.ts"
    }
}

/// Split records into contiguous runs sharing a namespace. Declaration
/// merging lets a namespace reopen, so record order is kept as-is.
fn runs(records: &[FunctionRecord]) -> Vec<&[FunctionRecord]> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=records.len() {
        let boundary = i == records.len()
            || records[i].namespace != records[start].namespace
            || records[i].is_method != records[start].is_method;
        if boundary {
            out.push(&records[start..i]);
            start = i;
        }
    }
    out
}

fn format_run(run: &[FunctionRecord]) -> String {
    let Some(first) = run.first() else {
        return String::new();
    };

    match first.namespace {
        None => run
            .iter()
            .map(|r| format!("{}\ndeclare {}", docstring(r), declaration(r, "function ")))
            .collect::<Vec<_>>()
            .join("\n\n"),
        Some(ref ns) => {
            let (opener, keyword) = if first.is_method {
                (format!("declare interface {}", method_table(ns)), "")
            } else {
                (format!("declare namespace {}", ns), "function ")
            };
            let members = run
                .iter()
                .map(|r| prefix_lines(&format!("{}\n{}", docstring(r), declaration(r, keyword)), "  "))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("{} {{\n{}\n}}", opener, members)
        }
    }
}

fn docstring(record: &FunctionRecord) -> String {
    let mut parts = vec![format!("```\n{}\n```", record.signature)];
    if !record.description.is_empty() {
        parts.push(record.description.clone());
    }
    if record.deprecated {
        parts.push("@deprecated".to_string());
    }

    let body = prefix_lines(&parts.join("\n"), " * ").replace("*/", "* /");
    format!("/**\n{}\n */", body)
}

fn declaration(record: &FunctionRecord, keyword: &str) -> String {
    let mut params: Vec<String> = record
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // `?` is only legal when everything after it is optional too
            let trailing = record.parameters[i..].iter().all(|q| q.optional);
            format_param(p, trailing)
        })
        .collect();
    if record.varargs {
        params.push("...args: any[]".to_string());
    }

    format!(
        "{}{}({}): {};",
        keyword,
        record.name,
        params.join(", "),
        format_returns(&record.returns)
    )
}

fn format_param(param: &ParameterSpec, trailing_optional: bool) -> String {
    let name = if RESERVED_WORDS.contains(&param.name.as_str()) {
        format!("_{}", param.name)
    } else {
        param.name.clone()
    };
    let ty = ts_type(&param.ty);
    if !param.optional {
        format!("{}: {}", name, ty)
    } else if trailing_optional {
        format!("{}?: {}", name, ty)
    } else {
        format!("{}: {} | undefined", name, ty)
    }
}

fn format_returns(returns: &[ReturnValue]) -> String {
    match returns {
        [] => "void".to_string(),
        [single] if single.optional => format!("{} | null", ts_type(&single.ty)),
        [single] => ts_type(&single.ty).to_string(),
        many => format!(
            "LuaMultiReturn<[{}]>",
            many.iter().map(|r| ts_type(&r.ty)).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn ts_type(lua: &str) -> &str {
    TYPE_MAP
        .iter()
        .find(|(name, _)| *name == lua)
        .map_or(lua, |(_, ts)| *ts)
}
