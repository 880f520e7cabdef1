//! Lua emitter — LuaLS / EmmyLua annotated stubs.
//!
//! ```lua
//! --- ```
//! --- integer retval, string val = reaper.GetProjExtState(ReaProject proj, string extname, string key)
//! --- ```
//! ---@param proj ReaProject
//! ---@param extname string
//! ---@param key string
//! ---@return integer, string
//! function reaper.GetProjExtState(proj, extname, key) end
//! ```

use super::{custom_types, method_table, namespaces, prefix_lines, Emitter};
use crate::model::FunctionRecord;

pub struct LuaEmitter;

const PREAMBLE: &str = "---@diagnostic disable: missing-return";

const LOWERCASE_GLOBAL: &str = "---@diagnostic disable-next-line: lowercase-global";

// https://luals.github.io/wiki/annotations/
const BUILTIN_TYPES: &[&str] = &[
    "nil",
    "any",
    "boolean",
    "string",
    "number",
    "integer",
    "function",
    "table",
    "thread",
    "userdata",
    "lightuserdata",
];

impl Emitter for LuaEmitter {
    fn emit(&self, records: &[FunctionRecord]) -> String {
        let mut parts = vec![PREAMBLE.to_string()];

        let types = custom_types(records, BUILTIN_TYPES);
        if !types.is_empty() {
            let mut decl = String::new();
            for ty in &types {
                decl.push_str(&format!("---@class {}\n", ty));
            }
            decl.push_str("local _ = {}");
            parts.push(decl);
        }

        parts.extend(declare_namespaces(records));
        parts.extend(records.iter().map(format_function));

        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "lua"
    }
}

/// Namespace tables, parents before children. Method namespaces become
/// classes bound to a local of the same name.
fn declare_namespaces(records: &[FunctionRecord]) -> Vec<String> {
    let mut declared: Vec<String> = Vec::new();
    let mut out = Vec::new();

    for (ns, is_method) in namespaces(records) {
        if is_method {
            let table = method_table(ns);
            out.push(format!("---@class {}\nlocal {} = {{}}", table, table));
            continue;
        }

        let segments: Vec<&str> = ns.split('.').collect();
        for depth in 1..=segments.len() {
            let path = segments[..depth].join(".");
            if declared.contains(&path) {
                continue;
            }
            if depth == 1 && path.starts_with(|c: char| c.is_ascii_lowercase()) {
                out.push(format!("{}\n{} = {{}}", LOWERCASE_GLOBAL, path));
            } else {
                out.push(format!("{} = {{}}", path));
            }
            declared.push(path);
        }
    }

    out
}

fn format_function(record: &FunctionRecord) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(prefix_lines(
        &format!("```\n{}\n```", record.signature),
        "--- ",
    ));
    if !record.description.is_empty() {
        parts.push(prefix_lines(&record.description, "--- "));
    }

    for param in &record.parameters {
        parts.push(format!(
            "---@param {}{} {}",
            param.name,
            if param.optional { "?" } else { "" },
            param.ty
        ));
    }
    if record.varargs {
        parts.push("---@param ... any".to_string());
    }

    if !record.returns.is_empty() {
        let types = record
            .returns
            .iter()
            .map(|r| format!("{}{}", r.ty, if r.optional { "?" } else { "" }))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("---@return {}", types));
    }

    if record.deprecated {
        parts.push("---@deprecated".to_string());
    }

    let mut params: Vec<&str> = record.parameters.iter().map(|p| p.name.as_str()).collect();
    if record.varargs {
        params.push("...");
    }
    let params = params.join(", ");

    let declaration = match record.namespace {
        Some(ref ns) if record.is_method => {
            format!("function {}:{}({}) end", method_table(ns), record.name, params)
        }
        Some(ref ns) => format!("function {}.{}({}) end", ns, record.name, params),
        None => {
            if record.name.starts_with(|c: char| c.is_ascii_lowercase()) {
                parts.push(LOWERCASE_GLOBAL.to_string());
            }
            format!("function {}({}) end", record.name, params)
        }
    };
    parts.push(declaration);

    parts.join("\n")
}
