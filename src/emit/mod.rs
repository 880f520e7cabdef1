//! Emitter module — trait-based target dispatch.

pub mod lua;
pub mod typescript;

use crate::model::FunctionRecord;
use crate::parser::params::sanitize_identifier;
use anyhow::{anyhow, Result};
use std::collections::BTreeSet;

/// Trait for turning function records into a declaration file.
///
/// Output follows record order so regenerated files diff cleanly.
pub trait Emitter {
    fn emit(&self, records: &[FunctionRecord]) -> String;
    fn file_extension(&self) -> &str;
}

/// Create an emitter for the given target name.
pub fn create_emitter(target: &str) -> Result<Box<dyn Emitter>> {
    match target {
        "lua" => Ok(Box::new(lua::LuaEmitter)),
        "ts" | "typescript" => Ok(Box::new(typescript::TypeScriptEmitter)),
        _ => Err(anyhow!("unknown target: {}. Use lua or ts", target)),
    }
}

/// Parameter and return types not covered by the target's builtins, sorted.
///
/// Method namespaces are left out: they are declared with their methods, so
/// a parameter typed `reaper.array` refers to that same declaration.
fn custom_types(records: &[FunctionRecord], builtins: &[&str]) -> BTreeSet<String> {
    let methods: BTreeSet<String> = namespaces(records)
        .into_iter()
        .filter(|(_, is_method)| *is_method)
        .map(|(ns, _)| method_table(ns))
        .collect();

    records
        .iter()
        .flat_map(|r| {
            r.parameters
                .iter()
                .map(|p| p.ty.as_str())
                .chain(r.returns.iter().map(|rv| rv.ty.as_str()))
        })
        .filter(|ty| !builtins.contains(ty) && !methods.contains(*ty))
        .map(str::to_string)
        .collect()
}

/// Type name bound to a method namespace: "reaper.array" → "reaper_array".
fn method_table(ns: &str) -> String {
    sanitize_identifier(ns)
}

/// Distinct namespaces in first-appearance order, with their method flag.
fn namespaces(records: &[FunctionRecord]) -> Vec<(&str, bool)> {
    let mut seen: Vec<(&str, bool)> = Vec::new();
    for record in records {
        if let Some(ref ns) = record.namespace {
            let key = (ns.as_str(), record.is_method);
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
    }
    seen
}

/// Prefix every line of `text`, trimming trailing whitespace.
fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{ParameterSpec, ReturnValue};

    pub fn record(namespace: Option<&str>, name: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            is_method: false,
            returns: Vec::new(),
            parameters: Vec::new(),
            varargs: false,
            description: String::new(),
            deprecated: false,
            source_section: name.to_string(),
            signature: String::new(),
        }
    }

    pub fn param(ty: &str, name: &str, optional: bool) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            ty: ty.to_string(),
            optional,
            default: None,
        }
    }

    pub fn ret(ty: &str) -> ReturnValue {
        ReturnValue {
            ty: ty.to_string(),
            name: None,
            optional: false,
        }
    }

    #[test]
    fn create_known_emitters() {
        assert_eq!(create_emitter("lua").unwrap().file_extension(), "lua");
        assert_eq!(create_emitter("ts").unwrap().file_extension(), "d.ts");
        assert!(create_emitter("python").is_err());
    }

    #[test]
    fn custom_types_are_sorted_and_deduplicated() {
        let mut a = record(Some("reaper"), "A");
        a.parameters = vec![param("ReaProject", "proj", false), param("integer", "i", false)];
        a.returns = vec![ret("MediaTrack")];
        let mut b = record(Some("reaper"), "B");
        b.parameters = vec![param("MediaTrack", "tr", false)];

        let types: Vec<_> = custom_types(&[a, b], &["integer"]).into_iter().collect();
        assert_eq!(types, vec!["MediaTrack", "ReaProject"]);
    }

    #[test]
    fn custom_types_skip_method_namespaces() {
        let mut copy = record(Some("reaper.array"), "copy");
        copy.is_method = true;
        copy.parameters = vec![param("reaper_array", "src", true), param("MediaTrack", "tr", false)];
        copy.returns = vec![ret("boolean")];

        let types: Vec<_> = custom_types(&[copy], &["boolean"]).into_iter().collect();
        assert_eq!(types, vec!["MediaTrack"]);
    }

    #[test]
    fn namespaces_in_first_appearance_order() {
        let mut m = record(Some("reaper.array"), "clear");
        m.is_method = true;
        let records = vec![
            record(Some("reaper"), "A"),
            record(Some("gfx"), "arc"),
            record(Some("reaper"), "B"),
            m,
            record(None, "Global"),
        ];
        assert_eq!(
            namespaces(&records),
            vec![("reaper", false), ("gfx", false), ("reaper.array", true)]
        );
    }

    #[test]
    fn prefix_lines_trims() {
        assert_eq!(prefix_lines("a\n\nb", "--- "), "--- a\n---\n--- b");
    }
}
