//! reascript-parse — generate declaration files from the ReaScript documentation.
//!
//! REAPER exports its scripting API as a single HTML page (Help → ReaScript
//! documentation). This tool reads that page and writes:
//!
//! - `to-lua`: LuaLS / EmmyLua annotations, e.g. `reascript-parse to-lua reascripthelp.html reaper.lua`
//! - `to-ts`: TypeScriptToLua declarations, e.g. `reascript-parse to-ts reascripthelp.html reaper.d.ts`
//!
//! Functions whose documentation cannot be parsed are skipped with a
//! `[WARN]` line; they never abort the run.

mod emit;
mod error;
mod loader;
mod logging;
mod model;
mod parser;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parser::OverloadPolicy;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "reascript-parse",
    about = "Generate Lua and TypeScript declarations from the ReaScript HTML documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Which signature to keep when a section documents several
    #[arg(long, value_enum, global = true, default_value = "first")]
    overloads: OverloadPolicy,

    /// Log debug details (skipped sections, rejected candidates)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print warnings
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate Lua definitions from ReaScript documentation
    #[command(name = "to-lua")]
    ToLua(Paths),

    /// Generate TypeScript declarations from ReaScript documentation
    #[command(name = "to-ts")]
    ToTs(Paths),
}

#[derive(clap::Args)]
struct Paths {
    /// The ReaScript documentation export, e.g. reascripthelp.html
    input: PathBuf,

    /// Where to save the declarations. A directory gets reaper.<ext>
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level(cli.verbose, cli.quiet));

    let (target, paths) = match cli.command {
        Command::ToLua(ref paths) => ("lua", paths),
        Command::ToTs(ref paths) => ("ts", paths),
    };

    generate(target, &paths.input, &paths.output, cli.overloads)
}

/// Load, parse, report warnings, emit. Only I/O failures are errors.
fn generate(target: &str, input: &Path, output: &Path, policy: OverloadPolicy) -> Result<()> {
    let emitter = emit::create_emitter(target)?;
    let text = loader::load(input)?;

    let report = parser::parse_document(&text, policy);
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    let out_path = resolve_output(output, emitter.file_extension());
    fs::write(&out_path, emitter.emit(&report.records))
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    tracing::info!(
        "Parsed {} functions ({} skipped as malformed, {} sections without a Lua definition)",
        report.records.len(),
        report.warnings.len(),
        report.skipped.len()
    );
    tracing::info!("Declaration file saved to: {}", out_path.display());
    Ok(())
}

/// Existing directories receive `reaper.<ext>`; anything else is used as-is.
fn resolve_output(output: &Path, ext: &str) -> PathBuf {
    if output.is_dir() {
        output.join(format!("reaper.{}", ext))
    } else {
        output.to_path_buf()
    }
}
