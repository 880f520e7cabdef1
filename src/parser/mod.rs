//! Function record builder — runs the extraction chain over every section.

pub mod description;
pub mod params;
pub mod sections;
pub mod signature;

use crate::error::ExtractError;
use crate::loader::inline_text;
use crate::model::{FunctionRecord, Language, ParseWarning, RawSection, Report};
use sections::SectionKind;
use signature::SignatureBlock;

/// What to do with a section that carries several signature lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OverloadPolicy {
    /// Keep the first line that parses; warn only if none does
    #[default]
    First,
    /// Every line becomes a record or a warning
    All,
}

/// Parse a whole document into records and warnings.
pub fn parse_document(text: &str, policy: OverloadPolicy) -> Report {
    build(sections::split(text), policy)
}

/// Build function records from sections, in source order.
///
/// Extraction failures never escape: each becomes a ParseWarning and the
/// function is skipped.
pub fn build<'a, I>(sections: I, policy: OverloadPolicy) -> Report
where
    I: IntoIterator<Item = RawSection<'a>>,
{
    let mut report = Report::default();

    for section in sections {
        let kind = SectionKind::of(section.identifier);
        let block = match kind {
            SectionKind::List | SectionKind::OtherLanguage => None,
            SectionKind::LuaOnly => Some(signature::locate_lua_only(sections::body(&section))),
            SectionKind::MultiLanguage => {
                signature::locate_multi_language(sections::body(&section))
            }
        };

        let Some(block) = block else {
            tracing::debug!(
                "Skipping section with no Lua function definition '{}'",
                section.identifier
            );
            report.skipped.push(section.identifier.to_string());
            continue;
        };

        process_block(&mut report, &section, block, policy);
    }

    report
}

fn process_block(
    report: &mut Report,
    section: &RawSection<'_>,
    block: SignatureBlock,
    policy: OverloadPolicy,
) {
    if block.lines.is_empty() {
        let err = ExtractError::SignatureNotFound {
            text: inline_text(sections::body(section)),
        };
        report.warnings.push(warning(section, &err));
        return;
    }

    let desc = description::extract(&block.description_html);

    match policy {
        OverloadPolicy::First => {
            let mut first_error = None;
            for line in &block.lines {
                match extract_record(section, line, &desc) {
                    Ok(record) => {
                        report.records.push(record);
                        return;
                    }
                    Err(e) => {
                        tracing::debug!("'{}': candidate rejected: {}", section.identifier, e);
                        first_error.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_error {
                report.warnings.push(warning(section, &e));
            }
        }
        OverloadPolicy::All => {
            for line in &block.lines {
                match extract_record(section, line, &desc) {
                    Ok(record) => report.records.push(record),
                    Err(e) => report.warnings.push(warning(section, &e)),
                }
            }
        }
    }
}

/// Signature → parameters → record, for one candidate line.
fn extract_record(
    section: &RawSection<'_>,
    line: &str,
    desc: &description::Description,
) -> Result<FunctionRecord, ExtractError> {
    let sig = signature::extract(line)?;
    let params = params::parse(&sig.raw_params).map_err(|e| e.with_text(line))?;

    let strategy = sig.strategy;
    let record = FunctionRecord {
        name: sig.name,
        namespace: sig.namespace,
        is_method: sig.is_method,
        returns: sig.returns,
        parameters: params.params,
        varargs: params.varargs,
        description: desc.text.clone(),
        deprecated: desc.deprecated,
        source_section: section.identifier.to_string(),
        signature: line.trim().to_string(),
    };

    tracing::trace!(
        "'{}': {:?} signature, {} -> {}",
        section.identifier,
        strategy,
        record.name,
        record.return_type().as_deref().unwrap_or("void")
    );
    Ok(record)
}

fn warning(section: &RawSection<'_>, err: &ExtractError) -> ParseWarning {
    ParseWarning {
        kind: Language::Lua,
        section_id: section.identifier.to_string(),
        raw_text: err.text().to_string(),
        reason: err.to_string(),
    }
}
