//! Single-file pipeline: read, tokenize, parse
//!
//! A pipeline run fails only when the file cannot be read. Everything wrong
//! inside the file comes back as diagnostics on [`PipelineResult`], and is
//! also forwarded to the logging collector under the file's context.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;

use crate::config::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::files::{FileEntry, PathInterner};
use crate::lexical::Lexer;
use crate::logging::{self, codes};
use crate::report::{DiagnosticItem, Severity};
use crate::syntax;
use std::path::Path;
use std::time::Instant;

/// Parse one file with default preferences
pub fn process_file(
    file_path: impl AsRef<Path>,
    interner: &PathInterner,
) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, interner, &RuntimeConfig::default())
}

/// Parse one file with explicit preferences
pub fn process_file_with_config(
    file_path: impl AsRef<Path>,
    interner: &PathInterner,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let entry = FileEntry::standalone(file_path.as_ref());
    process_entry(&entry, interner, config)
}

/// Parse a file discovered by a directory or project scan
pub fn process_entry(
    entry: &FileEntry,
    interner: &PathInterner,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let file_id = entry.store_in(interner);
    let display = entry.fullpath().display().to_string();

    logging::with_file_context(entry.fullpath().to_path_buf(), file_id, || {
        crate::log_info!("Starting file pipeline", "file" => display, "kind" => format!("{:?}", entry.kind()));

        // Stage 1: read
        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(entry.fullpath())?;

        // Stage 2: tokenize
        let mut lexer = Lexer::new(interner.clone(), &config.lexical)?;
        let (tokens, mut diagnostics) = lexer.scan(entry, &file_result.bytes);
        let lexical_metrics = lexer.metrics().clone();

        // Stage 3: parse
        let (ast, syntax_diagnostics) = syntax::parse_with_preferences(&tokens, &config.parser);
        diagnostics.extend(syntax_diagnostics);

        forward_diagnostics(&diagnostics);

        let result = PipelineResult {
            file_id,
            ast,
            diagnostics,
            tokens,
            file_metadata: file_result.metadata,
            lexical_metrics,
            processing_duration: start_time.elapsed(),
        };

        result.log_success(&display);
        Ok(result)
    })
}

/// Mirror input diagnostics into the operational log for the current file
fn forward_diagnostics(diagnostics: &[DiagnosticItem]) {
    for item in diagnostics {
        let severity = item.severity.as_str();
        match item.severity {
            Severity::Error | Severity::Critical => logging::log_error_with_context(
                item.code.unwrap_or(codes::syntax::UNEXPECTED_TOKEN),
                &item.msg,
                item.loc(),
                vec![("severity", severity)],
            ),
            Severity::Warning => {
                logging::log_warning_with_context(item.code, &item.msg, item.loc(), vec![])
            }
            Severity::Info => logging::log_info_with_context(&item.msg, vec![]),
        }
    }
}
