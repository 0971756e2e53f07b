use crate::ast::FileBlock;
use crate::file_processor::FileMetadata;
use crate::files::PathId;
use crate::lexical::LexicalMetrics;
use crate::report::{DiagnosticItem, Severity};
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything produced for one file
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub file_id: PathId,
    pub ast: FileBlock,
    pub diagnostics: Vec<DiagnosticItem>,
    pub tokens: TokenStream,
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// True if any diagnostic is an Error or Critical
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_failure())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64().max(f64::EPSILON);
        crate::log_success!(
            crate::logging::codes::success::AST_CONSTRUCTION_COMPLETE,
            "File parsed",
            "file" => file_path,
            "fields" => self.ast.len(),
            "diagnostics" => self.diagnostics.len(),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                self.file_metadata.size as f64 / seconds),
            "processing_rate_tokens_per_sec" => format!("{:.0}",
                self.token_count() as f64 / seconds)
        );
    }
}
