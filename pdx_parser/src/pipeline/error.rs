use crate::file_processor::FileProcessorError;
use crate::files::PathTableError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};

/// Failures that stop a file from being parsed at all.
///
/// Problems inside the file are diagnostics on the result, not errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexer setup failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Path table lookup failed: {0}")]
    PathTable(#[from] PathTableError),

    #[error("Failed to write output to {path}: {message}")]
    Output { path: String, message: String },
}

impl PipelineError {
    pub fn output_error(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Output {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::LexicalAnalysis(e) => e.error_code(),
            PipelineError::PathTable(e) => e.error_code(),
            PipelineError::Output { .. } => codes::file_processing::IO_ERROR,
        }
    }
}
