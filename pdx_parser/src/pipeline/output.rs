use super::{PipelineError, PipelineResult};
use crate::ast::FileBlock;
use crate::report::DiagnosticItem;
use serde::Serialize;
use std::path::Path;

/// JSON document written by `pdx parse --save-ast`
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub ast: &'a FileBlock,
    pub diagnostics: &'a [DiagnosticItem],
}

impl<'a> PipelineOutput<'a> {
    pub fn new(result: &'a PipelineResult) -> Self {
        Self {
            ast: &result.ast,
            diagnostics: &result.diagnostics,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_ast_json(&self, path: &Path) -> Result<(), PipelineError> {
        let json = self
            .to_json()
            .map_err(|e| PipelineError::output_error(path, e))?;
        std::fs::write(path, json).map_err(|e| PipelineError::output_error(path, e))?;

        crate::log_info!("AST written", "path" => path.display());
        Ok(())
    }
}
