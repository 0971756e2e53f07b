//! Error-tolerant parser for Paradox-style game and mod script files
//!
//! `file_processor` reads a file, `lexical` turns it into tokens, `syntax`
//! builds the AST in `ast` and reports problems as `report` diagnostics.
//! `pipeline` runs those stages for one file and `batch` for many.

#[macro_use]
pub mod logging;
pub mod ast;
pub mod batch;
pub mod config;
pub mod file_processor;
pub mod files;
pub mod lexical;
pub mod pipeline;
pub mod report;
pub mod syntax;
pub mod tokens;

// Re-export key types for library consumers
pub use ast::{Field, FieldBlock, FileBlock, TokenBlock, BV};
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use files::{Loc, PathId, PathInterner};
pub use pipeline::{PipelineError, PipelineOutput, PipelineResult};
pub use report::{DiagnosticItem, ErrorManager, Severity};
pub use tokens::{Token, TokenStream, TokenType};
