//! Syntax analysis
//!
//! Builds a [`FileBlock`] from a [`TokenStream`]. Parsing never fails: syntax
//! errors become diagnostics and the parser recovers at the next safe token.

pub mod cursor;
pub mod error;
pub mod literal;
pub mod parser;
pub mod recovery;

use crate::ast::FileBlock;
use crate::config::runtime::ParserPreferences;
use crate::logging::codes;
use crate::report::{DiagnosticItem, Severity};
use crate::tokens::TokenStream;

pub use cursor::Cursor;
pub use error::{format_token_types, UnquoteError};
pub use literal::unquote;
pub use parser::{parse, Parser};
pub use recovery::RecoveryPoint;

/// Parse with explicit preferences, logging a summary of the result
pub fn parse_with_preferences(
    stream: &TokenStream,
    preferences: &ParserPreferences,
) -> (FileBlock, Vec<DiagnosticItem>) {
    log_debug!("Starting syntax analysis",
        "tokens" => stream.len(),
        "max_block_depth" => preferences.max_block_depth
    );

    let (file, diagnostics) = Parser::with_preferences(stream, preferences).parse();

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity.is_failure())
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    log_success!(codes::success::AST_CONSTRUCTION_COMPLETE, "Syntax analysis completed",
        "fields" => file.len(),
        "errors" => errors,
        "warnings" => warnings
    );

    (file, diagnostics)
}
