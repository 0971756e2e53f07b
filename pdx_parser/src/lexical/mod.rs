//! Lexical analysis
//!
//! Turns script text into a [`TokenStream`]. Whitespace, tabs and comments
//! are dropped; line breaks are kept as NEXTLINE tokens because the parser
//! uses them to end empty values.

pub mod lexer;
pub mod matcher;

use crate::config::runtime::LexicalPreferences;
use crate::files::{PathId, PathInterner};
use crate::report::DiagnosticItem;
use crate::tokens::TokenStream;

pub use lexer::{Lexer, LexerError, LexicalMetrics};
pub use matcher::{TokenPatternMatcher, TOKEN_CHECK_ORDER};

/// Create a lexer with default preferences
pub fn create_lexer(interner: PathInterner) -> Result<Lexer, LexerError> {
    Lexer::new(interner, &LexicalPreferences::default())
}

/// Tokenize a string that is not backed by a file
pub fn tokenize_str(source: &str) -> Result<(TokenStream, Vec<DiagnosticItem>), LexerError> {
    let mut lexer = create_lexer(PathInterner::new())?;
    Ok(lexer.scan_str(PathId::new(0), source))
}
