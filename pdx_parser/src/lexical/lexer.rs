//! Lexer: raw bytes to a token stream
//!
//! Never fails on malformed input. Characters that match no pattern become
//! Critical diagnostics and the cursor moves past them, so every iteration
//! consumes at least one character and scanning is linear in the input.

use super::matcher::TokenPatternMatcher;
use crate::config::compile_time::lexical::{MAX_TOKEN_COUNT, MAX_TOKEN_LENGTH};
use crate::config::runtime::LexicalPreferences;
use crate::files::{FileEntry, Loc, PathId, PathInterner};
use crate::logging::codes;
use crate::report::{DiagnosticItem, ErrorManager, Severity};
use crate::tokens::{Token, TokenStream, TokenType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Failures that prevent a lexer from being built at all
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Failed to compile token patterns: {0}")]
    Pattern(#[from] regex::Error),
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Pattern(_) => codes::system::INITIALIZATION_FAILURE,
        }
    }
}

/// Counters gathered during one scan
#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub tokens_by_type: BTreeMap<TokenType, usize>,
    pub comment_count: usize,
    pub invalid_chars: usize,
    pub line_count: u32,
    pub max_token_length: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, detailed: bool) {
        self.total_tokens += 1;
        self.max_token_length = self.max_token_length.max(token.value.len());
        if detailed {
            *self.tokens_by_type.entry(token.token_type).or_insert(0) += 1;
        }
    }
}

pub struct Lexer {
    interner: PathInterner,
    matcher: &'static TokenPatternMatcher,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
}

impl Lexer {
    pub fn new(interner: PathInterner, preferences: &LexicalPreferences) -> Result<Self, LexerError> {
        Ok(Self {
            interner,
            matcher: TokenPatternMatcher::global()?,
            preferences: preferences.clone(),
            metrics: LexicalMetrics::default(),
        })
    }

    /// Metrics of the most recent scan
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize a file's contents. Invalid UTF-8 is replaced, not rejected.
    pub fn scan(&mut self, entry: &FileEntry, bytes: &[u8]) -> (TokenStream, Vec<DiagnosticItem>) {
        let file_id = entry.store_in(&self.interner);
        let source = String::from_utf8_lossy(bytes);
        let (stream, mut diagnostics) = self.scan_str(file_id, &source);

        if let std::borrow::Cow::Owned(_) = source {
            diagnostics.insert(
                0,
                DiagnosticItem::from_file(
                    Severity::Warning,
                    "file is not valid UTF-8; invalid bytes were replaced",
                    file_id,
                )
                .with_code(codes::file_processing::INVALID_ENCODING),
            );
        }

        (stream, diagnostics)
    }

    pub fn scan_str(&mut self, file_id: PathId, source: &str) -> (TokenStream, Vec<DiagnosticItem>) {
        let normalized = source.replace("\r\n", "\n");
        let tab_width = self.preferences.tab_width;
        let detailed = self.preferences.collect_detailed_metrics;

        log_debug!("Starting lexical analysis",
            "file_id" => file_id,
            "bytes" => normalized.len(),
            "tab_width" => tab_width
        );

        self.metrics = LexicalMetrics::default();
        let mut stream = TokenStream::new();
        let mut errors = ErrorManager::new();
        let mut rest = normalized.as_str();
        let mut line: u32 = 1;
        let mut column: u16 = 1;

        while !rest.is_empty() {
            let loc = Loc::new(file_id, line, column);

            let Some((token_type, len)) = self.matcher.match_token(rest) else {
                let Some(ch) = rest.chars().next() else {
                    break;
                };
                errors.add(
                    DiagnosticItem::from_loc(
                        Severity::Critical,
                        format!("unexpected token '{ch}'"),
                        loc,
                        1,
                    )
                    .with_code(codes::lexical::UNEXPECTED_CHARACTER),
                );
                self.metrics.invalid_chars += 1;
                rest = &rest[ch.len_utf8()..];
                column = column.saturating_add(1);
                continue;
            };

            let text = &rest[..len];
            rest = &rest[len..];

            match token_type {
                TokenType::Tab => {
                    column = column.saturating_add(tab_width);
                }
                TokenType::Whitespace => {
                    column = advance_column(column, text);
                }
                TokenType::Comment => {
                    self.metrics.comment_count += 1;
                    column = advance_column(column, text);
                }
                TokenType::Nextline => {
                    let token = Token::new(text, token_type, loc);
                    self.metrics.record_token(&token, detailed);
                    stream.push(token);
                    line = line.saturating_add(1);
                    column = 1;
                }
                _ => {
                    if text.len() > MAX_TOKEN_LENGTH {
                        errors.add(
                            DiagnosticItem::from_loc(
                                Severity::Error,
                                format!(
                                    "Token of {} bytes exceeds the maximum length of {}",
                                    text.len(),
                                    MAX_TOKEN_LENGTH
                                ),
                                loc,
                                1,
                            )
                            .with_code(codes::lexical::TOKEN_TOO_LONG),
                        );
                    }
                    let token = Token::new(text, token_type, loc);
                    self.metrics.record_token(&token, detailed);
                    stream.push(token);
                    column = advance_column(column, text);
                }
            }

            if stream.len() >= MAX_TOKEN_COUNT && !rest.is_empty() {
                errors.add(
                    DiagnosticItem::from_loc(
                        Severity::Critical,
                        format!("Too many tokens, stopped after {MAX_TOKEN_COUNT}"),
                        Loc::new(file_id, line, column),
                        1,
                    )
                    .with_code(codes::lexical::TOO_MANY_TOKENS),
                );
                break;
            }
        }

        self.metrics.line_count = line;

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Lexical analysis completed",
            "file_id" => file_id,
            "tokens" => stream.len(),
            "invalid_chars" => self.metrics.invalid_chars
        );

        (stream, errors.into_items())
    }
}

fn advance_column(column: u16, text: &str) -> u16 {
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    column.saturating_add(width)
}
