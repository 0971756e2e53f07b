//! Error recovery
//!
//! After a syntax error the parser skips tokens until it reaches one that
//! is safe to resume at. Skipping is capped so corrupt input cannot make
//! recovery run away.

use super::parser::Parser;
use crate::config::compile_time::syntax::{MAX_RECOVERY_ATTEMPTS, MAX_SKIPPED_TOKENS};
use crate::logging::codes;
use crate::report::{DiagnosticItem, Severity};
use crate::tokens::{Token, TokenType};

/// Token types considered safe to resume at, and a label for diagnostics
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPoint<'a> {
    pub types: &'a [TokenType],
    pub context: &'a str,
}

impl RecoveryPoint<'_> {
    pub fn accepts(&self, token_type: TokenType) -> bool {
        self.types.contains(&token_type)
    }
}

pub const FIELD_LIST: RecoveryPoint<'static> = RecoveryPoint {
    types: &[TokenType::End, TokenType::Word, TokenType::Date],
    context: "field list",
};

pub const KEY: RecoveryPoint<'static> = RecoveryPoint {
    types: &[
        TokenType::Equals,
        TokenType::Comparison,
        TokenType::End,
        TokenType::Word,
    ],
    context: "key",
};

pub const VALUE: RecoveryPoint<'static> = RecoveryPoint {
    types: &[
        TokenType::Word,
        TokenType::Number,
        TokenType::QuotedString,
        TokenType::Bool,
        TokenType::Start,
    ],
    context: "value",
};

/// Like [`VALUE`], but never skips past the end of the field's line or
/// its enclosing block
pub const VALUE_ON_LINE: RecoveryPoint<'static> = RecoveryPoint {
    types: &[
        TokenType::Word,
        TokenType::Number,
        TokenType::QuotedString,
        TokenType::Bool,
        TokenType::Date,
        TokenType::Start,
        TokenType::Nextline,
        TokenType::End,
    ],
    context: "value",
};

pub const BLOCK: RecoveryPoint<'static> = RecoveryPoint {
    types: &[TokenType::End, TokenType::Word, TokenType::Date],
    context: "block",
};

pub const TOKEN_LIST: RecoveryPoint<'static> = RecoveryPoint {
    types: &[TokenType::End, TokenType::Word, TokenType::Date],
    context: "TokenList",
};

pub const LITERAL: RecoveryPoint<'static> = RecoveryPoint {
    types: &[
        TokenType::Word,
        TokenType::Number,
        TokenType::Bool,
        TokenType::QuotedString,
        TokenType::Nextline,
        TokenType::End,
    ],
    context: "literal value",
};

impl<'a> Parser<'a> {
    /// Skip tokens until the current one is accepted by `point`.
    ///
    /// Returns the token recovery stopped at, or `None` once the input ends
    /// or either cap is hit. Skipping anything produces a Warning listing
    /// the skipped tokens; giving up produces an Error.
    pub(crate) fn synchronize(&mut self, point: RecoveryPoint<'_>) -> Option<&'a Token> {
        let start_loc = self.cursor.current.map_or(self.loc, |t| t.loc);
        let mut attempts = 0;
        let mut skipped: Vec<&'a Token> = Vec::new();

        while let Some(token) = self.cursor.current {
            if attempts >= MAX_RECOVERY_ATTEMPTS || skipped.len() >= MAX_SKIPPED_TOKENS {
                break;
            }
            attempts += 1;

            if point.accepts(token.token_type) {
                if !skipped.is_empty() {
                    self.report_skipped(start_loc, &skipped, point.context);
                }
                return Some(token);
            }

            skipped.push(token);
            self.bump();
        }

        self.recovery_failures += 1;
        self.errors.add(
            DiagnosticItem::from_loc(
                Severity::Error,
                format!(
                    "Failed to recover while parsing {} - too many invalid tokens",
                    point.context
                ),
                start_loc,
                1,
            )
            .with_code(codes::syntax::RECOVERY_FAILED),
        );
        None
    }

    fn report_skipped(&mut self, loc: crate::files::Loc, skipped: &[&Token], context: &str) {
        let listing = skipped
            .iter()
            .map(|t| format!("{} ({})", t.value, t.token_type))
            .collect::<Vec<_>>()
            .join(", ");
        let msg = format!("Skipped invalid syntax in {context:?}: {listing:?}");

        if self.preferences.log_recovery_events {
            crate::log_warning!(code = codes::syntax::RECOVERY_SKIPPED_TOKENS, &msg, loc = loc,
                "skipped" => skipped.len());
        }

        self.errors.add(
            DiagnosticItem::from_loc(Severity::Warning, msg, loc, 1)
                .with_code(codes::syntax::RECOVERY_SKIPPED_TOKENS),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_str;
    use crate::tokens::TokenStream;

    fn parser_over(stream: &TokenStream) -> Parser<'_> {
        Parser::new(stream)
    }

    #[test]
    fn test_stops_at_recovery_point_without_warning() {
        let (stream, _) = tokenize_str("} rest").unwrap();
        let mut parser = parser_over(&stream);

        let token = parser.synchronize(BLOCK).unwrap();
        assert_eq!(token.token_type, TokenType::End);
        assert!(parser.errors.is_empty());
    }

    #[test]
    fn test_reports_skipped_tokens() {
        let (stream, _) = tokenize_str("= 5 ?= }").unwrap();
        let mut parser = parser_over(&stream);

        let token = parser.synchronize(BLOCK).unwrap();
        assert_eq!(token.token_type, TokenType::End);

        let items = parser.errors.all();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].severity, Severity::Warning);
        assert_eq!(
            items[0].msg,
            r#"Skipped invalid syntax in "block": "= (EQUALS), 5 (NUMBER), ?= (QUESTION_EQUALS)""#
        );
    }

    #[test]
    fn test_gives_up_after_cap() {
        let source = "= ".repeat(200);
        let (stream, _) = tokenize_str(&source).unwrap();
        let mut parser = parser_over(&stream);

        assert!(parser.synchronize(BLOCK).is_none());
        assert_eq!(parser.cursor.position(), MAX_RECOVERY_ATTEMPTS.min(MAX_SKIPPED_TOKENS));

        let items = parser.errors.all();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].msg,
            "Failed to recover while parsing block - too many invalid tokens"
        );
    }

    #[test]
    fn test_value_on_line_stops_at_boundaries() {
        let (stream, _) = tokenize_str("= }").unwrap();
        let mut parser = parser_over(&stream);
        let token = parser.synchronize(VALUE_ON_LINE).unwrap();
        assert_eq!(token.token_type, TokenType::End);

        let (stream, _) = tokenize_str("= \n x").unwrap();
        let mut parser = parser_over(&stream);
        let token = parser.synchronize(VALUE_ON_LINE).unwrap();
        assert_eq!(token.token_type, TokenType::Nextline);
    }

    #[test]
    fn test_failures_are_counted() {
        let (stream, _) = tokenize_str(&"= ".repeat(30)).unwrap();
        let mut parser = parser_over(&stream);
        assert!(parser.synchronize(BLOCK).is_none());
        assert_eq!(parser.recovery_failures, 1);
    }

    #[test]
    fn test_gives_up_at_end_of_input() {
        let (stream, _) = tokenize_str("= =").unwrap();
        let mut parser = parser_over(&stream);

        assert!(parser.synchronize(VALUE).is_none());
        assert!(parser.cursor.is_exhausted());
        assert!(parser.errors.has_errors());
    }
}
