//! Recursive-descent parser
//!
//! ```text
//! File       := FieldList
//! FieldList  := (Field | NEXTLINE)*
//! Field      := Key Operator Value
//! Key        := WORD | DATE | NUMBER
//! Operator   := '=' | '==' | '?=' | COMPARISON
//! Value      := Literal | Block | NEXTLINE
//! Block      := '{' (FieldList | TokenList)? '}'
//! ```
//!
//! A block's kind is fixed by its first content token: a key followed by an
//! operator starts a field block, anything else a token block.

use super::cursor::Cursor;
use super::error;
use super::literal::unquote;
use super::recovery::{self, RecoveryPoint};
use crate::ast::{Field, FieldBlock, FileBlock, TokenBlock, BV};
use crate::config::runtime::ParserPreferences;
use crate::files::Loc;
use crate::logging::{codes, Code};
use crate::report::{DiagnosticItem, ErrorManager, Severity};
use crate::tokens::{Token, TokenStream, TokenType};

pub struct Parser<'a> {
    pub(super) stream: &'a TokenStream,
    pub(super) cursor: Cursor<'a>,
    /// Location of the last consumed token
    pub(super) loc: Loc,
    pub(super) errors: ErrorManager,
    pub(super) preferences: ParserPreferences,
    /// Recoveries that gave up so far
    pub(super) recovery_failures: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self::with_preferences(stream, &ParserPreferences::default())
    }

    pub fn with_preferences(stream: &'a TokenStream, preferences: &ParserPreferences) -> Self {
        let cursor = Cursor::start(stream);
        Self {
            stream,
            cursor,
            loc: cursor.current.map_or_else(Loc::zero, |t| t.loc),
            errors: ErrorManager::new(),
            preferences: preferences.clone(),
            recovery_failures: 0,
            depth: 0,
        }
    }

    /// Parse the whole stream. Always produces a tree; problems are
    /// returned as diagnostics alongside it.
    pub fn parse(mut self) -> (FileBlock, Vec<DiagnosticItem>) {
        let file = self.file_block();
        (file, self.errors.into_items())
    }

    // ------------------------------------------------------------------
    // cursor helpers
    // ------------------------------------------------------------------

    pub(super) fn bump(&mut self) -> Option<&'a Token> {
        let token = self.cursor.current?;
        self.loc = token.loc;
        self.cursor = self.cursor.advance(self.stream);
        Some(token)
    }

    fn current_type(&self) -> Option<TokenType> {
        self.cursor.current.map(|t| t.token_type)
    }

    fn error_at_token(&mut self, token: &Token, code: Code, msg: String) {
        self.errors
            .add(DiagnosticItem::from_token(Severity::Error, msg, token).with_code(code));
    }

    fn error_at_loc(&mut self, code: Code, msg: impl Into<String>) {
        self.errors
            .add(DiagnosticItem::from_loc(Severity::Error, msg, self.loc, 1).with_code(code));
    }

    fn skip_tokens(&mut self, types: &[TokenType]) {
        while self.current_type().is_some_and(|t| types.contains(&t)) {
            self.bump();
        }
    }

    /// Consume the current token if it is one of `types`. On mismatch,
    /// report and recover to one of `types` without consuming it.
    fn expect(&mut self, types: &[TokenType], context: &str) -> Option<&'a Token> {
        let Some(token) = self.cursor.current else {
            self.error_at_loc(codes::syntax::UNEXPECTED_EOF, error::unexpected_eof(types));
            return None;
        };

        if types.contains(&token.token_type) {
            return self.bump();
        }

        self.error_at_token(
            token,
            codes::syntax::UNEXPECTED_TOKEN,
            error::unexpected_token(token, types),
        );
        self.synchronize(RecoveryPoint { types, context });
        None
    }

    /// A key followed by an operator starts a field
    fn is_next_field(&self) -> bool {
        self.cursor.current.is_some_and(|t| t.token_type.is_key())
            && self.cursor.lookahead.is_some_and(|t| t.token_type.is_operator())
    }

    // ------------------------------------------------------------------
    // productions
    // ------------------------------------------------------------------

    fn file_block(&mut self) -> FileBlock {
        let Some(first) = self.cursor.current else {
            return FileBlock::empty(Loc::zero());
        };

        // A nested list gives up when recovery fails; at the top level the
        // rest of the file is still worth parsing.
        let mut fields = Vec::new();
        while !self.cursor.is_exhausted() {
            let before = self.cursor.position();
            fields.extend(self.field_list(None));
            if self.cursor.position() == before {
                break;
            }
        }
        FileBlock::new(fields, first.loc)
    }

    fn field_list(&mut self, stop: Option<TokenType>) -> Vec<Field> {
        let mut fields = Vec::new();

        while let Some(token) = self.cursor.current {
            if stop == Some(token.token_type) {
                break;
            }
            let before = self.cursor.position();

            match token.token_type {
                TokenType::Nextline | TokenType::Comment => {
                    self.skip_tokens(&[TokenType::Nextline, TokenType::Comment]);
                }
                TokenType::Word | TokenType::Date | TokenType::Number => {
                    if let Some(field) = self.field() {
                        fields.push(field);
                    }
                }
                TokenType::End if stop.is_none() => {
                    self.error_at_token(
                        token,
                        codes::syntax::UNMATCHED_BLOCK_DELIMITER,
                        format!("Unmatched closing brace {:?}", token.value),
                    );
                    self.bump();
                }
                _ => {
                    self.error_at_token(
                        token,
                        codes::syntax::UNEXPECTED_TOKEN,
                        error::unexpected_in("FieldList", token, ""),
                    );
                    if self.synchronize(recovery::FIELD_LIST).is_none() {
                        return fields;
                    }
                }
            }

            if self.cursor.position() == before {
                return fields;
            }
        }

        fields
    }

    /// `Key Operator Value`. A field whose key or operator is broken is
    /// dropped; a broken value is kept as [`BV::Empty`].
    fn field(&mut self) -> Option<Field> {
        let key = self.key()?;
        let operator = self.operator()?;
        let value = self.value();
        Some(Field::new(key.clone(), operator.clone(), value))
    }

    fn key(&mut self) -> Option<&'a Token> {
        let Some(token) = self.cursor.current else {
            self.error_at_loc(codes::syntax::UNEXPECTED_EOF, error::KEY_EXPECTED_EOF);
            return None;
        };

        if token.token_type.is_key() {
            return self.expect(&[TokenType::Word, TokenType::Date, TokenType::Number], "key");
        }

        self.error_at_token(token, codes::syntax::UNEXPECTED_TOKEN, error::key_unexpected(token));
        self.synchronize(recovery::KEY);
        None
    }

    fn operator(&mut self) -> Option<&'a Token> {
        let Some(token) = self.cursor.current else {
            self.error_at_loc(codes::syntax::UNEXPECTED_EOF, error::OPERATOR_EXPECTED_EOF);
            return None;
        };

        if token.token_type.is_operator() {
            return self.bump();
        }

        self.error_at_token(
            token,
            codes::syntax::UNEXPECTED_TOKEN,
            error::operator_unexpected(token),
        );
        if !matches!(token.token_type, TokenType::Nextline | TokenType::End) {
            self.synchronize(recovery::VALUE_ON_LINE);
        }
        None
    }

    fn value(&mut self) -> BV {
        let Some(token) = self.cursor.current else {
            self.error_at_loc(codes::syntax::UNEXPECTED_EOF, error::VALUE_EXPECTED_EOF);
            return BV::Empty(self.loc);
        };

        match token.token_type {
            TokenType::Nextline => {
                self.bump();
                BV::Empty(token.loc)
            }
            TokenType::Word
            | TokenType::Number
            | TokenType::QuotedString
            | TokenType::Bool
            | TokenType::Date => match self.literal() {
                Some(literal) => BV::Token(literal),
                None => BV::Empty(token.loc),
            },
            TokenType::Start => self.block(),
            TokenType::End => {
                // Left for the enclosing block to close
                self.error_at_token(
                    token,
                    codes::syntax::UNEXPECTED_TOKEN,
                    error::unexpected_in("Value", token, ""),
                );
                BV::Empty(token.loc)
            }
            _ => {
                self.error_at_token(
                    token,
                    codes::syntax::UNEXPECTED_TOKEN,
                    error::unexpected_in("Value", token, ""),
                );
                // Retry only when recovery stayed on this line and inside
                // this block; then it stopped at a value start.
                match self.synchronize(recovery::VALUE_ON_LINE) {
                    Some(t) if !matches!(t.token_type, TokenType::Nextline | TokenType::End) => {
                        self.value()
                    }
                    _ => BV::Empty(token.loc),
                }
            }
        }
    }

    fn block(&mut self) -> BV {
        let Some(open) = self.expect(&[TokenType::Start], "block start") else {
            return BV::Empty(self.loc);
        };

        if self.depth >= self.preferences.max_block_depth {
            self.error_at_token(
                open,
                codes::syntax::MAX_BLOCK_DEPTH,
                format!(
                    "Block nesting exceeds the maximum depth of {}",
                    self.preferences.max_block_depth
                ),
            );
            self.skip_block_body();
            return BV::FieldBlock(FieldBlock::empty(open.loc));
        }

        self.depth += 1;
        let block = self.block_body(open.loc);
        self.depth -= 1;
        block
    }

    fn block_body(&mut self, loc: Loc) -> BV {
        if self.current_type() == Some(TokenType::End) {
            self.bump();
            return BV::FieldBlock(FieldBlock::empty(loc));
        }

        let failures_before = self.recovery_failures;
        let mut block = None;

        while let Some(token) = self.cursor.current {
            if token.token_type == TokenType::End {
                break;
            }

            match token.token_type {
                TokenType::Nextline | TokenType::Comment => {
                    self.skip_tokens(&[TokenType::Nextline, TokenType::Comment]);
                }
                TokenType::Word
                | TokenType::Date
                | TokenType::Number
                | TokenType::QuotedString
                | TokenType::Bool => {
                    block = Some(if self.is_next_field() {
                        BV::FieldBlock(FieldBlock::new(self.field_list(Some(TokenType::End)), loc))
                    } else {
                        BV::TokenBlock(TokenBlock::new(self.token_list(), loc))
                    });
                    break;
                }
                _ => {
                    self.error_at_token(
                        token,
                        codes::syntax::UNEXPECTED_TOKEN,
                        error::unexpected_in("Block", token, " in block"),
                    );
                    if self.synchronize(recovery::BLOCK).is_none() {
                        break;
                    }
                }
            }
        }

        // A sub-parse that gave up leaves junk before the `}`; drop it
        // without further diagnostics.
        if self.recovery_failures > failures_before && self.current_type() != Some(TokenType::End) {
            self.skip_block_body();
        } else {
            self.close_block();
        }
        block.unwrap_or_else(|| BV::FieldBlock(FieldBlock::empty(loc)))
    }

    /// Consume the `}` ending a block. If stray tokens come first they are
    /// reported and skipped up to the brace.
    fn close_block(&mut self) {
        if self.expect(&[TokenType::End], "block end").is_some() {
            return;
        }
        if self.current_type() == Some(TokenType::End) {
            self.bump();
        }
    }

    /// Skip a block whose `{` was already consumed, nested blocks included.
    /// Running out of input first is reported.
    fn skip_block_body(&mut self) {
        let mut depth = 1usize;
        while let Some(token) = self.bump() {
            match token.token_type {
                TokenType::Start => depth += 1,
                TokenType::End => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
        self.error_at_loc(
            codes::syntax::UNEXPECTED_EOF,
            error::unexpected_eof(&[TokenType::End]),
        );
    }

    fn token_list(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.cursor.current {
            if token.token_type == TokenType::End {
                break;
            }
            let before = self.cursor.position();

            match token.token_type {
                TokenType::Nextline | TokenType::Comment => {
                    self.bump();
                }
                t if t.is_literal() => {
                    if let Some(literal) = self.literal() {
                        tokens.push(literal);
                    }
                }
                _ => {
                    self.error_at_token(
                        token,
                        codes::syntax::UNEXPECTED_TOKEN,
                        error::unexpected_in("TokenList", token, " in token list"),
                    );
                    if self.synchronize(recovery::TOKEN_LIST).is_none() {
                        return tokens;
                    }
                }
            }

            if self.cursor.position() == before {
                return tokens;
            }
        }

        tokens
    }

    /// A scalar value. Quoted strings come back unescaped; when unescaping
    /// fails the raw text is kept.
    fn literal(&mut self) -> Option<Token> {
        let Some(token) = self.cursor.current else {
            self.error_at_loc(codes::syntax::UNEXPECTED_EOF, error::LITERAL_EXPECTED_EOF);
            return None;
        };

        match token.token_type {
            TokenType::Word | TokenType::Number | TokenType::Bool | TokenType::Date => {
                return self.bump().cloned();
            }
            TokenType::QuotedString => {
                self.bump();
                return Some(self.unquote_token(token));
            }
            _ => {
                self.error_at_token(
                    token,
                    codes::syntax::UNEXPECTED_TOKEN,
                    error::literal_unexpected(token),
                );
            }
        }

        let recovered = self.synchronize(recovery::LITERAL)?;
        if recovered.token_type.is_literal() {
            return self.literal();
        }
        self.error_at_token(
            recovered,
            codes::syntax::UNEXPECTED_TOKEN,
            error::recovered_non_literal(recovered),
        );
        None
    }

    fn unquote_token(&mut self, token: &Token) -> Token {
        match unquote(&token.value) {
            Ok(value) => Token::new(value, token.token_type, token.loc),
            Err(e) => {
                self.error_at_token(
                    token,
                    codes::syntax::INVALID_STRING_ESCAPE,
                    error::unquote_failed(token, &e),
                );
                token.clone()
            }
        }
    }
}

/// Parse a token stream with default preferences
pub fn parse(stream: &TokenStream) -> (FileBlock, Vec<DiagnosticItem>) {
    Parser::new(stream).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_str;
    use assert_matches::assert_matches;

    fn parse_source(source: &str) -> (FileBlock, Vec<DiagnosticItem>) {
        let (stream, lex_diagnostics) = tokenize_str(source).unwrap();
        assert!(lex_diagnostics.is_empty(), "{lex_diagnostics:?}");
        parse(&stream)
    }

    fn errors(diagnostics: &[DiagnosticItem]) -> Vec<&DiagnosticItem> {
        diagnostics
            .iter()
            .filter(|d| d.severity >= Severity::Error)
            .collect()
    }

    #[test]
    fn test_scenario_namespace_and_entity() {
        let (file, diagnostics) = parse_source(
            "namespace = cooking\nentity = {\n    scope:character = character.123\n}\n",
        );

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(file.len(), 2);

        let namespace = file.get_field_value("namespace").unwrap();
        assert_eq!(namespace.value, "cooking");
        assert_eq!(namespace.token_type, TokenType::Word);

        let entity = file.get_field_block("entity").unwrap();
        assert_eq!(entity.len(), 1);
        let inner = &entity.fields[0];
        assert_eq!(inner.key.value, "scope:character");
        assert_eq!(inner.operator.value, "=");
        assert_matches!(&inner.value, BV::Token(t) if t.value == "character.123" && t.token_type == TokenType::Word);
    }

    #[test]
    fn test_block_kind_disambiguation() {
        let (file, diagnostics) = parse_source("a = { 1 2 3 }\nb = { c = 1 }\nd = {}\ne = {\n}");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        assert_eq!(file.get_token_block("a").unwrap().len(), 3);
        assert_eq!(file.get_field_block("b").unwrap().len(), 1);
        assert!(file.get_field_block("d").unwrap().is_empty());
        assert!(file.get_field_block("e").unwrap().is_empty());
        assert!(file.get_token_block("b").is_none());
    }

    #[test]
    fn test_token_block_with_mixed_literals() {
        let (file, diagnostics) = parse_source(
            "names = { \"Anna\" Bertha 3 }\ncolor = {\n 0.2 0.4\n 0.6\n}\ncheck = { yes 867.1.1 }",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let names: Vec<&str> = file.get_token_block("names").unwrap().values().collect();
        assert_eq!(names, ["Anna", "Bertha", "3"]);
        assert_eq!(file.get_field_list("color").unwrap().len(), 3);
        assert_eq!(file.get_field_list("check").unwrap()[1].token_type, TokenType::Date);
    }

    #[test]
    fn test_operators() {
        let (file, diagnostics) =
            parse_source("a ?= 1\nb == 2\nc >= 3\nd < 4\n1066.1.1 = { birth = yes }\n5 = x");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let operators: Vec<&str> = file.iter().map(|f| f.operator.value.as_str()).collect();
        assert_eq!(operators, ["?=", "==", ">=", "<", "=", "="]);
        assert_eq!(file.fields[4].key.token_type, TokenType::Date);
        assert_eq!(file.fields[5].key.token_type, TokenType::Number);
    }

    #[test]
    fn test_double_operator_recovers_to_value() {
        let (file, diagnostics) = parse_source("a = = 5");

        let errs = errors(&diagnostics);
        assert!(!errs.is_empty());
        assert!(errs[0].msg.contains("\"=\""), "{}", errs[0].msg);
        assert_eq!(errs[0].pointer.unwrap().loc.column, 5);

        let value = file.get_field_value("a").unwrap();
        assert_eq!(value.value, "5");
    }

    #[test]
    fn test_recovery_is_bounded() {
        let source = format!("a = {{ {} }}\nb = c", "= ".repeat(1000));
        let (file, diagnostics) = parse_source(&source);

        let failures = diagnostics
            .iter()
            .filter(|d| d.code == Some(codes::syntax::RECOVERY_FAILED))
            .count();
        assert_eq!(failures, 1, "{diagnostics:?}");
        assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
        assert_eq!(
            diagnostics[1].msg,
            "Failed to recover while parsing block - too many invalid tokens"
        );
        assert!(file.get_field_block("a").unwrap().is_empty());
        assert_eq!(file.get_field_value("b").unwrap().value, "c");
    }

    #[test]
    fn test_recovery_inside_token_list() {
        let source = format!("list = {{ a b {} }}\nnext = 1", "?= ".repeat(1000));
        let (file, diagnostics) = parse_source(&source);

        let failures = diagnostics
            .iter()
            .filter(|d| d.code == Some(codes::syntax::RECOVERY_FAILED))
            .count();
        assert_eq!(failures, 1, "{diagnostics:?}");
        let values: Vec<&str> = file.get_token_block("list").unwrap().values().collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(file.get_field_value("next").unwrap().value, "1");
    }

    #[test]
    fn test_missing_value_before_block_end() {
        let (file, diagnostics) = parse_source("a = { b = }\nc = d\ne = f");

        let errs = errors(&diagnostics);
        assert_eq!(errs.len(), 1, "{diagnostics:?}");
        assert_eq!(errs[0].pointer.unwrap().loc.column, 11);

        let keys: Vec<&str> = file.keys().collect();
        assert_eq!(keys, ["a", "c", "e"]);
        let a = file.get_field_block("a").unwrap();
        assert_eq!(a.len(), 1);
        assert_matches!(a.get_field("b").unwrap().value, BV::Empty(_));
        assert_eq!(file.get_field_value("c").unwrap().value, "d");
        assert_eq!(file.get_field_value("e").unwrap().value, "f");
    }

    #[test]
    fn test_bad_value_does_not_reach_next_line() {
        let (file, diagnostics) = parse_source("a = =\nb = c");

        assert_eq!(errors(&diagnostics).len(), 1, "{diagnostics:?}");
        assert_matches!(file.get_field("a").unwrap().value, BV::Empty(_));
        assert_eq!(file.get_field_value("b").unwrap().value, "c");
    }

    #[test]
    fn test_missing_operator_before_block_end() {
        let (file, diagnostics) = parse_source("a = { x = 1 y }\nz = 2");

        assert_eq!(errors(&diagnostics).len(), 1, "{diagnostics:?}");
        let a = file.get_field_block("a").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(file.get_field_value("z").unwrap().value, "2");
    }

    #[test]
    fn test_expect_names_its_context() {
        let (stream, _) = tokenize_str(&"= ".repeat(40)).unwrap();
        let mut parser = Parser::new(&stream);

        assert!(parser.expect(&[TokenType::End], "block end").is_none());
        let items = parser.errors.all();
        assert_eq!(items[0].msg, "Unexpected token \"=\" of type \"EQUALS\", expected one of: \"END\"");
        assert_eq!(
            items[1].msg,
            "Failed to recover while parsing block end - too many invalid tokens"
        );
    }

    #[test]
    fn test_empty_value_at_line_end() {
        let (file, diagnostics) = parse_source("a =\nb = c");
        assert!(diagnostics.is_empty());
        assert_matches!(file.get_field("a").unwrap().value, BV::Empty(loc) if loc.line == 1);
        assert_eq!(file.get_field_value("b").unwrap().value, "c");
    }

    #[test]
    fn test_missing_value_at_end_of_input() {
        let (file, diagnostics) = parse_source("a =");
        assert_eq!(diagnostics[0].msg, "Expected a value, but reached end of input");
        assert_matches!(file.get_field("a").unwrap().value, BV::Empty(_));
    }

    #[test]
    fn test_missing_operator_drops_field() {
        let (file, diagnostics) = parse_source("a\nb = c");
        assert!(diagnostics[0].msg.starts_with("Expected operator '=', '==', or comparison, but found"));
        assert!(!file.has_field("a"));
        assert_eq!(file.get_field_value("b").unwrap().value, "c");
    }

    #[test]
    fn test_unterminated_block() {
        let (file, diagnostics) = parse_source("a = { b = c");
        assert_eq!(
            diagnostics.last().unwrap().msg,
            "Unexpected end of input, expected one of: \"END\""
        );
        assert_eq!(file.get_field_block("a").unwrap().len(), 1);
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let (file, diagnostics) = parse_source("a = b }\nc = d");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(codes::syntax::UNMATCHED_BLOCK_DELIMITER));
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_unexpected_top_level_token() {
        let (file, diagnostics) = parse_source("\"stray\" a = b");
        assert_eq!(
            diagnostics[0].msg,
            "[FieldList] Unexpected token \"\\\"stray\\\"\" of type \"QUOTED_STRING\""
        );
        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert_eq!(file.get_field_value("a").unwrap().value, "b");
    }

    #[test]
    fn test_quoted_strings_are_unescaped() {
        let (file, diagnostics) =
            parse_source(r#"name = "Jean\tle Bon" bad = "\q" quote = "it\'s""#);

        assert_eq!(file.get_field_value("name").unwrap().value, "Jean\tle Bon");
        assert_eq!(file.get_field_value("bad").unwrap().value, r#""\q""#);
        assert_eq!(file.get_field_value("quote").unwrap().value, r#""it\'s""#);
        let errs = errors(&diagnostics);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[1].code, Some(codes::syntax::INVALID_STRING_ESCAPE));
        assert_eq!(errs[0].code, Some(codes::syntax::INVALID_STRING_ESCAPE));
    }

    #[test]
    fn test_nesting_limit() {
        let preferences = ParserPreferences {
            max_block_depth: 2,
            ..ParserPreferences::default()
        };
        let (stream, _) = tokenize_str("a = { b = { c = { d = 1 } } }\ne = f").unwrap();
        let (file, diagnostics) = Parser::with_preferences(&stream, &preferences).parse();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(codes::syntax::MAX_BLOCK_DEPTH));
        let b = file.get_field_block("a").unwrap().get_field_block("b").unwrap();
        assert!(b.get_field_block("c").unwrap().is_empty());
        assert_eq!(file.get_field_value("e").unwrap().value, "f");
    }

    #[test]
    fn test_empty_input() {
        let (file, diagnostics) = parse_source("");
        assert!(file.is_empty());
        assert_eq!(file.loc, Loc::zero());
        assert!(diagnostics.is_empty());

        let (file, _) = parse_source("\n\n# comment only\n");
        assert!(file.is_empty());
    }

    #[test]
    fn test_file_block_loc_is_first_token() {
        let (file, _) = parse_source("\n\n  key = value");
        assert_eq!(file.loc.line, 1);
        assert_eq!(file.fields[0].key.loc.line, 3);
        assert_eq!(file.fields[0].key.loc.column, 3);
    }

    #[test]
    fn test_json_output() {
        let (file, _) = parse_source("a = { 1 }\nb = \"x\"");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["fields"][0]["value"]["tokens"][0]["value"], "1");
        assert_eq!(json["fields"][1]["value"]["value"], "x");
        assert_eq!(json["fields"][1]["value"]["type"], "QUOTED_STRING");
    }
}
