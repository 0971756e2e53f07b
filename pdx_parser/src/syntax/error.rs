//! Diagnostic message templates and string escape errors

use crate::tokens::{Token, TokenType};

/// Why a quoted string could not be unescaped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnquoteError {
    #[error("value is not enclosed in double quotes")]
    NotQuoted,

    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),

    #[error("escape sequence '\\{prefix}' needs {expected} hex digits")]
    ShortHexEscape { prefix: char, expected: usize },

    #[error("invalid octal escape")]
    InvalidOctal,

    #[error("byte escape 0x{0:02X} is not a complete UTF-8 character")]
    HighByte(u32),

    #[error("escape produces invalid code point U+{0:X}")]
    InvalidCodePoint(u32),

    #[error("unescaped double quote inside string")]
    BareQuote,

    #[error("string ends inside an escape sequence")]
    TrailingBackslash,
}

pub(crate) fn unexpected_eof(expected: &[TokenType]) -> String {
    format!(
        "Unexpected end of input, expected one of: {}",
        format_token_types(expected)
    )
}

pub(crate) fn unexpected_token(token: &Token, expected: &[TokenType]) -> String {
    format!(
        "Unexpected token {:?} of type \"{}\", expected one of: {}",
        token.value,
        token.token_type,
        format_token_types(expected)
    )
}

/// `[Production] Unexpected token "v" of type "T"` plus an optional suffix
pub(crate) fn unexpected_in(production: &str, token: &Token, suffix: &str) -> String {
    format!(
        "[{production}] Unexpected token {:?} of type \"{}\"{suffix}",
        token.value, token.token_type
    )
}

pub(crate) const KEY_EXPECTED_EOF: &str = "Expected a key, but reached end of input";
pub(crate) const OPERATOR_EXPECTED_EOF: &str =
    "Expected an operator '=', '==', or comparison, but reached end of input";
pub(crate) const VALUE_EXPECTED_EOF: &str = "Expected a value, but reached end of input";
pub(crate) const LITERAL_EXPECTED_EOF: &str =
    "Unexpected end of input when expecting a literal value";

pub(crate) fn key_unexpected(token: &Token) -> String {
    format!(
        "Expected a key (WORD, DATE, or NUMBER), but found {:?} of type \"{}\"",
        token.value, token.token_type
    )
}

pub(crate) fn operator_unexpected(token: &Token) -> String {
    format!(
        "Expected operator '=', '==', or comparison, but found {:?} of type \"{}\"",
        token.value, token.token_type
    )
}

pub(crate) fn literal_unexpected(token: &Token) -> String {
    format!(
        "Unexpected token {:?} of type \"{}\" when expecting a literal value (word, number, boolean, or quoted string)",
        token.value, token.token_type
    )
}

pub(crate) fn recovered_non_literal(token: &Token) -> String {
    format!(
        "Recovered to non-literal token {:?} of type \"{}\" after error",
        token.value, token.token_type
    )
}

pub(crate) fn unquote_failed(token: &Token, error: &UnquoteError) -> String {
    format!("Failed to unquote string {:?}: {error}", token.value)
}

/// `"A"`, `"A" or "B"`, `"A", "B", or "C"`
pub fn format_token_types(types: &[TokenType]) -> String {
    let quoted: Vec<String> = types.iter().map(|t| format!("\"{t}\"")).collect();
    match quoted.as_slice() {
        [] => "no token types specified".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_token_types() {
        assert_eq!(format_token_types(&[]), "no token types specified");
        assert_eq!(format_token_types(&[TokenType::End]), "\"END\"");
        assert_eq!(
            format_token_types(&[TokenType::Equals, TokenType::Comparison]),
            "\"EQUALS\" or \"COMPARISON\""
        );
        assert_eq!(
            format_token_types(&[TokenType::Word, TokenType::Date, TokenType::Number]),
            "\"WORD\", \"DATE\", or \"NUMBER\""
        );
    }

    #[test]
    fn test_message_quoting() {
        let token = Token::new("=", TokenType::Equals, Default::default());
        assert_eq!(
            unexpected_token(&token, &[TokenType::End]),
            "Unexpected token \"=\" of type \"EQUALS\", expected one of: \"END\""
        );
        assert_eq!(
            unexpected_in("Block", &token, " in block"),
            "[Block] Unexpected token \"=\" of type \"EQUALS\" in block"
        );
    }
}
