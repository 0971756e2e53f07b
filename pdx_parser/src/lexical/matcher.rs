use crate::tokens::TokenType;
use regex::Regex;
use std::sync::OnceLock;

/// Token kinds in the order they are tried. The first pattern that matches
/// at the cursor wins, so lookalikes resolve deterministically: BOOL before
/// WORD, DATE before NUMBER.
pub const TOKEN_CHECK_ORDER: [TokenType; 14] = [
    TokenType::Nextline,
    TokenType::Tab,
    TokenType::Whitespace,
    TokenType::Comparison,
    TokenType::Comment,
    TokenType::QuotedString,
    TokenType::Bool,
    TokenType::Date,
    TokenType::Number,
    TokenType::Word,
    TokenType::QuestionEquals,
    TokenType::Equals,
    TokenType::Start,
    TokenType::End,
];

/// Digit and word classes are ASCII-only; whitespace stays Unicode-aware.
fn pattern_for(token_type: TokenType) -> &'static str {
    match token_type {
        TokenType::Nextline => r"^\n",
        TokenType::Tab => r"^\t",
        TokenType::Whitespace => r"^\s",
        TokenType::Comparison => r"^[<>]=?",
        TokenType::Comment => r"^#[^\n]*",
        TokenType::QuotedString => r#"^"(.*?)""#,
        TokenType::Bool => r"^(yes|no)",
        TokenType::Date => r"^(?-u:\d+\.\d{1,2}\.\d{1,2})",
        TokenType::Number => r"^(?-u:-?\d+([.,]\d+)?)",
        TokenType::Word => r"^(?-u:@?(?:[\w-]+:)?[\w.-]+)",
        TokenType::QuestionEquals => r"^\?=",
        TokenType::Equals => r"^==?",
        TokenType::Start => r"^\{",
        TokenType::End => r"^\}",
    }
}

/// Characters that continue a WORD; a BOOL followed by one is not a BOOL
fn continues_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}

/// Compiled token patterns
#[derive(Debug)]
pub struct TokenPatternMatcher {
    patterns: Vec<(TokenType, Regex)>,
}

static GLOBAL_MATCHER: OnceLock<Result<TokenPatternMatcher, regex::Error>> = OnceLock::new();

impl TokenPatternMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = TOKEN_CHECK_ORDER
            .iter()
            .map(|&token_type| Ok((token_type, Regex::new(pattern_for(token_type))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { patterns })
    }

    /// Process-wide matcher, compiled on first use
    pub fn global() -> Result<&'static Self, regex::Error> {
        GLOBAL_MATCHER
            .get_or_init(Self::new)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// First token kind matching at the start of `text`, with the match
    /// length in bytes. Matches are never empty.
    pub fn match_token(&self, text: &str) -> Option<(TokenType, usize)> {
        self.patterns.iter().find_map(|(token_type, regex)| {
            let found = regex.find(text)?;
            if found.is_empty() {
                return None;
            }
            if *token_type == TokenType::Bool
                && text[found.end()..].chars().next().is_some_and(continues_word)
            {
                return None;
            }
            Some((*token_type, found.end()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(text: &str) -> Option<(TokenType, &str)> {
        let matcher = TokenPatternMatcher::global().unwrap();
        matcher
            .match_token(text)
            .map(|(token_type, len)| (token_type, &text[..len]))
    }

    #[test]
    fn test_bool_before_word() {
        assert_eq!(first("yes }"), Some((TokenType::Bool, "yes")));
        assert_eq!(first("no"), Some((TokenType::Bool, "no")));
        assert_eq!(first("yesterday"), Some((TokenType::Word, "yesterday")));
        assert_eq!(first("no_heir = yes"), Some((TokenType::Word, "no_heir")));
        assert_eq!(first("yes.flag"), Some((TokenType::Word, "yes.flag")));
    }

    #[test]
    fn test_date_before_number() {
        assert_eq!(first("2024.1.1"), Some((TokenType::Date, "2024.1.1")));
        assert_eq!(first("1066.09.15 = {"), Some((TokenType::Date, "1066.09.15")));
        assert_eq!(first("-1.5"), Some((TokenType::Number, "-1.5")));
        assert_eq!(first("0,25"), Some((TokenType::Number, "0,25")));
    }

    #[test]
    fn test_words() {
        assert_eq!(first("scope:character"), Some((TokenType::Word, "scope:character")));
        assert_eq!(first("@my_value"), Some((TokenType::Word, "@my_value")));
        assert_eq!(first("key.subkey"), Some((TokenType::Word, "key.subkey")));
        assert_eq!(first("flag-name"), Some((TokenType::Word, "flag-name")));
        assert_eq!(first("character.123"), Some((TokenType::Word, "character.123")));
    }

    #[test]
    fn test_classes_are_ascii() {
        assert_eq!(first("caf\u{e9}"), Some((TokenType::Word, "caf")));
        assert_eq!(first("\u{418}\u{432}\u{430}\u{43d}"), None);
        assert_eq!(first("\u{661}\u{662}"), None);
        assert_eq!(first("12\u{661}"), Some((TokenType::Number, "12")));
        assert_eq!(first("no\u{e9}"), Some((TokenType::Bool, "no")));
    }

    #[test]
    fn test_operators_and_delimiters() {
        assert_eq!(first("?= 3"), Some((TokenType::QuestionEquals, "?=")));
        assert_eq!(first("== 3"), Some((TokenType::Equals, "==")));
        assert_eq!(first(">= 3"), Some((TokenType::Comparison, ">=")));
        assert_eq!(first("<3"), Some((TokenType::Comparison, "<")));
        assert_eq!(first("{"), Some((TokenType::Start, "{")));
        assert_eq!(first("}"), Some((TokenType::End, "}")));
    }

    #[test]
    fn test_trivia() {
        assert_eq!(first("# note\nnext"), Some((TokenType::Comment, "# note")));
        assert_eq!(first("\n"), Some((TokenType::Nextline, "\n")));
        assert_eq!(first("\tx"), Some((TokenType::Tab, "\t")));
        assert_eq!(first("\u{a0}x"), Some((TokenType::Whitespace, "\u{a0}")));
    }

    #[test]
    fn test_quoted_string_is_non_greedy() {
        assert_eq!(
            first(r#""a b" "c""#),
            Some((TokenType::QuotedString, r#""a b""#))
        );
        assert_eq!(first("\"open\nclose\""), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(first("!"), None);
        assert_eq!(first("?x"), None);
    }
}
