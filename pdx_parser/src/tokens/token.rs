//! Token alphabet of the script language
use crate::files::Loc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of token the lexer can recognise.
///
/// WHITESPACE, TAB and COMMENT are matched but never reach the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Comment,
    Word,
    QuotedString,
    Number,
    Bool,
    Nextline,
    Equals,
    QuestionEquals,
    Start,
    End,
    Whitespace,
    Tab,
    Comparison,
    Date,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
            Self::Word => "WORD",
            Self::QuotedString => "QUOTED_STRING",
            Self::Number => "NUMBER",
            Self::Bool => "BOOL",
            Self::Nextline => "NEXTLINE",
            Self::Equals => "EQUALS",
            Self::QuestionEquals => "QUESTION_EQUALS",
            Self::Start => "START",
            Self::End => "END",
            Self::Whitespace => "WHITESPACE",
            Self::Tab => "TAB",
            Self::Comparison => "COMPARISON",
            Self::Date => "DATE",
        }
    }

    /// Types that may appear as a field key
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Word | Self::Date | Self::Number)
    }

    /// Types that may appear between a key and its value
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Equals | Self::QuestionEquals | Self::Comparison
        )
    }

    /// Scalar value types
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Word | Self::Number | Self::Bool | Self::Date | Self::QuotedString
        )
    }

    /// Types the lexer drops instead of emitting
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Tab | Self::Comment)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token. Serializes as `{"value": ..., "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    #[serde(skip)]
    pub loc: Loc,
}

impl Token {
    pub fn new(value: impl Into<String>, token_type: TokenType, loc: Loc) -> Self {
        Self {
            value: value.into(),
            token_type,
            loc,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    pub fn is_any(&self, types: &[TokenType]) -> bool {
        types.contains(&self.token_type)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:\t{},\tvalue:\t{:?}", self.token_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(TokenType::Date.is_key());
        assert!(!TokenType::QuotedString.is_key());
        assert!(TokenType::QuestionEquals.is_operator());
        assert!(!TokenType::Start.is_operator());
        assert!(TokenType::Bool.is_literal());
        assert!(TokenType::Comment.is_trivia());
        assert!(!TokenType::Nextline.is_trivia());
    }

    #[test]
    fn test_serializes_value_and_type() {
        let token = Token::new("scope:character", TokenType::Word, Loc::zero());
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "value": "scope:character", "type": "WORD" })
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TokenType::QuestionEquals.to_string(), "QUESTION_EQUALS");
        assert_eq!(
            serde_json::to_value(TokenType::QuotedString).unwrap(),
            "QUOTED_STRING"
        );
    }
}
