use super::severity::Severity;
use crate::ast::FieldBlock;
use crate::files::{Loc, PathId};
use crate::logging::Code;
use crate::tokens::Token;
use serde::Serialize;
use std::fmt;

/// Where in the source a diagnostic points, and how many columns it spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticPointer {
    pub loc: Loc,
    pub length: usize,
}

/// One finding about the parsed input.
///
/// Created once and never mutated; collected by an
/// [`ErrorManager`](super::ErrorManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticItem {
    pub severity: Severity,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<DiagnosticPointer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

impl DiagnosticItem {
    pub fn new(severity: Severity, msg: impl Into<String>) -> Self {
        Self {
            severity,
            msg: msg.into(),
            pointer: None,
            code: None,
        }
    }

    /// Points at a token, underlining its text
    pub fn from_token(severity: Severity, msg: impl Into<String>, token: &Token) -> Self {
        Self::from_loc(severity, msg, token.loc, token.value.chars().count())
    }

    pub fn from_loc(severity: Severity, msg: impl Into<String>, loc: Loc, length: usize) -> Self {
        Self {
            pointer: Some(DiagnosticPointer {
                loc,
                length: length.max(1),
            }),
            ..Self::new(severity, msg)
        }
    }

    /// Points at the opening of a block
    pub fn from_block(severity: Severity, msg: impl Into<String>, block: &FieldBlock) -> Self {
        Self::from_loc(severity, msg, block.loc, 1)
    }

    /// Concerns a whole file rather than a position in it
    pub fn from_file(severity: Severity, msg: impl Into<String>, file_id: PathId) -> Self {
        Self {
            pointer: Some(DiagnosticPointer {
                loc: Loc::for_file(file_id),
                length: 0,
            }),
            ..Self::new(severity, msg)
        }
    }

    pub fn with_code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn loc(&self) -> Option<Loc> {
        self.pointer.map(|p| p.loc)
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::tokens::TokenType;

    #[test]
    fn test_from_token_spans_value() {
        let token = Token::new("character.123", TokenType::Word, Loc::new(PathId::new(2), 3, 9));
        let item = DiagnosticItem::from_token(Severity::Error, "bad", &token);

        let pointer = item.pointer.unwrap();
        assert_eq!(pointer.loc.line, 3);
        assert_eq!(pointer.loc.column, 9);
        assert_eq!(pointer.length, 13);
        assert_eq!(item.to_string(), "Error: bad");
    }

    #[test]
    fn test_length_is_at_least_one() {
        let token = Token::new("", TokenType::QuotedString, Loc::zero());
        let item = DiagnosticItem::from_token(Severity::Warning, "empty", &token);
        assert_eq!(item.pointer.unwrap().length, 1);
    }

    #[test]
    fn test_from_file_and_code() {
        let item = DiagnosticItem::from_file(Severity::Critical, "unreadable", PathId::new(4))
            .with_code(codes::file_processing::IO_ERROR);

        assert!(item.loc().unwrap().is_whole_file());
        assert_eq!(item.code, Some(codes::file_processing::IO_ERROR));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["severity"], "Critical");
        assert_eq!(json["code"], "E011");
    }
}
