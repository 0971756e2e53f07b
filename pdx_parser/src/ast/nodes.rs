use crate::files::Loc;
use crate::tokens::Token;
use serde::{Serialize, Serializer};

/// A value position in the tree: a scalar, one of the two block kinds, or
/// nothing at all when a field's value was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BV {
    Token(Token),
    FieldBlock(FieldBlock),
    TokenBlock(TokenBlock),
    Empty(Loc),
}

impl BV {
    pub fn loc(&self) -> Loc {
        match self {
            BV::Token(token) => token.loc,
            BV::FieldBlock(block) => block.loc,
            BV::TokenBlock(block) => block.loc,
            BV::Empty(loc) => *loc,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            BV::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_field_block(&self) -> Option<&FieldBlock> {
        match self {
            BV::FieldBlock(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_token_block(&self) -> Option<&TokenBlock> {
        match self {
            BV::TokenBlock(block) => Some(block),
            _ => None,
        }
    }

    pub fn is_empty_value(&self) -> bool {
        matches!(self, BV::Empty(_))
    }
}

impl Serialize for BV {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BV::Token(token) => token.serialize(serializer),
            BV::FieldBlock(block) => block.serialize(serializer),
            BV::TokenBlock(block) => block.serialize(serializer),
            BV::Empty(_) => serializer.serialize_none(),
        }
    }
}

/// `key operator value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: Token,
    pub operator: Token,
    pub value: BV,
}

impl Field {
    pub fn new(key: Token, operator: Token, value: BV) -> Self {
        Self {
            key,
            operator,
            value,
        }
    }

    pub fn loc(&self) -> Loc {
        self.key.loc
    }
}

/// `{ k1 = v1 k2 = v2 }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldBlock {
    pub fields: Vec<Field>,
    #[serde(skip)]
    pub loc: Loc,
}

impl FieldBlock {
    pub fn new(fields: Vec<Field>, loc: Loc) -> Self {
        Self { fields, loc }
    }

    pub fn empty(loc: Loc) -> Self {
        Self::new(Vec::new(), loc)
    }
}

/// `{ "a" "b" "c" }`, a bare list of literals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenBlock {
    pub tokens: Vec<Token>,
    #[serde(skip)]
    pub loc: Loc,
}

impl TokenBlock {
    pub fn new(tokens: Vec<Token>, loc: Loc) -> Self {
        Self { tokens, loc }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.value.as_str())
    }
}

/// The top-level block of a file. Its loc is the first token's, or the
/// file's zero location when the file is empty.
pub type FileBlock = FieldBlock;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenType;
    use serde_json::json;

    fn word(value: &str) -> Token {
        Token::new(value, TokenType::Word, Loc::zero())
    }

    #[test]
    fn test_json_shape() {
        let block = FieldBlock::new(
            vec![
                Field::new(
                    word("color"),
                    Token::new("=", TokenType::Equals, Loc::zero()),
                    BV::TokenBlock(TokenBlock::new(
                        vec![Token::new("1", TokenType::Number, Loc::zero())],
                        Loc::zero(),
                    )),
                ),
                Field::new(
                    word("empty"),
                    Token::new("=", TokenType::Equals, Loc::zero()),
                    BV::Empty(Loc::zero()),
                ),
            ],
            Loc::zero(),
        );

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "fields": [
                    {
                        "key": { "value": "color", "type": "WORD" },
                        "operator": { "value": "=", "type": "EQUALS" },
                        "value": { "tokens": [{ "value": "1", "type": "NUMBER" }] }
                    },
                    {
                        "key": { "value": "empty", "type": "WORD" },
                        "operator": { "value": "=", "type": "EQUALS" },
                        "value": null
                    }
                ]
            })
        );
    }

    #[test]
    fn test_bv_views() {
        let value = BV::Token(word("x"));
        assert_eq!(value.as_token().map(|t| t.value.as_str()), Some("x"));
        assert!(value.as_field_block().is_none());
        assert!(BV::Empty(Loc::zero()).is_empty_value());
    }
}
