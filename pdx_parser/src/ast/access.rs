//! Lookup helpers on field blocks. All lookups compare the key's text and
//! keep source order.

use super::nodes::{Field, FieldBlock, TokenBlock};
use crate::tokens::Token;

impl FieldBlock {
    /// First field with this key
    pub fn get_field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key.value == key)
    }

    /// Every field with this key, in source order
    pub fn get_fields(&self, key: &str) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.key.value == key).collect()
    }

    /// Scalar value of the first field with this key. `None` when the value
    /// is a block or empty.
    pub fn get_field_value(&self, key: &str) -> Option<&Token> {
        self.get_field(key)?.value.as_token()
    }

    /// Scalar values of every field with this key; block values are skipped
    pub fn get_fields_values(&self, key: &str) -> Vec<&Token> {
        self.fields
            .iter()
            .filter(|f| f.key.value == key)
            .filter_map(|f| f.value.as_token())
            .collect()
    }

    pub fn get_field_block(&self, key: &str) -> Option<&FieldBlock> {
        self.get_field(key)?.value.as_field_block()
    }

    pub fn get_token_block(&self, key: &str) -> Option<&TokenBlock> {
        self.get_field(key)?.value.as_token_block()
    }

    /// Tokens of the first field's value when it is a token block
    pub fn get_field_list(&self, key: &str) -> Option<&[Token]> {
        self.get_token_block(key).map(|b| b.tokens.as_slice())
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some()
    }

    /// Keys in source order, duplicates included
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FieldBlock {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BV;
    use crate::files::Loc;
    use crate::tokens::TokenType;

    fn token(value: &str, token_type: TokenType, line: u32) -> Token {
        Token::new(value, token_type, Loc::new(Default::default(), line, 1))
    }

    fn field(key: &str, value: BV, line: u32) -> Field {
        Field::new(
            token(key, TokenType::Word, line),
            token("=", TokenType::Equals, line),
            value,
        )
    }

    fn sample() -> FieldBlock {
        FieldBlock::new(
            vec![
                field("k", BV::Token(token("first", TokenType::Word, 1)), 1),
                field("trait", BV::Token(token("brave", TokenType::Word, 2)), 2),
                field("k", BV::Token(token("second", TokenType::Word, 3)), 3),
                field(
                    "color",
                    BV::TokenBlock(TokenBlock::new(
                        vec![
                            token("1", TokenType::Number, 4),
                            token("2", TokenType::Number, 4),
                        ],
                        Loc::zero(),
                    )),
                    4,
                ),
                field("trigger", BV::FieldBlock(FieldBlock::default()), 5),
                field("k", BV::Empty(Loc::zero()), 6),
            ],
            Loc::zero(),
        )
    }

    #[test]
    fn test_first_match_wins() {
        let block = sample();
        assert_eq!(block.get_field("k").unwrap().key.loc.line, 1);
        assert_eq!(block.get_field_value("k").unwrap().value, "first");
        assert!(block.get_field("missing").is_none());
    }

    #[test]
    fn test_all_matches_in_order() {
        let block = sample();
        let lines: Vec<u32> = block.get_fields("k").iter().map(|f| f.loc().line).collect();
        assert_eq!(lines, [1, 3, 6]);

        let values: Vec<&str> = block
            .get_fields_values("k")
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(values, ["first", "second"]);
    }

    #[test]
    fn test_typed_block_access() {
        let block = sample();
        assert!(block.get_field_block("trigger").unwrap().is_empty());
        assert!(block.get_token_block("trigger").is_none());
        assert!(block.get_field_value("trigger").is_none());

        let list: Vec<&str> = block
            .get_field_list("color")
            .unwrap()
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(list, ["1", "2"]);
        assert!(block.get_field_list("trait").is_none());
    }

    #[test]
    fn test_keys_and_size() {
        let block = sample();
        assert_eq!(block.len(), 6);
        assert!(block.has_field("color"));
        assert_eq!(
            block.keys().collect::<Vec<_>>(),
            ["k", "trait", "k", "color", "trigger", "k"]
        );
        assert_eq!((&block).into_iter().count(), 6);
    }
}
