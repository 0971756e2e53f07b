//! Tokens produced by the lexer
//!
//! - [`TokenType`] - the fourteen token kinds
//! - [`Token`] - value, kind and source location
//! - [`TokenStream`] - ordered tokens handed to the parser

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenType};
pub use token_stream::TokenStream;
