use crate::tokens::{Token, TokenStream};

/// Three-token window over a token stream.
///
/// `current` is the token under consideration, `lookahead` the one after
/// it and `peek` the one after that. Advancing produces a new cursor and
/// leaves the stream untouched.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pub current: Option<&'a Token>,
    pub lookahead: Option<&'a Token>,
    pub peek: Option<&'a Token>,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn start(stream: &'a TokenStream) -> Self {
        Self::at(stream, 0)
    }

    fn at(stream: &'a TokenStream, position: usize) -> Self {
        Self {
            current: stream.get(position),
            lookahead: stream.get(position + 1),
            peek: stream.get(position + 2),
            position,
        }
    }

    /// Cursor shifted one token forward. Past the end it stays exhausted.
    pub fn advance(self, stream: &'a TokenStream) -> Self {
        if self.current.is_none() {
            return self;
        }
        Self::at(stream, self.position + 1)
    }

    /// Index of `current` in the stream
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }
}
