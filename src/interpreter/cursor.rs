use crate::ast::Position;

/// Position-tracking view over the input that has not been tokenized yet.
///
/// Whitespace is skipped eagerly, so the remaining input always starts at the
/// next token. Positions count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor<'a> {
    input:    &'a str,
    offset:   usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the first token of `input`.
    pub(crate) fn new(input: &'a str) -> Self {
        let mut cursor = Self { input,
                                offset: 0,
                                position: 0 };
        cursor.skip_whitespace();
        cursor
    }

    /// Character position of the next token.
    pub(crate) const fn position(&self) -> Position {
        self.position
    }

    /// The input from the next token onwards.
    pub(crate) fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Returns `true` once all input is consumed.
    pub(crate) const fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Consumes `len` bytes of the remaining input, then any whitespace.
    ///
    /// `len` must lie on a character boundary.
    pub(crate) fn advance_by(&mut self, len: usize) {
        let end = (self.offset + len).min(self.input.len());
        self.position += self.input[self.offset..end].chars().count();
        self.offset = end;
        self.skip_whitespace();
    }

    /// Consumes `c` if it is the next character.
    pub(crate) fn eat_char(&mut self, c: char) -> bool {
        if self.remaining().starts_with(c) {
            self.advance_by(c.len_utf8());
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.position += rest[..rest.len() - trimmed.len()].chars().count();
        self.offset += rest.len() - trimmed.len();
    }
}
