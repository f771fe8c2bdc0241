//! A line/column tracking cursor over simfile text.

use super::TextPosition;

/// Walks the source while keeping human-readable positions for errors.
pub(crate) struct Cursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The column position in chars, starts with 1.
    col: usize,
    /// The byte index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            col: 1,
            index: 0,
            source,
        }
    }

    pub(crate) const fn position(&self) -> TextPosition {
        TextPosition::new(self.line, self.col)
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    /// Consumes one character, updating line and column bookkeeping.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Skips whitespace, stopping at the next non-whitespace character.
    pub(crate) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consumes up to and including the first of `stops`, returning the
    /// stop hit and the text before it. `None` when the source ends
    /// before any stop.
    pub(crate) fn take_until_any(&mut self, stops: &[char]) -> Option<(char, &'a str)> {
        let start = self.index;
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                let taken = &self.source[start..self.index];
                self.bump();
                return Some((c, taken));
            }
            self.bump();
        }
        None
    }
}
