//! Lexical analysis: comment stripping and `#TAG:VALUE;` entry scanning.
//!
//! The scanner produces one [`TagToken`] per entry; everything inside the
//! value (including newlines and `:` characters in NOTES blocks) is kept
//! verbatim for the transformer in [`crate::sm::parse`] to pick apart.

pub(crate) mod cursor;

use std::borrow::Cow;

use thiserror::Error;

use self::cursor::Cursor;

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPosition {
    /// The line number, starting at 1.
    pub line: usize,
    /// The column number, starting at 1.
    pub col: usize,
}

impl TextPosition {
    /// Creates a new [`TextPosition`].
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {line}, col {col}", line = self.line, col = self.col)
    }
}

/// A character-level error: text that cannot encode a value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexicalError {
    /// A row contained a character outside the object alphabet.
    #[error("unknown note character `{found}` in the entry at {position}")]
    UnknownNoteCharacter {
        /// The offending character.
        found: char,
        /// Where the containing entry starts.
        position: TextPosition,
    },
    /// A numeric field failed to parse as an exact decimal.
    #[error("malformed number `{text}` in the entry at {position}")]
    MalformedNumber {
        /// The text that was expected to be a number.
        text: String,
        /// Where the containing entry starts.
        position: TextPosition,
    },
}

/// A grammar-level error: the `#TAG:VALUE;` entry structure is broken.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyntaxError {
    /// Non-whitespace text outside any `#...;` entry.
    #[error("stray `{found}` outside any entry at {position}")]
    StrayText {
        /// The first offending character.
        found: char,
        /// Where it sits.
        position: TextPosition,
    },
    /// A tag name was not followed by `:`.
    #[error("expected `:` after the tag name at {position}")]
    MissingValueSeparator {
        /// Where the entry starts.
        position: TextPosition,
    },
    /// The file ended before the entry's closing `;`.
    #[error("entry `#{tag}` at {position} is never terminated with `;`")]
    UnterminatedEntry {
        /// The name of the unterminated tag.
        tag: String,
        /// Where the entry starts.
        position: TextPosition,
    },
    /// A NOTES entry did not have exactly six `:`-separated fields.
    #[error("NOTES entry at {position} has {found} fields, expected 6")]
    NotesFieldCount {
        /// How many fields were found.
        found: usize,
        /// Where the entry starts.
        position: TextPosition,
    },
    /// A chart used a lane width other than 4, 6 or 8.
    #[error("unsupported lane width {found} in the entry at {position}")]
    UnsupportedLaneWidth {
        /// The width of the first row.
        found: usize,
        /// Where the entry starts.
        position: TextPosition,
    },
    /// A row's width differed from the chart's lane width.
    #[error("row is {found} lanes wide, chart is {expected}, in the entry at {position}")]
    UnevenRowWidth {
        /// The chart's lane width.
        expected: usize,
        /// The offending row's width.
        found: usize,
        /// Where the entry starts.
        position: TextPosition,
    },
    /// A measure's row count was not a recognized snap count.
    #[error("measure of {found} rows is not a recognized subdivision, in the entry at {position}")]
    BadMeasureRowCount {
        /// The offending row count.
        found: usize,
        /// Where the entry starts.
        position: TextPosition,
    },
}

/// One `#NAME:VALUE;` entry, with the position of its `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagToken<'a> {
    /// The tag name, as written (case is normalized by the parser).
    pub name: &'a str,
    /// The raw value between `:` and `;`.
    pub value: &'a str,
    /// Where the entry starts.
    pub position: TextPosition,
}

/// Blanks `//` line comments while preserving the line structure, so
/// positions reported against the stripped text still match the original.
pub fn strip_comments(source: &str) -> Cow<'_, str> {
    if !source.contains("//") {
        return Cow::Borrowed(source);
    }
    let stripped = source
        .split('\n')
        .map(|line| line.find("//").map_or(line, |at| &line[..at]))
        .collect::<Vec<_>>()
        .join("\n");
    Cow::Owned(stripped)
}

/// Scans comment-stripped source into its `#TAG:VALUE;` entries.
///
/// # Errors
///
/// Returns a [`SyntaxError`] on stray text outside an entry, a missing
/// `:` after a tag name, or an entry the file ends inside of.
pub fn scan(source: &str) -> Result<Vec<TagToken<'_>>, SyntaxError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        cursor.skip_whitespace();
        let position = cursor.position();
        match cursor.peek() {
            None => break,
            Some('#') => {
                cursor.bump();
            }
            Some(found) => return Err(SyntaxError::StrayText { found, position }),
        }

        let name = match cursor.take_until_any(&[':', ';', '#']) {
            Some((':', name)) => name,
            _ => return Err(SyntaxError::MissingValueSeparator { position }),
        };
        let Some((';', value)) = cursor.take_until_any(&[';']) else {
            return Err(SyntaxError::UnterminatedEntry {
                tag: name.trim().to_owned(),
                position,
            });
        };

        tokens.push(TagToken {
            name: name.trim(),
            value,
            position,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_entries() {
        let tokens = scan("#TITLE:Springtime;\n#OFFSET:-0.008;").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].name, "TITLE");
        assert_eq!(tokens[0].value, "Springtime");
        assert_eq!(tokens[0].position, TextPosition::new(1, 1));
        assert_eq!(tokens[1].name, "OFFSET");
        assert_eq!(tokens[1].value, "-0.008");
        assert_eq!(tokens[1].position, TextPosition::new(2, 1));
    }

    #[test]
    fn values_keep_colons_and_newlines() {
        let tokens = scan("#NOTES:\n  dance-single:\n  :\n  Hard:\n  9:\n  :\n0000\n;").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].value.contains("dance-single"));
        assert_eq!(tokens[0].value.matches(':').count(), 5);
    }

    #[test]
    fn stray_text_is_an_error() {
        let err = scan("#TITLE:ok;\nwat").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::StrayText {
                found: 'w',
                position: TextPosition::new(2, 1)
            }
        );
    }

    #[test]
    fn unterminated_entry_is_an_error() {
        let err = scan("#TITLE:never ends").unwrap_err();
        assert!(matches!(err, SyntaxError::UnterminatedEntry { ref tag, .. } if tag == "TITLE"));
    }

    #[test]
    fn missing_separator_is_an_error() {
        let err = scan("#TITLE;").unwrap_err();
        assert!(matches!(err, SyntaxError::MissingValueSeparator { .. }));
    }

    #[test]
    fn comments_are_blanked_in_place() {
        let stripped = strip_comments("#TITLE:A; // measure 1\n#ARTIST:B;");
        assert_eq!(stripped.as_ref(), "#TITLE:A; \n#ARTIST:B;");
        let untouched = strip_comments("#TITLE:A;");
        assert!(matches!(untouched, Cow::Borrowed(_)));
    }
}
