//! The parser and analysis module for `.sm` simfiles.
//!
//! Parsing runs in two phases: `lex` scans comment-stripped text into
//! `#TAG:VALUE;` entries, and `parse` transforms the entries bottom-up
//! into the typed [`model::Simfile`], timing every chart through
//! [`timing::resolve`] along the way.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input).
//! - Do not support editing or re-emitting simfile source text.
//! - Keep all positions and times exact rationals; floating point only
//!   appears where an analysis is inherently statistical.
//! - No process-global state: asset paths resolve against the recorded
//!   [`model::Simfile::base_dir`] instead of a working-directory change.

pub mod analysis;
pub mod classify;
pub mod lex;
pub mod model;
pub mod note;
pub mod notefield;
pub mod pairs;
pub mod parse;
pub mod prelude;
pub mod rational;
pub mod row;
pub mod timing;
pub mod units;

use std::path::Path;

use thiserror::Error;

use self::lex::{LexicalError, SyntaxError};
use self::model::Simfile;
use self::units::Bpm;

/// A chart-level error: the entries scanned fine, but what they describe
/// is not a playable chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralError {
    /// No BPM is defined anywhere; nothing can be timed.
    #[error("the BPM schedule is empty")]
    EmptyBpmSchedule,
    /// A hold or roll head never sees a tail on its lane.
    #[error("unmatched hold/roll head on lane {lane}")]
    UnmatchedLongNote {
        /// The lane the head sits on.
        lane: usize,
    },
    /// Row positions failed to strictly increase.
    #[error("row positions are not strictly increasing")]
    NonMonotonicRows,
    /// A row fed to the timing resolver had a wildcard position.
    #[error("cannot time a row with a wildcard position")]
    WildcardPosition,
    /// A BPM segment with a zero or negative tempo.
    #[error("non-positive BPM {bpm}")]
    NonPositiveBpm {
        /// The offending tempo.
        bpm: Bpm,
    },
    /// Row classification only supports 4-lane rows.
    #[error("cannot classify a row {found} lanes wide")]
    UnsupportedRowWidth {
        /// The offending width.
        found: usize,
    },
}

/// An error occurred when parsing or analyzing a simfile.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmError {
    /// An error comes from character-level analysis.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),
    /// An error comes from the entry grammar.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// An error comes from chart-level validation.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),
    /// The file could not be read at all.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SmError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// A custom result type for sm-rs.
pub type Result<T> = std::result::Result<T, SmError>;

/// Reads and parses a simfile from disk.
///
/// The file's containing directory is recorded as the simfile's
/// [`model::Simfile::base_dir`], so relative asset paths resolve without
/// any working-directory games.
///
/// # Errors
///
/// Returns [`SmError::Io`] when the file cannot be read, and any
/// lexical, syntactic or structural error the text produces.
pub fn parse_simfile(path: impl AsRef<Path>) -> Result<Simfile> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    parse_source(&source, path.parent())
}

/// Parses simfile text, resolving asset paths against `base_dir` when
/// one is given.
///
/// # Errors
///
/// Returns any lexical, syntactic or structural error the text
/// produces.
pub fn parse_source(source: &str, base_dir: Option<&Path>) -> Result<Simfile> {
    let stripped = lex::strip_comments(source);
    let tokens = lex::scan(&stripped)?;
    parse::build_simfile(&tokens, base_dir)
}
