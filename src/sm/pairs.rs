//! Measure-keyed pair tables: the BPM schedule, the stop schedule and
//! freeform scripting pairs.
//!
//! All three parse from the format's comma-separated `beat=value`
//! fragments; beats convert to measures with `beat / 4` and the lists are
//! sorted ascending by measure. Duplicate measures are kept; the timing
//! resolver lets the latest one win.

use thiserror::Error;

use crate::sm::lex::{LexicalError, TextPosition};
use crate::sm::rational::{Rational, parse_decimal};
use crate::sm::units::{Beat, Bpm, Measure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
enum FragmentError {
    #[error("missing `=`")]
    MissingSeparator,
    #[error("bad number")]
    BadNumber,
}

/// Splits a comma-separated pair list into its non-empty fragments.
fn fragments(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Splits one `a=b` fragment into its two parsed rationals.
fn split_fragment(fragment: &str) -> Result<(Rational, Rational), FragmentError> {
    let (left, right) = fragment
        .split_once('=')
        .ok_or(FragmentError::MissingSeparator)?;
    let left = parse_decimal(left).ok_or(FragmentError::BadNumber)?;
    let right = parse_decimal(right).ok_or(FragmentError::BadNumber)?;
    Ok((left, right))
}

fn malformed(fragment: &str, position: TextPosition) -> LexicalError {
    LexicalError::MalformedNumber {
        text: fragment.to_owned(),
        position,
    }
}

/// A point on the BPM schedule: from this measure onward, the BPM applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureBpmPair {
    /// The measure the segment starts at.
    pub measure: Measure,
    /// The tempo from there on.
    pub bpm: Bpm,
}

impl MeasureBpmPair {
    /// Parses a `beat=bpm` list, sorted by measure.
    ///
    /// # Errors
    ///
    /// Returns [`LexicalError::MalformedNumber`] for a fragment that is
    /// not two decimals around a `=`.
    pub fn parse_list(text: &str, position: TextPosition) -> Result<Vec<Self>, LexicalError> {
        let mut pairs = fragments(text)
            .map(|fragment| {
                let (beat, bpm) =
                    split_fragment(fragment).map_err(|_| malformed(fragment, position))?;
                Ok(Self {
                    measure: Beat::new(beat).as_measure(),
                    bpm: Bpm::new(bpm),
                })
            })
            .collect::<Result<Vec<_>, LexicalError>>()?;
        pairs.sort_by_key(|pair| pair.measure);
        Ok(pairs)
    }
}

/// A stop event: at this measure, hold still for a duration.
///
/// Both sides of the textual fragment are beats; the duration is stored
/// in measures like everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureMeasurePair {
    /// The measure the stop happens at.
    pub measure: Measure,
    /// How long the cursor pauses, in measures.
    pub value: Measure,
}

impl MeasureMeasurePair {
    /// Parses a `beat=beats` list, sorted by measure.
    ///
    /// # Errors
    ///
    /// Returns [`LexicalError::MalformedNumber`] for a fragment that is
    /// not two decimals around a `=`.
    pub fn parse_list(text: &str, position: TextPosition) -> Result<Vec<Self>, LexicalError> {
        let mut pairs = fragments(text)
            .map(|fragment| {
                let (beat, duration) =
                    split_fragment(fragment).map_err(|_| malformed(fragment, position))?;
                Ok(Self {
                    measure: Beat::new(beat).as_measure(),
                    value: Beat::new(duration).as_measure(),
                })
            })
            .collect::<Result<Vec<_>, LexicalError>>()?;
        pairs.sort_by_key(|pair| pair.measure);
        Ok(pairs)
    }
}

/// A freeform scripting pair: a measure and an uninterpreted rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureValuePair {
    /// The measure the value attaches to.
    pub measure: Measure,
    /// The attached value.
    pub value: Rational,
}

impl MeasureValuePair {
    /// Parses a `beat=value` list, sorted by measure.
    ///
    /// # Errors
    ///
    /// Returns [`LexicalError::MalformedNumber`] for a fragment that is
    /// not two decimals around a `=`.
    pub fn parse_list(text: &str, position: TextPosition) -> Result<Vec<Self>, LexicalError> {
        let mut pairs = fragments(text)
            .map(|fragment| {
                let (beat, value) =
                    split_fragment(fragment).map_err(|_| malformed(fragment, position))?;
                Ok(Self {
                    measure: Beat::new(beat).as_measure(),
                    value,
                })
            })
            .collect::<Result<Vec<_>, LexicalError>>()?;
        pairs.sort_by_key(|pair| pair.measure);
        Ok(pairs)
    }
}
