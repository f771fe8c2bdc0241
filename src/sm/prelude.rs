//! Prelude module for the simfile crate.
//!
//! Re-exports the whole public surface for convenient glob imports:
//! `use sm_rs::sm::prelude::*;`.

pub use super::{
    Result, SmError, StructuralError,
    classify::RowKind,
    lex::{LexicalError, SyntaxError, TagToken, TextPosition, scan, strip_comments},
    model::{AugmentedChart, DisplayBpm, PureChart, Simfile},
    note::{NoteObject, PureRow, UnknownNoteChar},
    notefield::{DeltaNotefield, Notefield, TimedNotefield, UntimedNotefield},
    pairs::{MeasureBpmPair, MeasureMeasurePair, MeasureValuePair},
    parse_simfile, parse_source,
    rational::{Rational, parse_decimal},
    row::{GlobalDeltaRow, GlobalRow, GlobalTimedRow, LocalRow, NoteRow, PositionedRow},
    timing::{display_bpm_range, resolve},
    units::{Beat, Bpm, GlobalPosition, LocalPosition, MaybeExact, Measure, Snap, Time},
};
