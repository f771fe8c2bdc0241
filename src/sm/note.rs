//! Note objects and the pure (position-free) row.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

/// A character that does not encode any note object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("unknown note character `{0}`")]
pub struct UnknownNoteChar(pub char);

/// A possible object within a chart lane, with its one-character code.
///
/// [`NoteObject::HoldBody`] and [`NoteObject::RollBody`] are synthesized by
/// [`crate::sm::notefield::Notefield::hold_roll_bodies_distinct`]; they
/// never occur in file text and the parser rejects their codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteObject {
    /// `0`, nothing in the lane.
    EmptyLane,
    /// `1`, a tap note.
    Tap,
    /// `2`, the head of a hold.
    HoldStart,
    /// `3`, the tail of a hold or roll.
    HoldRollEnd,
    /// `4`, the head of a roll.
    RollStart,
    /// `M`, a mine.
    Mine,
    /// `F`, a fake note.
    Fake,
    /// `L`, a lift.
    Lift,
    /// `H`, synthesized hold filler.
    HoldBody,
    /// `R`, synthesized roll filler.
    RollBody,
}

impl NoteObject {
    /// Decodes a one-character object code, including the synthesized
    /// body codes.
    pub const fn from_char(character: char) -> Option<Self> {
        Some(match character {
            '0' => Self::EmptyLane,
            '1' => Self::Tap,
            '2' => Self::HoldStart,
            '3' => Self::HoldRollEnd,
            '4' => Self::RollStart,
            'M' => Self::Mine,
            'F' => Self::Fake,
            'L' => Self::Lift,
            'H' => Self::HoldBody,
            'R' => Self::RollBody,
            _ => return None,
        })
    }

    /// The one-character code of this object.
    pub const fn as_char(self) -> char {
        match self {
            Self::EmptyLane => '0',
            Self::Tap => '1',
            Self::HoldStart => '2',
            Self::HoldRollEnd => '3',
            Self::RollStart => '4',
            Self::Mine => 'M',
            Self::Fake => 'F',
            Self::Lift => 'L',
            Self::HoldBody => 'H',
            Self::RollBody => 'R',
        }
    }

    /// Whether this object only ever comes from body synthesis, never
    /// from file text.
    pub const fn is_synthesized(self) -> bool {
        matches!(self, Self::HoldBody | Self::RollBody)
    }

    /// DECORATIVE: empty, fake and mine lanes.
    pub const fn is_decorative(self) -> bool {
        matches!(self, Self::EmptyLane | Self::Fake | Self::Mine)
    }

    /// LONG_BODY: synthesized hold/roll filler.
    pub const fn is_long_body(self) -> bool {
        matches!(self, Self::HoldBody | Self::RollBody)
    }

    /// LONG_ENDS: the endpoints of long notes.
    pub const fn is_long_end(self) -> bool {
        matches!(self, Self::HoldStart | Self::RollStart | Self::HoldRollEnd)
    }

    /// Objects the player is never judged on: decorations, long-note
    /// filler and long-note tails.
    pub const fn is_judge_non_important(self) -> bool {
        self.is_decorative() || self.is_long_body() || matches!(self, Self::HoldRollEnd)
    }
}

impl fmt::Display for NoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An immutable fixed-width row of lane contents, without any position.
///
/// Two rows are equal exactly when their lane contents match; hashing
/// agrees, so rows key hash maps directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PureRow {
    lanes: Vec<NoteObject>,
}

impl PureRow {
    /// Builds a row from explicit lane contents.
    pub const fn new(lanes: Vec<NoteObject>) -> Self {
        Self { lanes }
    }

    /// Decodes a textual row, one character per lane.
    pub fn from_str_row(text: &str) -> Result<Self, UnknownNoteChar> {
        text.chars()
            .map(|c| NoteObject::from_char(c).ok_or(UnknownNoteChar(c)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The canonical textual form, one character per lane.
    pub fn str_row(&self) -> String {
        self.lanes.iter().map(|obj| obj.as_char()).collect()
    }

    /// The lane count.
    pub fn width(&self) -> usize {
        self.lanes.len()
    }

    /// The lane contents in order.
    pub fn lanes(&self) -> &[NoteObject] {
        &self.lanes
    }

    /// Iterates the lane contents in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NoteObject> {
        self.lanes.iter()
    }

    /// Whether every lane is empty.
    pub fn is_empty_row(&self) -> bool {
        self.lanes.iter().all(|obj| *obj == NoteObject::EmptyLane)
    }

    /// Whether every lane is decorative (empty, fake or mine).
    pub fn is_decorative(&self) -> bool {
        self.lanes.iter().all(|obj| obj.is_decorative())
    }

    /// Whether no lane requires a judged input.
    pub fn is_judge_non_important(&self) -> bool {
        self.lanes.iter().all(|obj| obj.is_judge_non_important())
    }

    /// Whether the row is nothing but long-note filler: at least one body
    /// lane, and every lane a body or empty.
    pub fn is_pure_hold_roll_body(&self) -> bool {
        self.lanes.iter().any(|obj| obj.is_long_body())
            && self
                .lanes
                .iter()
                .all(|obj| obj.is_long_body() || *obj == NoteObject::EmptyLane)
    }

    /// The lanes holding the given object.
    pub fn find_object_lanes(&self, object: NoteObject) -> BTreeSet<usize> {
        self.lanes
            .iter()
            .enumerate()
            .filter(|(_, obj)| **obj == object)
            .map(|(lane, _)| lane)
            .collect()
    }

    /// A copy with every occurrence of any `from` object replaced by `to`.
    pub fn replace_objects(&self, from: &[NoteObject], to: NoteObject) -> Self {
        Self::new(
            self.lanes
                .iter()
                .map(|obj| if from.contains(obj) { to } else { *obj })
                .collect(),
        )
    }

    /// A copy with the lane order reversed.
    pub fn mirror(&self) -> Self {
        Self::new(self.lanes.iter().rev().copied().collect())
    }

    /// A copy re-ordered by a lane permutation: output lane `i` takes the
    /// contents of input lane `mapping[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `mapping` is not a permutation of `0..width`.
    pub fn switch_lanes(&self, mapping: &[usize]) -> Self {
        assert_eq!(mapping.len(), self.lanes.len());
        Self::new(mapping.iter().map(|&lane| self.lanes[lane]).collect())
    }

    /// Every lane ordering of this row, deduplicated, insertion order.
    ///
    /// The identity permutation comes first, so the result always starts
    /// with the row itself.
    pub fn permutation_group(&self) -> Vec<Self> {
        let width = self.lanes.len();
        let mut seen = BTreeSet::new();
        let mut group = Vec::new();
        for mapping in (0..width).permutations(width) {
            let permuted = self.switch_lanes(&mapping);
            if seen.insert(permuted.str_row()) {
                group.push(permuted);
            }
        }
        group
    }
}

impl FromStr for PureRow {
    type Err = UnknownNoteChar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_row(s)
    }
}

impl fmt::Display for PureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for obj in &self.lanes {
            write!(f, "{obj}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PureRow {
    type Item = &'a NoteObject;
    type IntoIter = std::slice::Iter<'a, NoteObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.lanes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_row_round_trip() {
        for text in ["0000", "1001", "2M3F", "40LH", "102030"] {
            let row = PureRow::from_str_row(text).unwrap();
            assert_eq!(row.str_row(), text);
            assert_eq!(PureRow::from_str_row(&row.str_row()).unwrap(), row);
        }
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(PureRow::from_str_row("10x0"), Err(UnknownNoteChar('x')));
    }

    #[test]
    fn emptiness_predicates() {
        assert!(PureRow::from_str_row("0000").unwrap().is_empty_row());
        assert!(!PureRow::from_str_row("0100").unwrap().is_empty_row());
        assert!(PureRow::from_str_row("0MF0").unwrap().is_decorative());
        assert!(PureRow::from_str_row("0M30").unwrap().is_judge_non_important());
        assert!(!PureRow::from_str_row("0M10").unwrap().is_judge_non_important());
        assert!(PureRow::from_str_row("H0R0").unwrap().is_pure_hold_roll_body());
        assert!(!PureRow::from_str_row("0000").unwrap().is_pure_hold_roll_body());
        assert!(!PureRow::from_str_row("H1R0").unwrap().is_pure_hold_roll_body());
    }

    #[test]
    fn mirror_is_an_involution() {
        let row = PureRow::from_str_row("1230").unwrap();
        assert_eq!(row.mirror().str_row(), "0321");
        assert_eq!(row.mirror().mirror(), row);
    }

    #[test]
    fn replace_objects_many_to_one() {
        let row = PureRow::from_str_row("M1F0").unwrap();
        let scrubbed = row.replace_objects(
            &[NoteObject::Mine, NoteObject::Fake],
            NoteObject::EmptyLane,
        );
        assert_eq!(scrubbed.str_row(), "0100");
    }

    #[test]
    fn find_lanes() {
        let row = PureRow::from_str_row("2012").unwrap();
        let lanes: Vec<_> = row.find_object_lanes(NoteObject::HoldStart).into_iter().collect();
        assert_eq!(lanes, vec![0, 3]);
    }

    #[test]
    fn permutation_group_contains_self_first() {
        let row = PureRow::from_str_row("1000").unwrap();
        let group = row.permutation_group();
        assert_eq!(group[0], row);
        assert_eq!(group.len(), 4);

        let uniform = PureRow::from_str_row("1111").unwrap();
        assert_eq!(uniform.permutation_group(), vec![uniform]);
    }
}
