//! Row classification for 4-lane charts.

use std::collections::BTreeSet;

use bitflags::bitflags;

use crate::sm::StructuralError;
use crate::sm::note::{NoteObject, PureRow};

bitflags! {
    /// What a 4-lane row asks of the player, as a flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RowKind: u16 {
        /// Exactly one tap.
        const SINGLE = 1 << 0;
        /// Two taps on one hand's lanes ({0,1} or {2,3}).
        const OHT_JUMP = 1 << 1;
        /// Two taps split across hands.
        const THT_JUMP = 1 << 2;
        /// Three taps.
        const HAND = 1 << 3;
        /// Four taps.
        const QUAD = 1 << 4;
        /// A hold head.
        const HOLD = 1 << 5;
        /// A roll head.
        const ROLL = 1 << 6;
        /// Two hold heads on one hand's lanes.
        const OHT_HOLD = 1 << 7;
        /// Two roll heads on one hand's lanes.
        const OHT_ROLL = 1 << 8;
        /// Two hold heads split across hands.
        const THT_HOLD = 1 << 9;
        /// Two roll heads split across hands.
        const THT_ROLL = 1 << 10;
        /// At least one long-note tail.
        const RELEASE = 1 << 11;
    }
}

/// Whether a two-lane set sits under a single hand on a 4-key layout.
fn is_one_hand(lanes: &BTreeSet<usize>) -> bool {
    let left: BTreeSet<usize> = [0, 1].into();
    let right: BTreeSet<usize> = [2, 3].into();
    *lanes == left || *lanes == right
}

impl RowKind {
    /// Classifies a 4-lane row.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::UnsupportedRowWidth`] for any other
    /// width; the one-hand/two-hand split only makes sense on 4 lanes.
    pub fn classify(row: &PureRow) -> Result<Self, StructuralError> {
        if row.width() != 4 {
            return Err(StructuralError::UnsupportedRowWidth { found: row.width() });
        }

        let mut kind = Self::empty();
        kind |= Self::tap_family(&row.find_object_lanes(NoteObject::Tap));
        kind |= Self::long_family(
            &row.find_object_lanes(NoteObject::HoldStart),
            Self::HOLD,
            Self::OHT_HOLD,
            Self::THT_HOLD,
        );
        kind |= Self::long_family(
            &row.find_object_lanes(NoteObject::RollStart),
            Self::ROLL,
            Self::OHT_ROLL,
            Self::THT_ROLL,
        );
        if !row.find_object_lanes(NoteObject::HoldRollEnd).is_empty() {
            kind |= Self::RELEASE;
        }
        Ok(kind)
    }

    fn tap_family(lanes: &BTreeSet<usize>) -> Self {
        match lanes.len() {
            1 => Self::SINGLE,
            2 if is_one_hand(lanes) => Self::OHT_JUMP,
            2 => Self::THT_JUMP,
            3 => Self::HAND,
            4 => Self::QUAD,
            _ => Self::empty(),
        }
    }

    /// The lane-set rule shared by holds and rolls: one head gives the
    /// plain flag, two heads give the one-hand or two-hand variant, and
    /// three or more fall back to the plain flag.
    fn long_family(lanes: &BTreeSet<usize>, plain: Self, one_hand: Self, two_hand: Self) -> Self {
        match lanes.len() {
            0 => Self::empty(),
            1 => plain,
            2 if is_one_hand(lanes) => one_hand,
            2 => two_hand,
            _ => plain,
        }
    }
}
