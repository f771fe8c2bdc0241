//! The notefield: an ordered sequence of rows, tagged by enrichment level.
//!
//! [`Notefield`] is generic over its row type, so the same container
//! models a freshly parsed field ([`UntimedNotefield`]), a timed one
//! ([`TimedNotefield`]) and a delta one ([`DeltaNotefield`]). Transforms
//! are pure: they borrow the field and return a fresh one.

use std::collections::BTreeSet;

use crate::sm::note::{NoteObject, PureRow};
use crate::sm::rational::Rational;
use crate::sm::row::{GlobalDeltaRow, GlobalRow, GlobalTimedRow, NoteRow, PositionedRow};
use crate::sm::units::Time;

/// A notefield of rows that are positioned but not yet timed.
pub type UntimedNotefield = Notefield<GlobalRow>;
/// A notefield of rows with real arrival times.
pub type TimedNotefield = Notefield<GlobalTimedRow>;
/// A notefield of timed rows with deltas to their successors.
pub type DeltaNotefield = Notefield<GlobalDeltaRow>;

/// Holds collapse to taps when held no longer than this.
const MINI_HOLD_LIMIT: Time = Time::new(Rational::new_raw(1, 4));
/// Rolls collapse to taps when held no longer than this.
const MINI_ROLL_LIMIT: Time = Time::new(Rational::new_raw(1, 2));

/// An ordered sequence of rows composing a chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notefield<R> {
    rows: Vec<R>,
}

impl<R> Default for Notefield<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> Notefield<R> {
    /// Wraps a row sequence.
    pub const fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// The rows in order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the field has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Unwraps into the row sequence.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Overlapping windows of `order` consecutive rows.
    ///
    /// # Panics
    ///
    /// Panics if `order` is zero.
    pub fn row_windows(&self, order: usize) -> impl Iterator<Item = &[R]> {
        self.rows.windows(order)
    }

    /// Every `order`-th window: the non-overlapping variant.
    ///
    /// # Panics
    ///
    /// Panics if `order` is zero.
    pub fn sparse_row_windows(&self, order: usize) -> impl Iterator<Item = &[R]> {
        self.rows.windows(order).step_by(order)
    }
}

impl<R> FromIterator<R> for Notefield<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R> IntoIterator for Notefield<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Notefield<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R: NoteRow + Clone> Notefield<R> {
    /// Fills the gap between every long-note head and its tail with
    /// [`NoteObject::HoldBody`] / [`NoteObject::RollBody`] filler.
    ///
    /// Tails stay [`NoteObject::HoldRollEnd`]. Applying the transform
    /// again changes nothing.
    pub fn hold_roll_bodies_distinct(&self) -> Self {
        let mut active_holds: BTreeSet<usize> = BTreeSet::new();
        let mut active_rolls: BTreeSet<usize> = BTreeSet::new();

        self.rows
            .iter()
            .map(|row| {
                let pure = row.pure_row();
                for ended in pure.find_object_lanes(NoteObject::HoldRollEnd) {
                    active_holds.remove(&ended);
                    active_rolls.remove(&ended);
                }

                let filled = PureRow::new(
                    pure.iter()
                        .enumerate()
                        .map(|(lane, &obj)| match obj {
                            NoteObject::EmptyLane if active_holds.contains(&lane) => {
                                NoteObject::HoldBody
                            }
                            NoteObject::EmptyLane if active_rolls.contains(&lane) => {
                                NoteObject::RollBody
                            }
                            other => other,
                        })
                        .collect(),
                );

                active_holds.extend(pure.find_object_lanes(NoteObject::HoldStart));
                active_rolls.extend(pure.find_object_lanes(NoteObject::RollStart));

                row.clone().map_row(|_| filled)
            })
            .collect()
    }

    /// Drops rows whose lanes are all empty.
    pub fn without_empty_rows(&self) -> Self {
        self.rows
            .iter()
            .filter(|row| !row.pure_row().is_empty_row())
            .cloned()
            .collect()
    }

    /// Blanks decorative objects (fakes and mines, and lifts when
    /// `strip_lifts` is set) to empty lanes.
    pub fn without_decorations(&self, strip_lifts: bool) -> Self {
        let doomed: &[NoteObject] = if strip_lifts {
            &[NoteObject::Mine, NoteObject::Fake, NoteObject::Lift]
        } else {
            &[NoteObject::Mine, NoteObject::Fake]
        };
        self.rows
            .iter()
            .map(|row| {
                row.clone()
                    .map_row(|pure| pure.replace_objects(doomed, NoteObject::EmptyLane))
            })
            .collect()
    }
}

impl<R: PositionedRow> Notefield<R> {
    /// How many measures the field spans: the last row's measure, plus
    /// one. `None` for an empty field or wildcard positions throughout.
    pub fn measure_count(&self) -> Option<i64> {
        self.rows
            .iter()
            .filter_map(|row| row.global_position().exact())
            .map(|position| position.measure_index())
            .max()
            .map(|last| last + 1)
    }
}

impl TimedNotefield {
    /// The time of the latest row. `None` for an empty field or wildcard
    /// times throughout.
    pub fn duration(&self) -> Option<Time> {
        self.rows.iter().filter_map(GlobalTimedRow::exact_time).max()
    }

    /// Pairs every row with the time to its successor; the final row's
    /// delta is zero.
    pub fn delta_sequence(&self) -> DeltaNotefield {
        let mut deltas: Vec<GlobalDeltaRow> = self
            .rows
            .windows(2)
            .map(|pair| GlobalDeltaRow::from_consecutive(&pair[0], &pair[1]))
            .collect();
        if let Some(last) = self.rows.last() {
            deltas.push(last.clone().with_delta(Time::ZERO));
        }
        DeltaNotefield::new(deltas)
    }

    /// Collapses blink-and-miss long notes into taps: a hold shorter than
    /// 250 ms (a roll, 500 ms) becomes a tap and its tail lane goes
    /// empty. Longer long notes are left untouched.
    pub fn collapse_mini_longs(&self) -> Self {
        let mut lanes: Vec<Vec<NoteObject>> = self
            .rows
            .iter()
            .map(|row| row.row().lanes().to_vec())
            .collect();

        for start_index in 0..self.rows.len() {
            let start_row = &self.rows[start_index];
            let Some(start_time) = start_row.exact_time() else {
                continue;
            };
            for (lane, &obj) in start_row.row().lanes().iter().enumerate() {
                let limit = match obj {
                    NoteObject::HoldStart => MINI_HOLD_LIMIT,
                    NoteObject::RollStart => MINI_ROLL_LIMIT,
                    _ => continue,
                };
                let Some((end_index, end_time)) = self.matching_end(start_index, lane) else {
                    continue;
                };
                if end_time - start_time <= limit {
                    lanes[start_index][lane] = NoteObject::Tap;
                    lanes[end_index][lane] = NoteObject::EmptyLane;
                }
            }
        }

        self.rows
            .iter()
            .zip(lanes)
            .map(|(row, contents)| row.clone().map_row(|_| PureRow::new(contents)))
            .collect()
    }

    /// Finds the first tail on `lane` after `start_index`, with its time.
    fn matching_end(&self, start_index: usize, lane: usize) -> Option<(usize, Time)> {
        self.rows
            .iter()
            .enumerate()
            .skip(start_index + 1)
            .find(|(_, row)| row.row().lanes().get(lane) == Some(&NoteObject::HoldRollEnd))
            .and_then(|(index, row)| row.exact_time().map(|time| (index, time)))
    }

    /// Rounds every row's time to millisecond precision.
    pub fn discrete_time(&self) -> Self {
        self.rows
            .iter()
            .map(|row| row.clone().map_time(Time::limited_precision))
            .collect()
    }

    /// Wildcards every row's position, for whole-field comparison modulo
    /// placement.
    pub fn position_invariant(&self) -> Self {
        self.rows
            .iter()
            .map(GlobalTimedRow::position_invariant)
            .collect()
    }
}
