//! Positioned row variants.
//!
//! Enrichment is progressive composition rather than a subtype chain: a
//! [`PureRow`] gains a [`LocalPosition`] to become a [`LocalRow`], a
//! [`GlobalPosition`] to become a [`GlobalRow`], then real [`Time`], then
//! a delta to the following row. Position, time and delta fields are
//! [`MaybeExact`] so a row can be compared modulo any of them.

use crate::sm::note::PureRow;
use crate::sm::units::{GlobalPosition, LocalPosition, MaybeExact, Measure, Snap, Time};

/// Access to the pure-row payload shared by every enrichment level.
///
/// Notefield transforms that only look at lane contents are generic over
/// this trait, so they apply uniformly to untimed, timed and delta rows.
pub trait NoteRow {
    /// The lane contents of this row.
    fn pure_row(&self) -> &PureRow;

    /// This row with its lane contents replaced.
    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self;
}

impl NoteRow for PureRow {
    fn pure_row(&self) -> &PureRow {
        self
    }

    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self {
        f(self)
    }
}

impl PureRow {
    /// Places this row within a measure, starting the enrichment chain.
    pub const fn at_local(self, position: LocalPosition) -> LocalRow {
        LocalRow {
            row: self,
            position,
        }
    }
}

/// A row placed within a single measure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalRow {
    row: PureRow,
    position: LocalPosition,
}

impl LocalRow {
    /// Attaches a measure-local position to a row.
    pub const fn new(row: PureRow, position: LocalPosition) -> Self {
        Self { row, position }
    }

    /// The lane contents.
    pub const fn row(&self) -> &PureRow {
        &self.row
    }

    /// The position within the measure.
    pub const fn position(&self) -> LocalPosition {
        self.position
    }

    /// The subdivision color of the position.
    pub fn snap(&self) -> Snap {
        self.position.snap()
    }

    /// Places this row globally within the chart at the given measure.
    pub fn at_measure(self, measure: Measure) -> GlobalRow {
        GlobalRow {
            row: self.row,
            position: MaybeExact::Exact(measure + self.position),
        }
    }
}

impl NoteRow for LocalRow {
    fn pure_row(&self) -> &PureRow {
        &self.row
    }

    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self {
        Self {
            row: f(self.row),
            position: self.position,
        }
    }
}

/// A row placed within a chart, in measures from its start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalRow {
    row: PureRow,
    position: MaybeExact<GlobalPosition>,
}

impl GlobalRow {
    /// Attaches a chart-global position to a row.
    pub const fn new(row: PureRow, position: GlobalPosition) -> Self {
        Self {
            row,
            position: MaybeExact::Exact(position),
        }
    }

    /// The lane contents.
    pub const fn row(&self) -> &PureRow {
        &self.row
    }

    /// The chart-global position, possibly the wildcard.
    pub const fn position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }

    /// The chart-global position when it is exact.
    pub fn exact_position(&self) -> Option<GlobalPosition> {
        self.position.exact()
    }

    /// A copy comparing equal to any row with the same contents,
    /// regardless of position.
    pub fn position_invariant(&self) -> Self {
        Self {
            row: self.row.clone(),
            position: MaybeExact::Any,
        }
    }

    /// Enriches this row with real time.
    pub fn with_time(self, time: Time) -> GlobalTimedRow {
        GlobalTimedRow {
            row: self.row,
            position: self.position,
            time: MaybeExact::Exact(time),
        }
    }
}

impl NoteRow for GlobalRow {
    fn pure_row(&self) -> &PureRow {
        &self.row
    }

    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self {
        Self {
            row: f(self.row),
            position: self.position,
        }
    }
}

/// A globally positioned row with its arrival time attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalTimedRow {
    row: PureRow,
    position: MaybeExact<GlobalPosition>,
    time: MaybeExact<Time>,
}

impl GlobalTimedRow {
    /// The lane contents.
    pub const fn row(&self) -> &PureRow {
        &self.row
    }

    /// The chart-global position, possibly the wildcard.
    pub const fn position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }

    /// The chart-global position when it is exact.
    pub fn exact_position(&self) -> Option<GlobalPosition> {
        self.position.exact()
    }

    /// The arrival time, possibly the wildcard.
    pub const fn time(&self) -> MaybeExact<Time> {
        self.time
    }

    /// The arrival time when it is exact.
    pub fn exact_time(&self) -> Option<Time> {
        self.time.exact()
    }

    /// A copy with the position wildcarded.
    pub fn position_invariant(&self) -> Self {
        Self {
            row: self.row.clone(),
            position: MaybeExact::Any,
            time: self.time,
        }
    }

    /// A copy with the time wildcarded.
    pub fn time_invariant(&self) -> Self {
        Self {
            row: self.row.clone(),
            position: self.position,
            time: MaybeExact::Any,
        }
    }

    /// A copy with `f` applied to the time; the wildcard stays put.
    pub fn map_time(self, f: impl FnOnce(Time) -> Time) -> Self {
        Self {
            time: self.time.map(f),
            ..self
        }
    }

    /// Enriches this row with the time left until the next row.
    pub fn with_delta(self, delta: Time) -> GlobalDeltaRow {
        GlobalDeltaRow {
            row: self.row,
            position: self.position,
            time: self.time,
            delta: MaybeExact::Exact(delta),
        }
    }
}

impl NoteRow for GlobalTimedRow {
    fn pure_row(&self) -> &PureRow {
        &self.row
    }

    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self {
        Self {
            row: f(self.row),
            position: self.position,
            time: self.time,
        }
    }
}

/// A timed row that also knows how long until the next row arrives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalDeltaRow {
    row: PureRow,
    position: MaybeExact<GlobalPosition>,
    time: MaybeExact<Time>,
    delta: MaybeExact<Time>,
}

impl GlobalDeltaRow {
    /// Builds a delta row from two consecutive timed rows: the delta is
    /// `next.time - this.time` (wildcards propagate).
    pub fn from_consecutive(current: &GlobalTimedRow, next: &GlobalTimedRow) -> Self {
        Self {
            row: current.row.clone(),
            position: current.position,
            time: current.time,
            delta: next.time - current.time,
        }
    }

    /// The lane contents.
    pub const fn row(&self) -> &PureRow {
        &self.row
    }

    /// The chart-global position, possibly the wildcard.
    pub const fn position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }

    /// The chart-global position when it is exact.
    pub fn exact_position(&self) -> Option<GlobalPosition> {
        self.position.exact()
    }

    /// The arrival time, possibly the wildcard.
    pub const fn time(&self) -> MaybeExact<Time> {
        self.time
    }

    /// The arrival time when it is exact.
    pub fn exact_time(&self) -> Option<Time> {
        self.time.exact()
    }

    /// The time to the next row, possibly the wildcard.
    pub const fn delta(&self) -> MaybeExact<Time> {
        self.delta
    }

    /// The time to the next row when it is exact.
    pub fn exact_delta(&self) -> Option<Time> {
        self.delta.exact()
    }

    /// A copy with the position wildcarded.
    pub fn position_invariant(&self) -> Self {
        Self {
            position: MaybeExact::Any,
            ..self.clone()
        }
    }

    /// A copy with the time wildcarded.
    pub fn time_invariant(&self) -> Self {
        Self {
            time: MaybeExact::Any,
            ..self.clone()
        }
    }

    /// A copy with the delta wildcarded.
    pub fn delta_invariant(&self) -> Self {
        Self {
            delta: MaybeExact::Any,
            ..self.clone()
        }
    }
}

impl NoteRow for GlobalDeltaRow {
    fn pure_row(&self) -> &PureRow {
        &self.row
    }

    fn map_row(self, f: impl FnOnce(PureRow) -> PureRow) -> Self {
        Self {
            row: f(self.row),
            position: self.position,
            time: self.time,
            delta: self.delta,
        }
    }
}

/// Rows that carry a chart-global position.
pub trait PositionedRow: NoteRow {
    /// The chart-global position, possibly the wildcard.
    fn global_position(&self) -> MaybeExact<GlobalPosition>;

    /// The subdivision color, when the position is exact.
    fn snap(&self) -> Option<Snap> {
        self.global_position().exact().map(GlobalPosition::snap)
    }
}

impl PositionedRow for GlobalRow {
    fn global_position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }
}

impl PositionedRow for GlobalTimedRow {
    fn global_position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }
}

impl PositionedRow for GlobalDeltaRow {
    fn global_position(&self) -> MaybeExact<GlobalPosition> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm::rational::Rational;

    fn timed(text: &str, measure: i64, seconds: Rational) -> GlobalTimedRow {
        GlobalRow::new(
            PureRow::from_str_row(text).unwrap(),
            GlobalPosition::new(Rational::from_integer(measure)),
        )
        .with_time(Time::new(seconds))
    }

    #[test]
    fn enrichment_chain() {
        let local = LocalRow::new(
            PureRow::from_str_row("1000").unwrap(),
            LocalPosition::new(Rational::new(1, 4)),
        );
        let global = local.at_measure(Measure::from(2));
        assert_eq!(
            global.exact_position(),
            Some(GlobalPosition::new(Rational::new(9, 4)))
        );
    }

    #[test]
    fn time_invariant_compares_modulo_time() {
        let a = timed("1000", 0, Rational::from_integer(1));
        let b = timed("1000", 0, Rational::from_integer(7));
        assert_ne!(a, b);
        assert_eq!(a.time_invariant(), b.time_invariant());
    }

    #[test]
    fn delta_from_consecutive() {
        let a = timed("1000", 0, Rational::new(1, 2));
        let b = timed("0100", 1, Rational::from_integer(2));
        let delta = GlobalDeltaRow::from_consecutive(&a, &b);
        assert_eq!(delta.exact_delta(), Some(Time::new(Rational::new(3, 2))));
        assert_eq!(delta.delta_invariant().exact_delta(), None);
    }
}
