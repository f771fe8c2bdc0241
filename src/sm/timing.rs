//! The timing resolver: musical positions to real time.
//!
//! A single forward sweep walks the rows in position order while
//! consuming the BPM schedule and the stop schedule, accumulating exact
//! elapsed seconds. No floating point is involved anywhere.

use crate::sm::StructuralError;
use crate::sm::pairs::{MeasureBpmPair, MeasureMeasurePair};
use crate::sm::notefield::{TimedNotefield, UntimedNotefield};
use crate::sm::rational::Rational;
use crate::sm::units::{Bpm, Time};

/// Resolves every row of `field` to real time under the given BPM
/// schedule, stop schedule and offset.
///
/// The first BPM segment is effective from measure 0 even when it is
/// listed later; a segment lying exactly on a row's measure applies
/// strictly after that row; a stop lying on a row's measure is applied
/// before the row's time is emitted. Segments past the last row never
/// contribute.
///
/// # Errors
///
/// - [`StructuralError::EmptyBpmSchedule`] when no tempo is defined.
/// - [`StructuralError::NonPositiveBpm`] when a segment's tempo is zero
///   or negative.
/// - [`StructuralError::NonMonotonicRows`] when positions do not
///   strictly increase.
/// - [`StructuralError::WildcardPosition`] when a row's position is the
///   wildcard.
pub fn resolve(
    field: &UntimedNotefield,
    bpms: &[MeasureBpmPair],
    stops: &[MeasureMeasurePair],
    offset: Time,
) -> Result<TimedNotefield, StructuralError> {
    let mut bpm_schedule = bpms.to_vec();
    bpm_schedule.sort_by_key(|pair| pair.measure);
    let mut stop_schedule = stops.to_vec();
    stop_schedule.sort_by_key(|pair| pair.measure);

    let mut current = *bpm_schedule
        .first()
        .ok_or(StructuralError::EmptyBpmSchedule)?;
    let mut next_bpm = 1;
    let mut next_stop = 0;

    let mut elapsed = Rational::from_integer(0);
    let mut cursor = Rational::from_integer(0);
    let mut previous: Option<Rational> = None;

    tracing::trace!(
        rows = field.len(),
        bpm_segments = bpm_schedule.len(),
        stops = stop_schedule.len(),
        "resolving timing"
    );

    let mut timed = Vec::with_capacity(field.len());
    for row in field {
        let position = row
            .exact_position()
            .ok_or(StructuralError::WildcardPosition)?
            .value();
        if previous.is_some_and(|prev| prev >= position) {
            return Err(StructuralError::NonMonotonicRows);
        }
        previous = Some(position);

        while next_bpm < bpm_schedule.len() && bpm_schedule[next_bpm].measure.value() < position {
            let segment = bpm_schedule[next_bpm];
            elapsed += (segment.measure.value() - cursor) * seconds_per_measure(current.bpm)?;
            cursor = segment.measure.value();
            current = segment;
            next_bpm += 1;
        }

        elapsed += (position - cursor) * seconds_per_measure(current.bpm)?;
        cursor = position;

        while next_stop < stop_schedule.len() && stop_schedule[next_stop].measure.value() <= cursor
        {
            elapsed += stop_schedule[next_stop].value.value() * seconds_per_measure(current.bpm)?;
            next_stop += 1;
        }

        timed.push(row.clone().with_time(Time::new(elapsed) - offset));
    }

    Ok(TimedNotefield::new(timed))
}

/// The display range synthesized when a simfile has no DISPLAYBPM tag:
/// the minimum and maximum tempos of the schedule.
pub fn display_bpm_range(bpms: &[MeasureBpmPair]) -> Option<(Bpm, Bpm)> {
    let min = bpms.iter().map(|pair| pair.bpm).min()?;
    let max = bpms.iter().map(|pair| pair.bpm).max()?;
    Some((min, max))
}

fn seconds_per_measure(bpm: Bpm) -> Result<Rational, StructuralError> {
    if bpm.value() <= Rational::from_integer(0) {
        return Err(StructuralError::NonPositiveBpm { bpm });
    }
    Ok(bpm.measures_per_second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm::note::PureRow;
    use crate::sm::row::GlobalRow;
    use crate::sm::units::{GlobalPosition, Measure};

    fn field_at(positions: &[Rational]) -> UntimedNotefield {
        positions
            .iter()
            .map(|&p| {
                GlobalRow::new(
                    PureRow::from_str_row("1000").unwrap(),
                    GlobalPosition::new(p),
                )
            })
            .collect()
    }

    fn bpm(measure: i64, value: i64) -> MeasureBpmPair {
        MeasureBpmPair {
            measure: Measure::from(measure),
            bpm: Bpm::from(value),
        }
    }

    fn times(field: &TimedNotefield) -> Vec<Rational> {
        field
            .iter()
            .map(|row| row.exact_time().unwrap().value())
            .collect()
    }

    #[test]
    fn single_bpm_is_linear() {
        let field = field_at(&[
            Rational::from_integer(0),
            Rational::new(1, 4),
            Rational::new(1, 2),
            Rational::new(3, 4),
        ]);
        let timed = resolve(&field, &[bpm(0, 120)], &[], Time::ZERO).unwrap();
        assert_eq!(
            times(&timed),
            vec![
                Rational::from_integer(0),
                Rational::new(1, 2),
                Rational::from_integer(1),
                Rational::new(3, 2),
            ]
        );
    }

    #[test]
    fn bpm_change_splits_the_sweep() {
        let field = field_at(&[
            Rational::from_integer(0),
            Rational::from_integer(1),
            Rational::from_integer(2),
        ]);
        let timed = resolve(&field, &[bpm(0, 120), bpm(1, 60)], &[], Time::ZERO).unwrap();
        assert_eq!(
            times(&timed),
            vec![
                Rational::from_integer(0),
                Rational::from_integer(2),
                Rational::from_integer(6),
            ]
        );
    }

    #[test]
    fn stop_delays_later_rows_only() {
        let field = field_at(&[Rational::from_integer(0), Rational::from_integer(2)]);
        let stop = MeasureMeasurePair {
            measure: Measure::from(1),
            value: Measure::new(Rational::new(1, 2)),
        };
        let timed = resolve(&field, &[bpm(0, 120)], &[stop], Time::ZERO).unwrap();
        assert_eq!(
            times(&timed),
            vec![Rational::from_integer(0), Rational::from_integer(5)]
        );
    }

    #[test]
    fn offset_shifts_everything() {
        let field = field_at(&[Rational::from_integer(0)]);
        let timed = resolve(
            &field,
            &[bpm(0, 120)],
            &[],
            Time::new(Rational::new(1, 2)),
        )
        .unwrap();
        assert_eq!(times(&timed), vec![Rational::new(-1, 2)]);
    }

    #[test]
    fn empty_schedule_is_structural() {
        let field = field_at(&[Rational::from_integer(0)]);
        assert_eq!(
            resolve(&field, &[], &[], Time::ZERO),
            Err(StructuralError::EmptyBpmSchedule)
        );
    }

    #[test]
    fn first_segment_counts_from_zero() {
        let field = field_at(&[Rational::from_integer(1)]);
        let timed = resolve(&field, &[bpm(4, 120)], &[], Time::ZERO).unwrap();
        assert_eq!(times(&timed), vec![Rational::from_integer(2)]);
    }

    #[test]
    fn non_monotonic_rows_are_structural() {
        let field = field_at(&[Rational::from_integer(1), Rational::from_integer(1)]);
        assert_eq!(
            resolve(&field, &[bpm(0, 120)], &[], Time::ZERO),
            Err(StructuralError::NonMonotonicRows)
        );
    }
}
