//! Chart analysis over notefields: occurrence statistics, lane
//! permutation groups, density and uniformity measurements.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use num::ToPrimitive;

use crate::sm::note::{NoteObject, PureRow};
use crate::sm::notefield::{Notefield, TimedNotefield};
use crate::sm::rational::Rational;
use crate::sm::row::NoteRow;
use crate::sm::units::Time;

/// A row pattern needs at least this many consecutive deltas before its
/// spacing statistics mean anything.
const MIN_UNIFORMITY_DELTAS: usize = 7;

impl<R: NoteRow> Notefield<R> {
    /// The distinct pure rows appearing in the field.
    pub fn unique_pure_rows(&self) -> HashSet<PureRow> {
        self.iter().map(|row| row.pure_row().clone()).collect()
    }

    /// How many times each pure row appears.
    pub fn occurrence_counter(&self) -> HashMap<PureRow, usize> {
        let mut counter = HashMap::new();
        for row in self {
            *counter.entry(row.pure_row().clone()).or_insert(0) += 1;
        }
        counter
    }

    /// The note objects actually used anywhere in the field.
    pub fn alphabet(&self) -> BTreeSet<NoteObject> {
        self.iter()
            .flat_map(|row| row.pure_row().iter().copied())
            .collect()
    }

    /// How much of the possible row space the field uses:
    /// `|unique rows| / |alphabet|^width`. Zero for an empty field.
    pub fn row_complexity(&self) -> Rational {
        let Some(first) = self.rows().first() else {
            return Rational::from_integer(0);
        };
        let width = u32::try_from(first.pure_row().width()).unwrap_or(u32::MAX);
        let alphabet = i64::try_from(self.alphabet().len()).unwrap_or(i64::MAX);
        let full_size = alphabet.pow(width);
        let unique = i64::try_from(self.unique_pure_rows().len()).unwrap_or(i64::MAX);
        Rational::new(unique, full_size)
    }
}

impl<R: NoteRow + Clone> Notefield<R> {
    /// Every lane relabeling of the whole sequence: all `width!`
    /// permutations applied row-wise, deduplicated, insertion order.
    ///
    /// The identity relabeling comes first, so the result always contains
    /// the original sequence. Per-row permutation results are memoized
    /// within the call; the combinatorics still grow factorially with
    /// lane count, so keep this to ordinary chart widths.
    pub fn permutation_group(&self) -> Vec<Vec<PureRow>> {
        let Some(first) = self.rows().first() else {
            return Vec::new();
        };
        let width = first.pure_row().width();

        let mut seen = HashSet::new();
        let mut group = Vec::new();
        for mapping in (0..width).permutations(width) {
            let mut memo: HashMap<&PureRow, PureRow> = HashMap::new();
            let relabeled: Vec<PureRow> = self
                .iter()
                .map(|row| {
                    memo.entry(row.pure_row())
                        .or_insert_with(|| row.pure_row().switch_lanes(&mapping))
                        .clone()
                })
                .collect();
            if seen.insert(relabeled.clone()) {
                group.push(relabeled);
            }
        }
        group
    }
}

impl TimedNotefield {
    /// A fuzzy notes-per-second map: every judge-important row smears a
    /// triangular kernel of half-width `window_ms` milliseconds around
    /// its (millisecond-discretized) time, normalized by the window.
    ///
    /// Returns an empty map when `window_ms` is not positive.
    pub fn density_map(&self, window_ms: i64) -> BTreeMap<i64, Rational> {
        if window_ms <= 0 {
            return BTreeMap::new();
        }

        let mut density: BTreeMap<i64, Rational> = BTreeMap::new();
        for row in self {
            if row.row().is_judge_non_important() {
                continue;
            }
            let Some(time) = row.exact_time() else {
                continue;
            };
            let center = time.as_millis();
            for offset in -window_ms..=window_ms {
                let weight = Rational::new(window_ms - offset.abs(), window_ms);
                density
                    .entry(center + offset)
                    .and_modify(|total| *total += weight)
                    .or_insert(weight);
            }
        }
        density
    }

    /// Spacing statistics per recurring pure row: for each unique row
    /// with at least seven consecutive deltas between occurrences, the
    /// mean delta and the sample standard deviation of the deltas.
    pub fn uniformity_map(&self) -> HashMap<PureRow, (Time, f64)> {
        let mut occurrences: HashMap<&PureRow, Vec<Time>> = HashMap::new();
        for row in self {
            if let Some(time) = row.exact_time() {
                occurrences.entry(row.row()).or_default().push(time);
            }
        }

        let mut result = HashMap::new();
        for (key, mut times) in occurrences {
            times.sort();
            let deltas: Vec<Rational> = times
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).value())
                .collect();
            if deltas.len() < MIN_UNIFORMITY_DELTAS {
                continue;
            }

            let count = i64::try_from(deltas.len()).unwrap_or(i64::MAX);
            let mean = deltas.iter().sum::<Rational>() / Rational::from_integer(count);
            let variance = deltas
                .iter()
                .map(|delta| (delta - mean) * (delta - mean))
                .sum::<Rational>()
                / Rational::from_integer(count - 1);
            let deviation = variance.to_f64().unwrap_or(f64::NAN).sqrt();
            result.insert(key.clone(), (Time::new(mean), deviation));
        }
        result
    }
}
