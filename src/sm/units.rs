//! Semantic units over the rational substrate.
//!
//! Each dimension used by charts gets its own newtype over [`Rational`] so
//! that, say, a beat count cannot be mistaken for seconds. Arithmetic
//! between unlike dimensions goes through the explicit conversions defined
//! here ([`Beat::as_measure`], [`Bpm::measures_per_second`], …).

use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::sm::rational::Rational;

/// Beats-per-minute, the rate of row advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bpm(Rational);

impl Bpm {
    /// Wraps a rational BPM value.
    pub const fn new(value: Rational) -> Self {
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }

    /// Seconds spent per measure at this tempo: `240 / bpm`.
    ///
    /// # Panics
    ///
    /// Panics if the BPM is zero. The timing resolver rejects non-positive
    /// tempos before ever dividing by them.
    pub fn measures_per_second(self) -> Rational {
        Rational::from_integer(240) / self.0
    }

    /// The 192nd-row rate derived from the measure rate: `192 · 240 / bpm`.
    pub fn rows_per_second(self) -> Rational {
        self.measures_per_second() * Rational::from_integer(192)
    }
}

impl From<i64> for Bpm {
    fn from(value: i64) -> Self {
        Self(Rational::from_integer(value))
    }
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position expressed in beats, the native unit of the file format.
///
/// Time signatures are fixed at 4/4, so a beat is always a quarter of a
/// measure; convert with [`Beat::as_measure`] and position everything in
/// measures from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beat(Rational);

impl Beat {
    /// Wraps a rational beat count.
    pub const fn new(value: Rational) -> Self {
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }

    /// Converts to measures: `beat / 4`.
    pub fn as_measure(self) -> Measure {
        Measure(self.0 / Rational::from_integer(4))
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A continuous position within a chart, in measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure(Rational);

impl Measure {
    /// Wraps a rational measure count.
    pub const fn new(value: Rational) -> Self {
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }
}

impl From<i64> for Measure {
    fn from(value: i64) -> Self {
        Self(Rational::from_integer(value))
    }
}

impl Add for Measure {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Measure {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Add<LocalPosition> for Measure {
    type Output = GlobalPosition;

    fn add(self, rhs: LocalPosition) -> GlobalPosition {
        GlobalPosition(self.0 + rhs.0)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discrete position within a single measure.
///
/// Constrained to `0 <= p < 1` with a denominator in `[1, 192]`; the
/// parser guarantees both by constructing positions as `i / N` with `N`
/// drawn from the recognized snap counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalPosition(Rational);

impl LocalPosition {
    /// Wraps a rational in `[0, 1)`.
    pub fn new(value: Rational) -> Self {
        debug_assert!(value >= Rational::from_integer(0) && value < Rational::from_integer(1));
        debug_assert!((1_i64..=192).contains(value.denom()));
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }

    /// The subdivision color this position snaps to.
    pub fn snap(self) -> Snap {
        Snap::from_denominator(*self.0.denom())
    }
}

impl fmt::Display for LocalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discrete position within a chart, in measures from its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalPosition(Rational);

impl GlobalPosition {
    /// Wraps a non-negative rational measure position.
    pub fn new(value: Rational) -> Self {
        debug_assert!(value >= Rational::from_integer(0));
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }

    /// The measure this position falls in.
    pub fn measure_index(self) -> i64 {
        self.0.floor().to_integer()
    }

    /// The position within its measure.
    pub fn local(self) -> LocalPosition {
        LocalPosition(self.0 - self.0.floor())
    }

    /// The subdivision color this position snaps to.
    pub fn snap(self) -> Snap {
        Snap::from_denominator(*self.0.denom())
    }
}

impl fmt::Display for GlobalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Real time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(Rational);

impl Time {
    /// Zero seconds.
    pub const ZERO: Self = Self(Rational::new_raw(0, 1));

    /// Wraps a rational second count.
    pub const fn new(value: Rational) -> Self {
        Self(value)
    }

    /// The wrapped rational.
    pub const fn value(self) -> Rational {
        self.0
    }

    /// Rounds to millisecond precision, still exact.
    pub fn limited_precision(self) -> Self {
        Self((self.0 * Rational::from_integer(1000)).round() / Rational::from_integer(1000))
    }

    /// The nearest whole millisecond.
    pub fn as_millis(self) -> i64 {
        (self.0 * Rational::from_integer(1000)).round().to_integer()
    }
}

impl From<i64> for Time {
    fn from(seconds: i64) -> Self {
        Self(Rational::from_integer(seconds))
    }
}

impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Time {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// A value that is either exact or a wildcard matching any value of its
/// dimension.
///
/// The wildcard exists so two enriched rows can be compared modulo
/// position, modulo time, or modulo delta: replace the field with
/// [`MaybeExact::Any`] on both sides and compare. `Any` equals `Any`,
/// differs from every exact value, and swallows arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaybeExact<T> {
    /// An ordinary exact value.
    Exact(T),
    /// The wildcard.
    Any,
}

impl<T> MaybeExact<T> {
    /// The exact value, if this is not the wildcard.
    pub fn exact(self) -> Option<T> {
        match self {
            Self::Exact(value) => Some(value),
            Self::Any => None,
        }
    }

    /// Whether this is the wildcard.
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Applies `f` to the exact value, keeping the wildcard as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaybeExact<U> {
        match self {
            Self::Exact(value) => MaybeExact::Exact(f(value)),
            Self::Any => MaybeExact::Any,
        }
    }
}

impl<T> From<T> for MaybeExact<T> {
    fn from(value: T) -> Self {
        Self::Exact(value)
    }
}

impl<T: Add<Output = T>> Add for MaybeExact<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a + b),
            _ => Self::Any,
        }
    }
}

impl<T: Sub<Output = T>> Sub for MaybeExact<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a - b),
            _ => Self::Any,
        }
    }
}

impl<T: fmt::Display> fmt::Display for MaybeExact<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => value.fmt(f),
            Self::Any => f.write_str("*"),
        }
    }
}

/// The color-coded subdivision families used by the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Snap {
    /// 4ths.
    Red,
    /// 8ths.
    Blue,
    /// 12ths.
    Violet,
    /// 16ths.
    Yellow,
    /// 24ths.
    Pink,
    /// 32nds.
    Orange,
    /// 48ths.
    Cyan,
    /// 64ths.
    Green,
    /// Everything finer.
    Gray,
}

impl Snap {
    /// Rows per measure at this subdivision.
    pub const fn subdivisions(self) -> i64 {
        match self {
            Self::Red => 4,
            Self::Blue => 8,
            Self::Violet => 12,
            Self::Yellow => 16,
            Self::Pink => 24,
            Self::Orange => 32,
            Self::Cyan => 48,
            Self::Green => 64,
            Self::Gray => 192,
        }
    }

    /// Maps a position denominator onto its snap color.
    ///
    /// Denominators 1 and 2 reduce onto the 4th grid and 3 and 6 onto the
    /// 12th grid; anything not on a recognized grid is [`Snap::Gray`].
    pub const fn from_denominator(denominator: i64) -> Self {
        match denominator {
            1 | 2 | 4 => Self::Red,
            8 => Self::Blue,
            3 | 6 | 12 => Self::Violet,
            16 => Self::Yellow,
            24 => Self::Pink,
            32 => Self::Orange,
            48 => Self::Cyan,
            64 => Self::Green,
            _ => Self::Gray,
        }
    }
}
