//! The chart and simfile containers.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::sm::StructuralError;
use crate::sm::notefield::{TimedNotefield, UntimedNotefield};
use crate::sm::pairs::{MeasureBpmPair, MeasureMeasurePair};
use crate::sm::rational::Rational;
use crate::sm::timing;
use crate::sm::units::{Bpm, Time};

/// A chart as parsed: positioned rows, no timing applied yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PureChart {
    /// The game type the chart targets, e.g. `dance-single`.
    pub game_mode: String,
    /// Who placed the steps, when credited.
    pub step_artist: Option<String>,
    /// The difficulty slot name, e.g. `Challenge`.
    pub diff_name: String,
    /// The numeric difficulty rating.
    pub diff_value: u32,
    /// The positioned rows.
    pub note_field: UntimedNotefield,
}

impl PureChart {
    /// Applies a timing schedule, producing an [`AugmentedChart`] that
    /// keeps its own copy of the schedule it was resolved under.
    ///
    /// # Errors
    ///
    /// Propagates [`StructuralError`] from the timing resolver.
    pub fn evolve(
        &self,
        bpm_segments: &[MeasureBpmPair],
        stop_segments: &[MeasureMeasurePair],
        offset: Time,
    ) -> Result<AugmentedChart, StructuralError> {
        let note_field = timing::resolve(&self.note_field, bpm_segments, stop_segments, offset)?;
        Ok(AugmentedChart {
            game_mode: self.game_mode.clone(),
            step_artist: self.step_artist.clone(),
            diff_name: self.diff_name.clone(),
            diff_value: self.diff_value,
            note_field,
            bpm_segments: bpm_segments.to_vec(),
            stop_segments: stop_segments.to_vec(),
            offset,
        })
    }
}

/// A timed chart, carrying the timing snapshot it was resolved under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AugmentedChart {
    /// The game type the chart targets.
    pub game_mode: String,
    /// Who placed the steps, when credited.
    pub step_artist: Option<String>,
    /// The difficulty slot name.
    pub diff_name: String,
    /// The numeric difficulty rating.
    pub diff_value: u32,
    /// The timed rows.
    pub note_field: TimedNotefield,
    /// The BPM schedule the timing was computed from.
    pub bpm_segments: Vec<MeasureBpmPair>,
    /// The stop schedule the timing was computed from.
    pub stop_segments: Vec<MeasureMeasurePair>,
    /// The offset the timing was computed from.
    pub offset: Time,
}

/// What the song-select screen should display as the tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayBpm {
    /// `*`: the display cycles, the real tempo varies.
    Variable,
    /// A fixed range; a constant tempo is a degenerate range.
    Range(Bpm, Bpm),
}

/// A parsed simfile: metadata, the canonical timing schedule, and every
/// chart already resolved against it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Simfile {
    /// The song title.
    pub title: String,
    /// The song subtitle.
    pub subtitle: String,
    /// The song artist.
    pub artist: String,
    /// The song genre.
    pub genre: String,
    /// Who packaged the simfile.
    pub credit: String,
    /// The audio file, relative to [`Simfile::base_dir`].
    pub music_path: Option<PathBuf>,
    /// The banner image, relative to [`Simfile::base_dir`].
    pub banner_path: Option<PathBuf>,
    /// The background image, relative to [`Simfile::base_dir`].
    pub background_path: Option<PathBuf>,
    /// The CD title sprite, relative to [`Simfile::base_dir`].
    pub cdtitle_path: Option<PathBuf>,
    /// Where the song-select preview starts.
    pub sample_start: Time,
    /// How long the song-select preview plays.
    pub sample_length: Time,
    /// The displayed tempo; synthesized from the schedule when the file
    /// has no DISPLAYBPM tag.
    pub display_bpm: Option<DisplayBpm>,
    /// The canonical BPM schedule.
    pub bpm_segments: Vec<MeasureBpmPair>,
    /// The canonical stop schedule.
    pub stop_segments: Vec<MeasureMeasurePair>,
    /// The audio offset subtracted from every computed time.
    pub offset: Time,
    /// Unrecognized tags, keyed by their uppercased name.
    pub meta: HashMap<String, String>,
    /// Every chart, timed against the canonical schedule.
    pub charts: Vec<AugmentedChart>,
    /// The directory the simfile was read from; asset paths resolve
    /// against it. `None` when parsed from bare text.
    pub base_dir: Option<PathBuf>,
}

impl Default for Simfile {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            artist: String::new(),
            genre: String::new(),
            credit: String::new(),
            music_path: None,
            banner_path: None,
            background_path: None,
            cdtitle_path: None,
            sample_start: Time::ZERO,
            sample_length: Time::new(Rational::from_integer(10)),
            display_bpm: None,
            bpm_segments: Vec::new(),
            stop_segments: Vec::new(),
            offset: Time::ZERO,
            meta: HashMap::new(),
            charts: Vec::new(),
            base_dir: None,
        }
    }
}

impl Simfile {
    /// Resolves an asset path against the simfile's directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    fn open_asset(&self, path: Option<&PathBuf>) -> Option<io::Result<File>> {
        path.map(|p| File::open(self.resolve(p)))
    }

    /// Opens the audio file, when one is referenced. The handle is the
    /// caller's to close.
    pub fn music_file(&self) -> Option<io::Result<File>> {
        self.open_asset(self.music_path.as_ref())
    }

    /// Opens the banner image, when one is referenced.
    pub fn banner_file(&self) -> Option<io::Result<File>> {
        self.open_asset(self.banner_path.as_ref())
    }

    /// Opens the background image, when one is referenced.
    pub fn background_file(&self) -> Option<io::Result<File>> {
        self.open_asset(self.background_path.as_ref())
    }

    /// Opens the CD title sprite, when one is referenced.
    pub fn cdtitle_file(&self) -> Option<io::Result<File>> {
        self.open_asset(self.cdtitle_path.as_ref())
    }
}
