//! The transformer: tag tokens to a typed [`Simfile`].
//!
//! Values are assembled bottom-up the way the grammar nests: characters
//! into rows, rows into measures with local positions `i/N`, measures
//! into a globally positioned notefield, notefields into charts, and
//! charts plus metadata into the simfile, whose schedule then times every
//! chart.

use std::path::Path;

use tracing::debug;

use crate::sm::lex::{LexicalError, SyntaxError, TagToken, TextPosition};
use crate::sm::model::{DisplayBpm, PureChart, Simfile};
use crate::sm::note::{NoteObject, PureRow};
use crate::sm::notefield::UntimedNotefield;
use crate::sm::pairs::{MeasureBpmPair, MeasureMeasurePair};
use crate::sm::rational::{Rational, parse_decimal};
use crate::sm::row::NoteRow;
use crate::sm::units::{Bpm, LocalPosition, Measure, Time};
use crate::sm::{Result, SmError, StructuralError};

/// The measure row counts the format recognizes, one per snap.
const SNAP_ROW_COUNTS: [usize; 9] = [4, 8, 12, 16, 24, 32, 48, 64, 192];

/// The lane widths the format recognizes (4-key, 6-key, 8-key modes).
const LANE_WIDTHS: [usize; 3] = [4, 6, 8];

/// Assembles scanned tokens into a [`Simfile`].
pub(crate) fn build_simfile(tokens: &[TagToken<'_>], base_dir: Option<&Path>) -> Result<Simfile> {
    let mut simfile = Simfile {
        base_dir: base_dir.map(Path::to_path_buf),
        ..Simfile::default()
    };
    let mut pure_charts = Vec::new();

    for token in tokens {
        let name = token.name.to_ascii_uppercase();
        match name.as_str() {
            "TITLE" => simfile.title = token.value.trim().to_owned(),
            "SUBTITLE" => simfile.subtitle = token.value.trim().to_owned(),
            "ARTIST" => simfile.artist = token.value.trim().to_owned(),
            "GENRE" => simfile.genre = token.value.trim().to_owned(),
            "CREDIT" => simfile.credit = token.value.trim().to_owned(),
            "MUSIC" => simfile.music_path = path_value(token.value),
            "BANNER" => simfile.banner_path = path_value(token.value),
            "BACKGROUND" => simfile.background_path = path_value(token.value),
            "CDTITLE" => simfile.cdtitle_path = path_value(token.value),
            "SAMPLESTART" => simfile.sample_start = time_value(token.value, token.position)?,
            "SAMPLELENGTH" => simfile.sample_length = time_value(token.value, token.position)?,
            "OFFSET" => simfile.offset = time_value(token.value, token.position)?,
            "DISPLAYBPM" => {
                simfile.display_bpm = Some(parse_display_bpm(token.value, token.position)?);
            }
            "BPMS" => simfile
                .bpm_segments
                .extend(MeasureBpmPair::parse_list(token.value, token.position)?),
            "STOPS" => simfile
                .stop_segments
                .extend(MeasureMeasurePair::parse_list(token.value, token.position)?),
            "NOTES" => pure_charts.push(parse_chart(token.value, token.position)?),
            _ => {
                simfile.meta.insert(name, token.value.trim().to_owned());
            }
        }
    }

    if simfile.bpm_segments.is_empty() {
        return Err(StructuralError::EmptyBpmSchedule.into());
    }
    if simfile.display_bpm.is_none() {
        simfile.display_bpm = crate::sm::timing::display_bpm_range(&simfile.bpm_segments)
            .map(|(min, max)| DisplayBpm::Range(min, max));
    }

    for chart in pure_charts {
        simfile.charts.push(chart.evolve(
            &simfile.bpm_segments,
            &simfile.stop_segments,
            simfile.offset,
        )?);
    }

    debug!(
        title = %simfile.title,
        charts = simfile.charts.len(),
        meta_tags = simfile.meta.len(),
        "simfile assembled"
    );

    Ok(simfile)
}

fn path_value(value: &str) -> Option<std::path::PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| std::path::PathBuf::from(trimmed))
}

fn time_value(value: &str, position: TextPosition) -> Result<Time> {
    parse_decimal(value)
        .map(Time::new)
        .ok_or_else(|| malformed(value, position).into())
}

fn malformed(text: &str, position: TextPosition) -> LexicalError {
    LexicalError::MalformedNumber {
        text: text.trim().to_owned(),
        position,
    }
}

/// `*`, a single tempo, or a `lo:hi` range, normalized low-to-high.
fn parse_display_bpm(value: &str, position: TextPosition) -> Result<DisplayBpm> {
    let value = value.trim();
    if value == "*" {
        return Ok(DisplayBpm::Variable);
    }
    if let Some((left, right)) = value.split_once(':') {
        let left = parse_decimal(left).ok_or_else(|| malformed(value, position))?;
        let right = parse_decimal(right).ok_or_else(|| malformed(value, position))?;
        let (min, max) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        return Ok(DisplayBpm::Range(Bpm::new(min), Bpm::new(max)));
    }
    let tempo = parse_decimal(value).ok_or_else(|| malformed(value, position))?;
    Ok(DisplayBpm::Range(Bpm::new(tempo), Bpm::new(tempo)))
}

/// Transforms one NOTES value into a [`PureChart`].
fn parse_chart(value: &str, position: TextPosition) -> Result<PureChart> {
    let fields: Vec<&str> = value.split(':').collect();
    let &[game_mode, step_artist, diff_name, diff_value, _radar, measure_block] =
        fields.as_slice()
    else {
        return Err(SyntaxError::NotesFieldCount {
            found: fields.len(),
            position,
        }
        .into());
    };

    let diff_value = diff_value
        .trim()
        .parse::<u32>()
        .map_err(|_| malformed(diff_value, position))?;

    let note_field = parse_measure_block(measure_block, position)?;
    check_long_notes(&note_field)?;

    debug!(
        mode = game_mode.trim(),
        rows = note_field.len(),
        "chart assembled"
    );

    let step_artist = step_artist.trim();
    Ok(PureChart {
        game_mode: game_mode.trim().to_owned(),
        step_artist: (!step_artist.is_empty()).then(|| step_artist.to_owned()),
        diff_name: diff_name.trim().to_owned(),
        diff_value,
        note_field,
    })
}

/// Rows into local positions `i/N`, measures into global positions
/// `measure + local`.
fn parse_measure_block(block: &str, position: TextPosition) -> Result<UntimedNotefield> {
    let mut rows = Vec::new();
    let mut width: Option<usize> = None;

    if block.trim().is_empty() {
        return Ok(UntimedNotefield::default());
    }

    for (measure_index, measure_text) in block.split(',').enumerate() {
        let row_texts: Vec<&str> = measure_text.split_whitespace().collect();
        let count = row_texts.len();
        if !SNAP_ROW_COUNTS.contains(&count) {
            return Err(SyntaxError::BadMeasureRowCount {
                found: count,
                position,
            }
            .into());
        }

        for (row_index, row_text) in row_texts.iter().enumerate() {
            let pure = parse_row(row_text, position)?;
            match width {
                None => {
                    if !LANE_WIDTHS.contains(&pure.width()) {
                        return Err(SyntaxError::UnsupportedLaneWidth {
                            found: pure.width(),
                            position,
                        }
                        .into());
                    }
                    width = Some(pure.width());
                }
                Some(expected) if expected != pure.width() => {
                    return Err(SyntaxError::UnevenRowWidth {
                        expected,
                        found: pure.width(),
                        position,
                    }
                    .into());
                }
                Some(_) => {}
            }

            let local = LocalPosition::new(Rational::new(
                i64::try_from(row_index).unwrap_or(i64::MAX),
                i64::try_from(count).unwrap_or(i64::MAX),
            ));
            let measure = Measure::from(i64::try_from(measure_index).unwrap_or(i64::MAX));
            rows.push(pure.at_local(local).at_measure(measure));
        }
    }

    Ok(UntimedNotefield::new(rows))
}

/// One textual row into lane objects; the synthesized body codes are not
/// part of the file alphabet.
fn parse_row(text: &str, position: TextPosition) -> Result<PureRow> {
    text.chars()
        .map(|c| {
            NoteObject::from_char(c)
                .filter(|obj| !obj.is_synthesized())
                .ok_or_else(|| {
                    LexicalError::UnknownNoteCharacter {
                        found: c,
                        position,
                    }
                    .into()
                })
        })
        .collect::<Result<Vec<_>>>()
        .map(PureRow::new)
}

/// Every long-note head must see a tail on its lane before the chart
/// ends.
fn check_long_notes(field: &UntimedNotefield) -> Result<()> {
    let mut active: Vec<usize> = Vec::new();
    for row in field {
        let pure = row.pure_row();
        for ended in pure.find_object_lanes(NoteObject::HoldRollEnd) {
            active.retain(|&lane| lane != ended);
        }
        active.extend(pure.find_object_lanes(NoteObject::HoldStart));
        active.extend(pure.find_object_lanes(NoteObject::RollStart));
    }
    match active.first() {
        Some(&lane) => Err(SmError::from(StructuralError::UnmatchedLongNote { lane })),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: TextPosition = TextPosition::new(1, 1);

    #[test]
    fn chart_rows_get_progressive_positions() {
        let chart = parse_chart(
            "dance-single:author:Hard:9:0,0,0,0,0:\n1000\n0100\n0010\n0001\n,\n1111\n0000\n0000\n0000\n",
            AT,
        )
        .unwrap();
        assert_eq!(chart.game_mode, "dance-single");
        assert_eq!(chart.step_artist.as_deref(), Some("author"));
        assert_eq!(chart.diff_value, 9);
        let positions: Vec<Rational> = chart
            .note_field
            .iter()
            .map(|row| row.exact_position().unwrap().value())
            .collect();
        assert_eq!(positions[0], Rational::from_integer(0));
        assert_eq!(positions[1], Rational::new(1, 4));
        assert_eq!(positions[4], Rational::from_integer(1));
        assert_eq!(positions[7], Rational::new(7, 4));
    }

    #[test]
    fn wrong_field_count_is_syntactic() {
        let err = parse_chart("dance-single:Hard:9:0:\n0000\n", AT).unwrap_err();
        assert!(matches!(
            err,
            SmError::Syntax(SyntaxError::NotesFieldCount { found: 5, .. })
        ));
    }

    #[test]
    fn bad_row_character_is_lexical() {
        let err = parse_chart("dance-single::Hard:9::\n10Z0\n0000\n0000\n0000\n", AT).unwrap_err();
        assert!(matches!(
            err,
            SmError::Lexical(LexicalError::UnknownNoteCharacter { found: 'Z', .. })
        ));
    }

    #[test]
    fn synthesized_codes_are_not_file_alphabet() {
        let err = parse_chart("dance-single::Hard:9::\n10H0\n0000\n0000\n0000\n", AT).unwrap_err();
        assert!(matches!(
            err,
            SmError::Lexical(LexicalError::UnknownNoteCharacter { found: 'H', .. })
        ));
    }

    #[test]
    fn uneven_width_is_syntactic() {
        let err = parse_chart("dance-single::Hard:9::\n0000\n000000\n0000\n0000\n", AT).unwrap_err();
        assert!(matches!(
            err,
            SmError::Syntax(SyntaxError::UnevenRowWidth {
                expected: 4,
                found: 6,
                ..
            })
        ));
    }

    #[test]
    fn unmatched_hold_is_structural() {
        let err = parse_chart("dance-single::Hard:9::\n2000\n0000\n0000\n0000\n", AT).unwrap_err();
        assert!(matches!(
            err,
            SmError::Structural(StructuralError::UnmatchedLongNote { lane: 0 })
        ));
    }

    #[test]
    fn matched_hold_passes() {
        let chart = parse_chart("dance-single::Hard:9::\n2000\n0000\n0000\n3000\n", AT).unwrap();
        assert_eq!(chart.note_field.len(), 4);
    }

    #[test]
    fn display_bpm_shapes() {
        assert_eq!(parse_display_bpm("*", AT).unwrap(), DisplayBpm::Variable);
        assert_eq!(
            parse_display_bpm("150", AT).unwrap(),
            DisplayBpm::Range(Bpm::from(150), Bpm::from(150))
        );
        assert_eq!(
            parse_display_bpm("300:150", AT).unwrap(),
            DisplayBpm::Range(Bpm::from(150), Bpm::from(300))
        );
        assert!(parse_display_bpm("fast", AT).is_err());
    }
}
