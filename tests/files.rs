use std::path::Path;

use pretty_assertions::assert_eq;
use sm_rs::sm::prelude::*;

fn fixture() -> Simfile {
    parse_source(include_str!("files/springtime.sm"), None).unwrap()
}

#[test]
fn metadata_round_trip() {
    let simfile = fixture();
    assert_eq!(simfile.title, "Springtime");
    assert_eq!(simfile.subtitle, "(remix)");
    assert_eq!(simfile.artist, "Komorebi");
    assert_eq!(simfile.genre, "Happy Hardcore");
    assert_eq!(simfile.credit, "rata");
    assert_eq!(
        simfile.music_path.as_deref(),
        Some(Path::new("springtime.ogg"))
    );
    assert_eq!(simfile.banner_path.as_deref(), Some(Path::new("banner.png")));
    assert_eq!(
        simfile.background_path.as_deref(),
        Some(Path::new("bg.png"))
    );
    assert_eq!(
        simfile.cdtitle_path.as_deref(),
        Some(Path::new("cdtitle.png"))
    );
    assert_eq!(simfile.sample_start, Time::new(Rational::new(65, 2)));
    assert_eq!(simfile.sample_length, Time::new(Rational::from_integer(15)));
    assert_eq!(simfile.offset, Time::new(Rational::new(9, 1000)));
    assert_eq!(
        simfile.meta.get("FGCHANGES").map(String::as_str),
        Some("-1.000=bg.png=1.000")
    );
}

#[test]
fn schedules_convert_beats_to_measures() {
    let simfile = fixture();
    assert_eq!(
        simfile.bpm_segments,
        vec![
            MeasureBpmPair {
                measure: Measure::from(0),
                bpm: Bpm::from(180),
            },
            MeasureBpmPair {
                measure: Measure::from(4),
                bpm: Bpm::from(90),
            },
        ]
    );
    assert_eq!(
        simfile.stop_segments,
        vec![MeasureMeasurePair {
            measure: Measure::from(2),
            value: Measure::new(Rational::new(1, 2)),
        }]
    );
    assert_eq!(
        simfile.display_bpm,
        Some(DisplayBpm::Range(Bpm::from(90), Bpm::from(180)))
    );
}

#[test]
fn charts_come_out_timed() {
    let simfile = fixture();
    assert_eq!(simfile.charts.len(), 2);

    let beginner = &simfile.charts[0];
    assert_eq!(beginner.game_mode, "dance-single");
    assert_eq!(beginner.step_artist.as_deref(), Some("rata"));
    assert_eq!(beginner.diff_name, "Beginner");
    assert_eq!(beginner.diff_value, 3);
    assert_eq!(beginner.note_field.len(), 8);

    // 180 BPM: 4/3 seconds per measure, shifted by the 9 ms offset. The
    // stop and the BPM change both sit past the last row and contribute
    // nothing.
    let times: Vec<Rational> = beginner
        .note_field
        .iter()
        .map(|row| row.exact_time().unwrap().value())
        .collect();
    assert_eq!(times[0], Rational::new(-9, 1000));
    assert_eq!(times[1], Rational::new(973, 3000));
    assert_eq!(times[4], Rational::new(3973, 3000));
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));

    let challenge = &simfile.charts[1];
    assert_eq!(challenge.step_artist, None);
    assert_eq!(challenge.diff_name, "Challenge");
    assert_eq!(challenge.diff_value, 11);
    assert_eq!(challenge.note_field.len(), 12);

    // Both charts carry the canonical schedule snapshot.
    assert_eq!(beginner.bpm_segments, simfile.bpm_segments);
    assert_eq!(beginner.stop_segments, simfile.stop_segments);
    assert_eq!(beginner.offset, simfile.offset);
}

#[test]
fn fixture_hold_synthesizes_bodies() {
    let simfile = fixture();
    let synthesized = simfile.charts[0].note_field.hold_roll_bodies_distinct();
    let rows: Vec<String> = synthesized
        .iter()
        .map(|row| row.row().str_row())
        .collect();
    assert_eq!(rows[4], "2000");
    assert_eq!(rows[5], "H000");
    assert_eq!(rows[6], "3000");
    assert_eq!(rows[7], "0010");
}

#[test]
fn parse_from_disk_records_base_dir() {
    let simfile = parse_simfile("tests/files/springtime.sm").unwrap();
    assert_eq!(simfile.base_dir.as_deref(), Some(Path::new("tests/files")));

    // Asset accessors resolve lazily against base_dir; the fixture has
    // no audio next to it, so the open fails but the path is the right
    // one to have tried.
    let attempt = simfile.music_file();
    assert!(matches!(attempt, Some(Err(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_simfile("tests/files/no_such_file.sm").unwrap_err();
    assert!(matches!(err, SmError::Io(_)));
}
