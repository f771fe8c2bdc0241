use pretty_assertions::assert_eq;
use sm_rs::sm::prelude::*;

fn classify(text: &str) -> RowKind {
    RowKind::classify(&PureRow::from_str_row(text).unwrap()).unwrap()
}

#[test]
fn jumps_split_by_hand() {
    assert_eq!(classify("1100"), RowKind::OHT_JUMP);
    assert_eq!(classify("1010"), RowKind::THT_JUMP);
    assert_eq!(classify("1001"), RowKind::THT_JUMP);
    assert_eq!(classify("0110"), RowKind::THT_JUMP);
}

#[test]
fn chord_sizes() {
    assert_eq!(classify("0000"), RowKind::empty());
    assert_eq!(classify("0010"), RowKind::SINGLE);
    assert_eq!(classify("1110"), RowKind::HAND);
    assert_eq!(classify("1111"), RowKind::QUAD);
}

#[test]
fn holds_rolls_and_releases() {
    assert_eq!(classify("2003"), RowKind::HOLD | RowKind::RELEASE);
    assert_eq!(classify("0400"), RowKind::ROLL);
    assert_eq!(classify("2200"), RowKind::OHT_HOLD);
    assert_eq!(classify("0404"), RowKind::THT_ROLL);
    assert_eq!(classify("0330"), RowKind::RELEASE);
}

#[test]
fn decorations_do_not_classify() {
    assert_eq!(classify("M0F0"), RowKind::empty());
    assert_eq!(classify("M1F0"), RowKind::SINGLE);
}

#[test]
fn width_other_than_four_is_an_error() {
    let row = PureRow::from_str_row("100000").unwrap();
    assert_eq!(
        RowKind::classify(&row),
        Err(StructuralError::UnsupportedRowWidth { found: 6 })
    );
}

#[test]
fn classification_over_a_parsed_chart() {
    let simfile = parse_source(
        "#BPMS:0=120;\n#NOTES:dance-single::Hard:9::\n1100\n2000\n0111\n3001\n;",
        None,
    )
    .unwrap();
    let kinds: Vec<RowKind> = simfile.charts[0]
        .note_field
        .iter()
        .map(|row| RowKind::classify(row.row()).unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::OHT_JUMP,
            RowKind::HOLD,
            RowKind::HAND,
            RowKind::SINGLE | RowKind::RELEASE,
        ]
    );
}
