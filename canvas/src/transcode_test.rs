#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::config::Footprints;
use crate::geom::Size;

fn canvas() -> CanvasSize {
    CanvasSize::new(700.0, 450.0)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Distance between two turn fractions on the unit circle.
fn turn_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}

fn item(kind: PartKind, x: f64, y: f64, angle: f64) -> Item {
    Item::new(kind, Pose::new(x, y, angle), Footprints::default().footprint(kind), 1)
}

// =============================================================
// Turn fractions
// =============================================================

#[test]
fn upright_car_is_quarter_turn() {
    let p = ExportProfile::EDITOR;
    assert!(approx_eq(p.turn_fraction(PartKind::Car, 0.0), 0.25));
    assert!(approx_eq(p.turn_fraction(PartKind::Car, FRAC_PI_2), 0.0));
    assert!(approx_eq(p.turn_fraction(PartKind::Car, PI), 0.75));
}

#[test]
fn non_car_kinds_carry_quarter_offset() {
    let p = ExportProfile::EDITOR;
    assert!(approx_eq(p.turn_fraction(PartKind::Barricade, 0.0), 0.5));
    assert!(approx_eq(p.turn_fraction(PartKind::Spikes, FRAC_PI_2), 0.25));
}

#[test]
fn turn_fraction_stays_in_unit_range() {
    let p = ExportProfile::SCRIPTING;
    for angle in [-7.0, -PI, -0.1, 0.0, 1.0, 3.0, 9.5] {
        for kind in PartKind::ALL {
            let t = p.turn_fraction(kind, angle);
            assert!((0.0..1.0).contains(&t), "{kind:?} at {angle}: {t}");
        }
    }
}

#[test]
fn angle_from_turn_inverts_turn_fraction() {
    let p = ExportProfile::EDITOR;
    for kind in PartKind::ALL {
        for turn in [0.0, 0.1, 0.25, 0.5, 0.9] {
            let back = p.turn_fraction(kind, p.angle_from_turn(kind, turn));
            assert!(turn_distance(back, turn) < 1e-9, "{kind:?} turn {turn}: {back}");
        }
    }
}

#[test]
fn profile_names() {
    assert_eq!(ExportProfile::from_name("editor"), Some(ExportProfile::EDITOR));
    assert_eq!(ExportProfile::from_name("scripting"), Some(ExportProfile::SCRIPTING));
    assert_eq!(ExportProfile::from_name("Editor"), None);
    assert_eq!(ExportProfile::default(), ExportProfile::EDITOR);
}

// =============================================================
// max_width
// =============================================================

#[test]
fn max_width_picks_first_threshold_above_min_plus_one() {
    assert_eq!(max_width(0.0), 6.0);
    assert_eq!(max_width(4.99), 6.0);
    assert_eq!(max_width(5.0), 10.0);
    assert_eq!(max_width(5.5), 10.0);
    assert_eq!(max_width(20.0), 22.0);
}

#[test]
fn max_width_falls_back_with_floor() {
    assert_eq!(max_width(27.5), 50.0);
    assert_eq!(max_width(30.0), 50.0);
    assert_eq!(max_width(50.0), 55.0);
}

// =============================================================
// to_fixed
// =============================================================

#[test]
fn to_fixed_rounds_ties_away_from_zero() {
    assert_eq!(to_fixed(0.125, 2), "0.13");
    assert_eq!(to_fixed(-0.125, 2), "-0.13");
    assert_eq!(to_fixed(2.5, 0), "3");
}

#[test]
fn to_fixed_uses_exact_binary_value() {
    // 1.005 is stored just below the tie.
    assert_eq!(to_fixed(1.005, 2), "1.00");
    assert_eq!(to_fixed(123.456, 1), "123.5");
}

#[test]
fn to_fixed_carries_into_integer_part() {
    assert_eq!(to_fixed(9.999, 2), "10.00");
    assert_eq!(to_fixed(-99.9999, 3), "-100.000");
}

#[test]
fn to_fixed_pads_and_signs_zero() {
    assert_eq!(to_fixed(0.25, 3), "0.250");
    assert_eq!(to_fixed(-0.0, 2), "0.00");
    assert_eq!(to_fixed(-0.001, 2), "-0.00");
}

#[test]
fn round_fixed_matches_printed_digits() {
    assert_eq!(round_fixed(1.005, 2), 1.0);
    assert_eq!(round_fixed(0.125, 2), 0.13);
    assert_eq!(round_fixed(-0.125, 2), -0.13);
    assert_eq!(round_fixed(9.999, 2), 10.0);
    assert_eq!(round_fixed(27.5, 2), 27.5);
    for v in [0.0, 2.4, 13.37, 123.456, 1e6 + 0.005] {
        assert_eq!(round_fixed(v, 2), to_fixed(v, 2).parse::<f64>().unwrap());
    }
}

#[test]
fn round_fixed_passes_non_finite_through() {
    assert!(round_fixed(f64::NAN, 2).is_nan());
    assert_eq!(round_fixed(f64::INFINITY, 2), f64::INFINITY);
}

// =============================================================
// Export
// =============================================================

#[test]
fn export_empty_is_none() {
    assert!(export(&[], &ExportProfile::EDITOR).is_none());
}

#[test]
fn export_single_car() {
    let text = export(&[item(PartKind::Car, 350.0, 225.0, 0.0)], &ExportProfile::EDITOR).unwrap();
    assert_eq!(text, "minRoadWidth = 2.40\n\npart01 = 1, 0.00, 0.00, 0.250\n");
}

#[test]
fn export_scripting_header_adds_max_width() {
    let text = export(&[item(PartKind::Car, 350.0, 225.0, 0.0)], &ExportProfile::SCRIPTING).unwrap();
    assert_eq!(text, "extent = 2.40, 6.00\n\npart01 = 1, 0.00, 0.00, 0.250\n");
}

#[test]
fn export_pads_x_column() {
    let items = [item(PartKind::Car, 300.0, 225.0, 0.0), item(PartKind::Car, 400.0, 225.0, 0.0)];
    let text = export(&items, &ExportProfile::EDITOR).unwrap();
    assert_eq!(text, "minRoadWidth = 7.40\n\npart01 = 1, -2.50, 0.00, 0.250\npart02 = 1,  2.50, 0.00, 0.250\n");
}

#[test]
fn export_flips_y_and_pads_y_column() {
    let items = [item(PartKind::Car, 350.0, 100.0, 0.0), item(PartKind::Car, 350.0, 300.0, 0.0)];
    let text = export(&items, &ExportProfile::EDITOR).unwrap();
    assert_eq!(text, "minRoadWidth = 2.40\n\npart01 = 1, 0.00,  5.00, 0.250\npart02 = 1, 0.00, -5.00, 0.250\n");
}

#[test]
fn export_numbers_parts_in_insertion_order() {
    let items = [
        item(PartKind::Spikes, 350.0, 300.0, 0.0),
        item(PartKind::Car, 350.0, 150.0, 0.0),
        item(PartKind::Barricade, 350.0, 225.0, 0.0),
    ];
    let text = export(&items, &ExportProfile::EDITOR).unwrap();
    let kinds: Vec<&str> = part_lines(&text).map(|l| &l[9..10]).collect();
    assert_eq!(kinds, vec!["3", "1", "2"]);
}

// =============================================================
// parse
// =============================================================

#[test]
fn parse_minimal_line() {
    let parts = parse("part01 = 1, 0.00, 0.00, 0.000").unwrap();
    assert_eq!(parts, vec![ParsedPart { index: 1, kind: PartKind::Car, x: 0.0, y: 0.0, turn: 0.0 }]);
}

#[test]
fn parse_ignores_other_lines_and_whitespace() {
    let text = "minRoadWidth = 7.40\r\n\r\n  part01=1,-2.5,1,0.25  \r\n# note\npart02 = 3 ,  12 , -0.75 , 0.5\n";
    let parts = parse(text).unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].x, -2.5);
    assert_eq!(parts[1].kind, PartKind::Spikes);
    assert_eq!(parts[1].y, -0.75);
}

#[test]
fn parse_rejects_empty() {
    assert_eq!(parse(""), Err(ImportError::Empty));
    assert_eq!(parse("minRoadWidth = 1.00\n"), Err(ImportError::Empty));
}

#[test]
fn parse_rejects_lone_part02() {
    assert_eq!(parse("part02 = 1, 0, 0, 0"), Err(ImportError::OutOfSequence { line: 1, found: 2 }));
}

#[test]
fn parse_rejects_duplicate_part01() {
    let text = "part01 = 1, 0, 0, 0\npart01 = 2, 1, 1, 0";
    assert_eq!(parse(text), Err(ImportError::OutOfSequence { line: 2, found: 1 }));
}

#[test]
fn parse_rejects_seven_lines() {
    let text: String = (1..=7).map(|i| format!("part{i:02} = 1, 0, 0, 0\n")).collect();
    assert_eq!(parse(&text), Err(ImportError::TooManyParts { count: 7 }));
}

#[test]
fn parse_rejects_layout_without_car() {
    assert_eq!(parse("part01 = 2, 0, 0, 0\npart02 = 3, 1, 0, 0"), Err(ImportError::MissingCar));
}

#[test]
fn parse_rejects_malformed_lines() {
    for line in [
        "part01 = 4, 0, 0, 0",
        "part01 = 0, 0, 0, 0",
        "part01 = 1, 1., 0, 0",
        "part01 = 1, .5, 0, 0",
        "part01 = 1, +1, 0, 0",
        "part01 = 1, 0, 0",
        "part01 = 1, 0, 0, 0, 0",
        "part01 = 1, 0, 0, 0x",
        "part1 = 1, 0, 0, 0",
        "part07 = 1, 0, 0, 0",
        "part010 = 1, 0, 0, 0",
        "parts are fun",
    ] {
        assert_eq!(
            parse(line),
            Err(ImportError::MalformedLine { line: 1, text: line.to_owned() }),
            "line {line:?}"
        );
    }
}

#[test]
fn malformed_line_number_counts_part_lines_only() {
    let text = "header\npart01 = 1, 0, 0, 0\n\npart02 = 9, 0, 0, 0";
    assert_eq!(parse(text), Err(ImportError::MalformedLine { line: 2, text: "part02 = 9, 0, 0, 0".into() }));
}

#[test]
fn is_loadable_matches_parse() {
    assert!(is_loadable("part01 = 1, 0, 0, 0.25"));
    assert!(!is_loadable("part01 = 3, 0, 0, 0.25"));
}

// =============================================================
// decode / import
// =============================================================

#[test]
fn decode_centers_layout_and_keeps_relative_offsets() {
    let parts = parse("part01 = 1, 0, 0, 0.25\npart02 = 2, 2.0, -1.0, 0.5").unwrap();
    let layout = decode(&parts, &Footprints::default(), canvas(), &ExportProfile::EDITOR);
    assert!(!layout.out_of_bounds);

    let car = &layout.items[0];
    let bar = &layout.items[1];
    assert_eq!((car.kind, bar.kind), (PartKind::Car, PartKind::Barricade));
    assert!(approx_eq(bar.x - car.x, 40.0));
    assert!(approx_eq(bar.y - car.y, 20.0));
    assert!(approx_eq(car.angle, 0.0));
    assert!(approx_eq(bar.angle, 0.0));
    assert_eq!((car.layer, bar.layer), (1, 2));
    assert_eq!(bar.size, Size::new(140.0, 30.0));

    let mbb = scene_bounds(&layout.items).unwrap();
    assert!(approx_eq(mbb.center().x, 350.0));
    assert!(approx_eq(mbb.center().y, 225.0));
}

#[test]
fn decode_flags_layout_wider_than_canvas() {
    let parts = parse("part01 = 1, 0, 0, 0.25\npart02 = 2, 40, 0, 0.5").unwrap();
    let layout = decode(&parts, &Footprints::default(), canvas(), &ExportProfile::EDITOR);
    assert!(layout.out_of_bounds);
    assert_eq!(layout.items.len(), 2);
}

struct SquareAssets;

impl AssetSizes for SquareAssets {
    fn asset_size(&self, _kind: PartKind) -> Size {
        Size::new(80.0, 80.0)
    }
}

#[test]
fn decode_uses_supplied_asset_sizes() {
    let layout = import("part01 = 1, 0, 0, 0.25", &SquareAssets, canvas(), &ExportProfile::EDITOR).unwrap();
    assert_eq!(layout.items[0].size, Size::new(20.0, 20.0));
}

#[test]
fn import_propagates_parse_errors() {
    let err = import("nothing here", &Footprints::default(), canvas(), &ExportProfile::EDITOR).unwrap_err();
    assert_eq!(err, ImportError::Empty);
}

#[test]
fn export_import_export_is_stable() {
    for profile in [ExportProfile::EDITOR, ExportProfile::SCRIPTING] {
        let items = [
            item(PartKind::Car, 300.0, 200.0, 0.0),
            item(PartKind::Barricade, 400.0, 220.0, FRAC_PI_2),
            item(PartKind::Spikes, 350.0, 300.0, 0.0),
        ];
        let text = export(&items, &profile).unwrap();
        let layout = import(&text, &Footprints::default(), canvas(), &profile).unwrap();
        assert_eq!(export(&layout.items, &profile).unwrap(), text);
    }
}

#[test]
fn round_trip_offsets_within_a_hundredth() {
    let items = [
        item(PartKind::Car, 321.0, 207.0, 0.3),
        item(PartKind::Barricade, 433.0, 251.0, -0.5),
        item(PartKind::Spikes, 262.0, 318.0, 1.0),
    ];
    let profile = ExportProfile::EDITOR;
    let first = parse(&export(&items, &profile).unwrap()).unwrap();
    let layout = import(&export(&items, &profile).unwrap(), &Footprints::default(), canvas(), &profile).unwrap();
    let second = parse(&export(&layout.items, &profile).unwrap()).unwrap();

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.kind, b.kind);
        assert!(turn_distance(a.turn, b.turn) < 1e-9, "{a:?} vs {b:?}");
        assert!((a.x - b.x).abs() <= 0.01 + 1e-9, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() <= 0.01 + 1e-9, "{a:?} vs {b:?}");
    }
}

#[test]
fn turn_just_short_of_one_exports_as_zero() {
    for profile in [ExportProfile::EDITOR, ExportProfile::SCRIPTING] {
        let layout = import("part01 = 1, 0, 0, 0.9996", &Footprints::default(), canvas(), &profile).unwrap();
        let text = export(&layout.items, &profile).unwrap();
        assert!(text.ends_with("part01 = 1, 0.00, 0.00, 0.000\n"), "{text}");
    }
}

#[test]
fn non_car_turn_just_short_of_one_exports_as_zero() {
    let profile = ExportProfile::EDITOR;
    let layout = import("part01 = 1, 0, 0, 0.25\npart02 = 3, 0, 5, 0.9999", &Footprints::default(), canvas(), &profile).unwrap();
    let text = export(&layout.items, &profile).unwrap();
    let spikes = text.lines().find(|l| l.starts_with("part02")).unwrap();
    assert!(spikes.ends_with(", 0.000"), "{spikes}");
}

#[test]
fn exported_turns_never_reach_one() {
    let profile = ExportProfile::EDITOR;
    for step in 0..2000 {
        let turn = 0.999 + f64::from(step) * 5e-7;
        let layout = import(&format!("part01 = 1, 0, 0, {turn}"), &Footprints::default(), canvas(), &profile).unwrap();
        let text = export(&layout.items, &profile).unwrap();
        let parts = parse(&text).unwrap();
        assert!((0.0..1.0).contains(&parts[0].turn), "{turn} -> {text}");
    }
}
