#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;
use crate::transcode::HeaderStyle;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_canvas_is_700_by_450() {
    let c = CanvasSize::default();
    assert_eq!((c.width, c.height), (700.0, 450.0));
    assert_eq!(c.center(), Point::new(350.0, 225.0));
}

#[test]
fn default_footprints_are_quarter_scale() {
    let cfg = EditorConfig::default();
    assert_eq!(cfg.footprint(PartKind::Car), Size::new(48.0, 100.0));
    assert_eq!(cfg.footprint(PartKind::Barricade), Size::new(140.0, 30.0));
    assert_eq!(cfg.footprint(PartKind::Spikes), Size::new(160.0, 16.0));
}

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = EditorConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, EditorConfig::default());
}

// =============================================================
// Overrides
// =============================================================

#[test]
fn canvas_override() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("ROADBLOCK_CANVAS_WIDTH", "800"),
        ("ROADBLOCK_CANVAS_HEIGHT", " 600.5 "),
    ]))
    .unwrap();
    assert_eq!(cfg.canvas, CanvasSize::new(800.0, 600.5));
}

#[test]
fn asset_size_override_scales_footprint() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[("ROADBLOCK_CAR_WIDTH", "200"), ("ROADBLOCK_CAR_HEIGHT", "420")])).unwrap();
    assert_eq!(cfg.footprints.car, Size::new(200.0, 420.0));
    assert_eq!(cfg.footprint(PartKind::Car), Size::new(50.0, 105.0));
    assert_eq!(cfg.footprints.spikes, Footprints::default().spikes);
}

#[test]
fn profile_override() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[("ROADBLOCK_PROFILE", "scripting")])).unwrap();
    assert_eq!(cfg.profile.header, HeaderStyle::Extent);
}

// =============================================================
// Errors
// =============================================================

#[test]
fn non_numeric_value_is_rejected() {
    let err = EditorConfig::from_lookup(lookup_from(&[("ROADBLOCK_CANVAS_WIDTH", "wide")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { key: "ROADBLOCK_CANVAS_WIDTH".into(), value: "wide".into() });
}

#[test]
fn zero_and_negative_are_rejected() {
    for value in ["0", "-5", "inf", "NaN"] {
        let err = EditorConfig::from_lookup(lookup_from(&[("ROADBLOCK_SPIKES_HEIGHT", value)])).unwrap_err();
        assert_eq!(err, ConfigError::NonPositive { key: "ROADBLOCK_SPIKES_HEIGHT".into() }, "value {value}");
    }
}

#[test]
fn unknown_profile_is_rejected() {
    let err = EditorConfig::from_lookup(lookup_from(&[("ROADBLOCK_PROFILE", "legacy")])).unwrap_err();
    assert_eq!(err, ConfigError::UnknownProfile("legacy".into()));
}

// =============================================================
// Environment values
// =============================================================

#[test]
fn unset_env_var_keeps_default() {
    assert_eq!(env_value(Err(std::env::VarError::NotPresent)), None);
    assert_eq!(env_value(Ok("640".into())), Some("640".into()));
}

#[test]
fn non_unicode_env_var_is_validated_not_ignored() {
    let raw = env_value(Err(std::env::VarError::NotUnicode("12px".into())));
    assert_eq!(raw.as_deref(), Some("12px"));

    let err = EditorConfig::from_lookup(|key| if key == "ROADBLOCK_CANVAS_WIDTH" { raw.clone() } else { None }).unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { key: "ROADBLOCK_CANVAS_WIDTH".into(), value: "12px".into() });
}

#[cfg(unix)]
#[test]
fn non_unicode_bytes_become_replacement_characters() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let raw = env_value(Err(std::env::VarError::NotUnicode(OsString::from_vec(vec![b'7', 0xFF]))));
    assert_eq!(raw.as_deref(), Some("7\u{FFFD}"));
}
