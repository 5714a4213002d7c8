//! Editor configuration: canvas bounds, part footprints, and export profile.
//!
//! Every value has a default matching the stock editor (700×450 canvas,
//! `editor` export profile). [`EditorConfig::from_env`] overlays optional
//! environment variables:
//!
//! - `ROADBLOCK_CANVAS_WIDTH`, `ROADBLOCK_CANVAS_HEIGHT`: canvas size in pixels
//! - `ROADBLOCK_PROFILE`: `editor` (default) or `scripting`
//! - `ROADBLOCK_{CAR,BARRICADE,SPIKES}_{WIDTH,HEIGHT}`: source asset size in pixels

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, IMAGE_RENDER_SCALE};
use crate::error::ConfigError;
use crate::geom::{Point, Size};
use crate::scene::PartKind;
use crate::transcode::ExportProfile;

/// Pixel bounds of the editing canvas. Valid positions span `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: DEFAULT_CANVAS_WIDTH, height: DEFAULT_CANVAS_HEIGHT }
    }
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Source of per-kind asset dimensions (unscaled image pixels).
pub trait AssetSizes {
    /// Width and height of the asset drawn for `kind`.
    fn asset_size(&self, kind: PartKind) -> Size;

    /// On-canvas footprint of `kind`: asset size times [`IMAGE_RENDER_SCALE`].
    fn footprint(&self, kind: PartKind) -> Size {
        let s = self.asset_size(kind);
        Size::new(s.width * IMAGE_RENDER_SCALE, s.height * IMAGE_RENDER_SCALE)
    }
}

/// Fixed asset sizes for each part kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprints {
    pub car: Size,
    pub barricade: Size,
    pub spikes: Size,
}

impl Default for Footprints {
    fn default() -> Self {
        Self {
            car: Size::new(192.0, 400.0),
            barricade: Size::new(560.0, 120.0),
            spikes: Size::new(640.0, 64.0),
        }
    }
}

impl AssetSizes for Footprints {
    fn asset_size(&self, kind: PartKind) -> Size {
        match kind {
            PartKind::Car => self.car,
            PartKind::Barricade => self.barricade,
            PartKind::Spikes => self.spikes,
        }
    }
}

/// Everything the engine needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorConfig {
    pub canvas: CanvasSize,
    pub footprints: Footprints,
    pub profile: ExportProfile,
}

impl EditorConfig {
    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but is not a positive
    /// number, or names an unknown export profile.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env_value(std::env::var(key)))
    }

    /// Build config from an arbitrary key lookup. Missing keys keep their default.
    ///
    /// # Errors
    ///
    /// Same as [`EditorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let canvas = CanvasSize {
            width: parse_positive(&lookup, "ROADBLOCK_CANVAS_WIDTH", defaults.canvas.width)?,
            height: parse_positive(&lookup, "ROADBLOCK_CANVAS_HEIGHT", defaults.canvas.height)?,
        };

        let footprints = Footprints {
            car: parse_size(&lookup, "CAR", defaults.footprints.car)?,
            barricade: parse_size(&lookup, "BARRICADE", defaults.footprints.barricade)?,
            spikes: parse_size(&lookup, "SPIKES", defaults.footprints.spikes)?,
        };

        let profile = match lookup("ROADBLOCK_PROFILE") {
            Some(name) => ExportProfile::from_name(name.trim()).ok_or(ConfigError::UnknownProfile(name))?,
            None => defaults.profile,
        };

        Ok(Self { canvas, footprints, profile })
    }

    /// Footprint of `kind` on this config's canvas.
    #[must_use]
    pub fn footprint(&self, kind: PartKind) -> Size {
        self.footprints.footprint(kind)
    }
}

/// An unset variable keeps the default. A set but non-Unicode one is passed
/// on lossily so it fails validation instead of being ignored.
fn env_value(var: Result<String, std::env::VarError>) -> Option<String> {
    match var {
        Ok(value) => Some(value),
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}

fn parse_size<F>(lookup: &F, kind: &str, default: Size) -> Result<Size, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(Size {
        width: parse_positive(lookup, &format!("ROADBLOCK_{kind}_WIDTH"), default.width)?,
        height: parse_positive(lookup, &format!("ROADBLOCK_{kind}_HEIGHT"), default.height)?,
    })
}

fn parse_positive<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber { key: key.to_owned(), value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositive { key: key.to_owned() });
    }
    Ok(value)
}
