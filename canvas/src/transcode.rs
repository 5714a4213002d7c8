//! Transcoder between scene items and the `partNN = K, X, Y, A` parameter text.
//!
//! Export
//! ======
//! Offsets are measured from the center of the layout's bounding box, scaled
//! to physical units, with Y flipped to point up. Angles become turn
//! fractions in `[0, 1)` where a quarter turn points along canvas-up; non-car
//! kinds carry an extra quarter-turn offset because their artwork faces
//! sideways. A header line reports the minimum road width (and, for the
//! scripting profile, a suggested maximum).
//!
//! Import
//! ======
//! Only lines starting with `part` are read. They must number `01`, `02`, ...
//! with no gaps, hold 1 to [`MAX_RECTS`] parts, and include a car. Decoded
//! items are recentered onto the canvas even if that leaves some of them out
//! of bounds; the caller decides how to report that.

#[cfg(test)]
#[path = "transcode_test.rs"]
mod transcode_test;

use std::f64::consts::PI;

use crate::config::{AssetSizes, CanvasSize};
use crate::constraint::is_admissible;
use crate::consts::{LENGTH_SCALE, MAX_RECTS, WIDTH_FALLBACK_FLOOR, WIDTH_FALLBACK_MARGIN, WIDTH_THRESHOLDS};
use crate::error::ImportError;
use crate::geom::Pose;
use crate::hit::scene_bounds;
use crate::scene::{Item, PartKind};

// =============================================================
// Profiles
// =============================================================

/// Which header line precedes the part lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// `minRoadWidth = W`
    MinRoadWidth,
    /// `extent = W, M` where `M` comes from [`max_width`].
    Extent,
}

/// Export flavour consumed by a particular downstream tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProfile {
    pub header: HeaderStyle,
    /// Degrees added to non-car angles before conversion to a turn fraction.
    pub non_car_offset_deg: f64,
}

impl ExportProfile {
    /// Plain editor output with a `minRoadWidth` header.
    pub const EDITOR: Self = Self { header: HeaderStyle::MinRoadWidth, non_car_offset_deg: 90.0 };

    /// Scripting output with an `extent` header.
    pub const SCRIPTING: Self = Self { header: HeaderStyle::Extent, non_car_offset_deg: 90.0 };

    /// Look up a profile by its config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "editor" => Some(Self::EDITOR),
            "scripting" => Some(Self::SCRIPTING),
            _ => None,
        }
    }

    fn offset_for(&self, kind: PartKind) -> f64 {
        if kind == PartKind::Car { 0.0 } else { self.non_car_offset_deg }
    }

    /// Turn fraction in `[0, 1)` for an item of `kind` at `angle` radians.
    #[must_use]
    pub fn turn_fraction(&self, kind: PartKind, angle: f64) -> f64 {
        let degrees = 90.0 - angle * 180.0 / PI + self.offset_for(kind);
        let turn = (degrees % 360.0) / 360.0;
        let turn = if turn < 0.0 { turn + 1.0 } else { turn };
        // A tiny negative remainder rounds up to exactly one.
        if turn >= 1.0 { 0.0 } else { turn }
    }

    /// Inverse of [`ExportProfile::turn_fraction`], in radians.
    #[must_use]
    pub fn angle_from_turn(&self, kind: PartKind, turn: f64) -> f64 {
        let raw = turn * 360.0 - self.offset_for(kind);
        (90.0 - raw) * (PI / 180.0)
    }
}

impl Default for ExportProfile {
    fn default() -> Self {
        Self::EDITOR
    }
}

// =============================================================
// Export
// =============================================================

/// Suggested maximum road width for a layout of `min_width`.
///
/// The first table entry exceeding `min_width + 1`, else `min_width + 5` with
/// a floor of 50.
#[must_use]
pub fn max_width(min_width: f64) -> f64 {
    WIDTH_THRESHOLDS
        .iter()
        .copied()
        .find(|t| *t > min_width + 1.0)
        .unwrap_or_else(|| (min_width + WIDTH_FALLBACK_MARGIN).max(WIDTH_FALLBACK_FLOOR))
}

/// Render `items` as parameter text, or `None` if there are no items.
#[must_use]
pub fn export(items: &[Item], profile: &ExportProfile) -> Option<String> {
    let mbb = scene_bounds(items)?;
    let mid = mbb.center();

    let rows: Vec<(u8, String, String, String)> = items
        .iter()
        .map(|item| {
            (
                item.kind.code(),
                to_fixed((item.x - mid.x) * LENGTH_SCALE, 2),
                to_fixed((mid.y - item.y) * LENGTH_SCALE, 2),
                turn_text(profile.turn_fraction(item.kind, item.angle)),
            )
        })
        .collect();

    let x_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);
    let y_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(0);

    let width = mbb.width() * LENGTH_SCALE;
    let min_width = to_fixed(width, 2);
    let mut out = match profile.header {
        HeaderStyle::MinRoadWidth => format!("minRoadWidth = {min_width}\n\n"),
        // The table lookup sees the width as printed, not the raw value.
        HeaderStyle::Extent => format!("extent = {min_width}, {}\n\n", to_fixed(max_width(round_fixed(width, 2)), 2)),
    };

    for (i, (code, ox, oy, turn)) in rows.iter().enumerate() {
        out.push_str(&format!("part{:02} = {code}, {ox:>x_width$}, {oy:>y_width$}, {turn}\n", i + 1));
    }
    Some(out)
}

/// Format `v` with `places` decimals, rounding exact ties away from zero.
///
/// Parameter files are diffed against ones produced by the browser editor,
/// whose number formatting breaks ties upward; `{:.N}` alone breaks them to
/// even.
#[must_use]
pub fn to_fixed(v: f64, places: usize) -> String {
    // Adding zero drops the sign of negative zero.
    let v = v + 0.0;
    let Some(digits) = fixed_digits(v.abs(), places) else {
        return format!("{v:.places$}");
    };

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if v < 0.0 {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| char::from(*d)));
    if places > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|d| char::from(*d)));
    }
    out
}

/// `v` rounded to `places` decimals exactly as [`to_fixed`] prints it.
#[must_use]
pub fn round_fixed(v: f64, places: usize) -> f64 {
    let Some(digits) = fixed_digits(v.abs(), places) else {
        return v;
    };
    let scaled = digits.iter().fold(0.0, |acc, d| acc * 10.0 + f64::from(d - b'0'));
    let magnitude = scaled / (0..places).fold(1.0, |p, _| p * 10.0);
    if v < 0.0 { -magnitude } else { magnitude }
}

/// Decimal digits of a non-negative finite `v` rounded to `places`, with the
/// decimal point implied `places` digits from the end. `None` for NaN and
/// infinities.
fn fixed_digits(v: f64, places: usize) -> Option<Vec<u8>> {
    let exact = format!("{:.*}", places + 30, v);
    let (int_part, frac_part) = exact.split_once('.')?;

    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes().take(places)).collect();
    let round_up = frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }
    Some(digits)
}

/// Three-decimal turn fraction. A turn just short of one prints as `0.000`
/// so the column stays in `[0, 1)`.
fn turn_text(turn: f64) -> String {
    let text = to_fixed(turn, 3);
    if text == "1.000" { to_fixed(0.0, 3) } else { text }
}

// =============================================================
// Import
// =============================================================

/// One decoded `partNN` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedPart {
    /// The `NN` sequence number, 1-based.
    pub index: usize,
    pub kind: PartKind,
    /// Physical X offset.
    pub x: f64,
    /// Physical Y offset (up is positive).
    pub y: f64,
    /// Turn fraction.
    pub turn: f64,
}

/// Items decoded from parameter text and recentered onto the canvas.
#[derive(Debug, Clone)]
pub struct ImportedLayout {
    pub items: Vec<Item>,
    /// At least one item pokes outside the canvas after recentering.
    pub out_of_bounds: bool,
}

/// Trimmed lines that start with `part`; all other lines are ignored.
pub fn part_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|line| line.starts_with("part"))
}

/// Validate and parse parameter text.
///
/// # Errors
///
/// Returns the first structural rule the text breaks; see [`ImportError`].
pub fn parse(text: &str) -> Result<Vec<ParsedPart>, ImportError> {
    let lines: Vec<&str> = part_lines(text).collect();
    if lines.is_empty() {
        return Err(ImportError::Empty);
    }
    if lines.len() > MAX_RECTS {
        return Err(ImportError::TooManyParts { count: lines.len() });
    }

    let mut parts = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let Some(part) = parse_line(line) else {
            return Err(ImportError::MalformedLine { line: i + 1, text: (*line).to_owned() });
        };
        if part.index != i + 1 {
            return Err(ImportError::OutOfSequence { line: i + 1, found: part.index });
        }
        parts.push(part);
    }

    if !parts.iter().any(|p| p.kind == PartKind::Car) {
        return Err(ImportError::MissingCar);
    }
    Ok(parts)
}

/// Whether `text` can be loaded.
#[must_use]
pub fn is_loadable(text: &str) -> bool {
    parse(text).is_ok()
}

/// Turn parsed parts into items centered on the canvas.
///
/// The layout's bounding box is moved so its center sits on the canvas
/// center, unconditionally. Layers run `1..=n` in line order.
#[must_use]
pub fn decode<S>(parts: &[ParsedPart], sizes: &S, canvas: CanvasSize, profile: &ExportProfile) -> ImportedLayout
where
    S: AssetSizes + ?Sized,
{
    let mut items: Vec<Item> = parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let pose = Pose::new(
                part.x / LENGTH_SCALE,
                -(part.y / LENGTH_SCALE),
                profile.angle_from_turn(part.kind, part.turn),
            );
            Item::new(part.kind, pose, sizes.footprint(part.kind), i as u64 + 1)
        })
        .collect();

    if let Some(mbb) = scene_bounds(&items) {
        let shift = canvas.center() - mbb.center();
        for item in &mut items {
            item.x += shift.x;
            item.y += shift.y;
        }
    }

    let out_of_bounds = items.iter().any(|i| !is_admissible(i.pose(), i.size, canvas));
    ImportedLayout { items, out_of_bounds }
}

/// Parse then decode in one step.
///
/// # Errors
///
/// See [`parse`].
pub fn import<S>(text: &str, sizes: &S, canvas: CanvasSize, profile: &ExportProfile) -> Result<ImportedLayout, ImportError>
where
    S: AssetSizes + ?Sized,
{
    let parts = parse(text)?;
    Ok(decode(&parts, sizes, canvas, profile))
}

// --- Line grammar ---
//
// part(0[1-6]) \s* = \s* [1-3] \s* , \s* NUM \s* , \s* NUM \s* , \s* NUM \s*
// NUM := -? [0-9]+ ( \. [0-9]+ )?

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, prefix: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(prefix)?;
        Some(())
    }

    fn digits(&mut self) -> Option<&'a str> {
        let len = self.rest.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return None;
        }
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Some(head)
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.rest;
        if self.rest.starts_with('-') {
            self.rest = &self.rest[1..];
        }
        self.digits()?;
        if let Some(after_dot) = self.rest.strip_prefix('.') {
            self.rest = after_dot;
            self.digits()?;
        }
        let consumed = start.len() - self.rest.len();
        match start[..consumed].parse() {
            Ok(v) => Some(v),
            Err(_) => None,
        }
    }

    fn separator(&mut self, sep: &str) -> Option<()> {
        self.skip_ws();
        self.eat(sep)?;
        self.skip_ws();
        Some(())
    }
}

fn parse_line(line: &str) -> Option<ParsedPart> {
    let mut cur = Cursor { rest: line };
    cur.skip_ws();
    cur.eat("part0")?;
    let index = match cur.rest.as_bytes().first().copied()? {
        d @ b'1'..=b'6' => usize::from(d - b'0'),
        _ => return None,
    };
    cur.rest = &cur.rest[1..];

    cur.separator("=")?;
    let kind = match cur.rest.as_bytes().first().copied()? {
        d @ b'1'..=b'3' => PartKind::from_code(d - b'0')?,
        _ => return None,
    };
    cur.rest = &cur.rest[1..];

    cur.separator(",")?;
    let x = cur.number()?;
    cur.separator(",")?;
    let y = cur.number()?;
    cur.separator(",")?;
    let turn = cur.number()?;
    cur.skip_ws();

    cur.rest.is_empty().then_some(ParsedPart { index, kind, x, y, turn })
}
