//! Layout engine for the roadblock editor.
//!
//! The crate places a handful of oriented rectangles (a car plus barricades and
//! spike strips) on a bounded canvas and converts the layout to and from the
//! `partNN = K, X, Y, A` parameter text read by the game. It owns every rule
//! about where a part may sit; the host toolkit only forwards input events,
//! draws the [`render::DrawList`], and carries out the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller ([`engine::EngineCore`]) |
//! | [`scene`] | Items, selection, and layering counter |
//! | [`constraint`] | Bounds admissibility, drag clamp, rotation and nudge rules |
//! | [`geom`] | Points, poses, rotated corners, bounding boxes |
//! | [`hit`] | Derived draw/hit order, hit-testing, box membership |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`transcode`] | Parameter text export and import |
//! | [`render`] | Derived draw list for the host renderer |
//! | [`config`] | Canvas size, part footprints, export profile |
//! | [`error`] | Import and configuration errors |
//! | [`consts`] | Shared numeric constants (limits, steps, units) |

pub mod config;
pub mod constraint;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;
pub mod transcode;
