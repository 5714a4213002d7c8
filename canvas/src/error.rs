//! Error types for parameter import and configuration.
//!
//! Only structural failures are errors here. An import that parses but lands
//! outside the canvas, an add past capacity, or a rejected rotation are normal
//! engine outcomes reported through [`crate::engine::Action`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::consts::MAX_RECTS;

/// Why a parameter text cannot be loaded.
///
/// `line` fields are 1-based positions among the `part` lines only; other
/// lines in the input are ignored and not counted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("no part lines found")]
    Empty,
    #[error("{count} part lines found, at most {max} allowed", max = MAX_RECTS)]
    TooManyParts { count: usize },
    #[error("part line {line} is malformed: {text:?}")]
    MalformedLine { line: usize, text: String },
    #[error("part line {line} is numbered {found:02}, expected {line:02}")]
    OutOfSequence { line: usize, found: usize },
    #[error("layout has no car (kind 1)")]
    MissingCar,
}

impl ImportError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "E_IMPORT_EMPTY",
            Self::TooManyParts { .. } => "E_IMPORT_TOO_MANY",
            Self::MalformedLine { .. } => "E_IMPORT_MALFORMED",
            Self::OutOfSequence { .. } => "E_IMPORT_SEQUENCE",
            Self::MissingCar => "E_IMPORT_NO_CAR",
        }
    }
}

/// Invalid editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a number: {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("{key} must be a positive number")]
    NonPositive { key: String },
    #[error("unknown export profile {0:?} (expected 'editor' or 'scripting')")]
    UnknownProfile(String),
}
