//! Crate-wide error type.
//!
//! Every fallible tree or widget operation returns [`Result`]. Failures are
//! reported before any mutation happens, so a returned error never leaves the
//! widget tree half-edited.

use thiserror::Error;

/// Errors produced by quilt-tui.
#[derive(Debug, Error)]
pub enum Error {
    /// A size or position hint outside `(0, 1]`.
    #[error("{axis} hint must be in (0, 1], got {value}")]
    InvalidHint { axis: &'static str, value: f64 },

    /// A numeric range whose minimum is not below its maximum.
    #[error("min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },

    /// A hex color string that is not exactly six hex digits.
    #[error("invalid hex color {0:?}")]
    InvalidHexColor(String),

    /// A container only accepts children of one type.
    #[error("{container} only accepts {expected} children")]
    ChildTypeMismatch {
        container: &'static str,
        expected: &'static str,
    },

    /// A single-slot container already holds a child.
    #[error("{0} already has a child")]
    SlotOccupied(&'static str),

    /// The widget is not a child of the given parent.
    #[error("widget is not a child of this parent")]
    NotAChild,

    /// The widget already has a parent.
    #[error("widget is already attached to a parent")]
    AlreadyAttached,

    /// Attaching would make a widget its own ancestor.
    #[error("widget cannot be attached to itself or its descendant")]
    WouldCycle,

    /// The id does not refer to a live widget.
    #[error("no such widget")]
    NoSuchWidget,

    /// Terminal or log-file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
