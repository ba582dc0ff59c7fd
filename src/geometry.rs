//! Core geometry types: Point, Size, Region, SizeHint, PosHint, Anchor.
//!
//! Coordinates follow terminal convention: rows before columns. A [`Point`] is
//! `(y, x)` and a [`Size`] is `(height, width)`. Points may be negative while a
//! widget is scrolled partially off its parent.

use std::ops::{Add, Neg, Sub};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position or displacement in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub y: i32,
    pub x: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { y: 0, x: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { y: self.y + rhs.y, x: self.x + rhs.x }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { y: self.y - rhs.y, x: self.x - rhs.x }
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point { y: -self.y, x: -self.x }
    }
}

impl From<(i32, i32)> for Point {
    fn from((y, x): (i32, i32)) -> Self {
        Point { y, x }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A size in terminal cells (height x width).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub height: i32,
    pub width: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { height: 0, width: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(height: i32, width: i32) -> Self {
        Self { height, width }
    }

    /// Total number of cells.
    #[inline]
    pub const fn area(self) -> i32 {
        self.height * self.width
    }

    /// Whether the local point lies inside `0..height` x `0..width`.
    #[inline]
    pub const fn contains(self, point: Point) -> bool {
        point.y >= 0 && point.y < self.height && point.x >= 0 && point.x < self.width
    }

    /// Convert to a [`Region`] positioned at the origin.
    #[inline]
    pub const fn to_region(self) -> Region {
        Region { y: 0, x: 0, height: self.height, width: self.width }
    }
}

impl From<(i32, i32)> for Size {
    fn from((height, width): (i32, i32)) -> Self {
        Size { height, width }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangle in screen cells.
///
/// Regions describe both widget bounding boxes and the "source" area being
/// rendered. Rendering only ever touches the intersection of the two.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub y: i32,
    pub x: i32,
    pub height: i32,
    pub width: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { y: 0, x: 0, height: 0, width: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(y: i32, x: i32, height: i32, width: i32) -> Self {
        Self { y, x, height, width }
    }

    /// Build a region from a top-left corner and a size.
    #[inline]
    pub const fn from_parts(pos: Point, size: Size) -> Self {
        Self { y: pos.y, x: pos.x, height: size.height, width: size.width }
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The top-left corner.
    #[inline]
    pub const fn pos(self) -> Point {
        Point { y: self.y, x: self.x }
    }

    /// The dimensions.
    #[inline]
    pub const fn size(self) -> Size {
        Size { height: self.height, width: self.width }
    }

    /// Whether the region covers no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.height <= 0 || self.width <= 0
    }

    /// Whether the point lies inside this region.
    #[inline]
    pub const fn contains(self, point: Point) -> bool {
        point.y >= self.y && point.y < self.bottom() && point.x >= self.x && point.x < self.right()
    }

    /// Whether `other` overlaps this region (non-zero intersection area).
    #[inline]
    pub const fn overlaps(self, other: Region) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the intersection of two regions.
    ///
    /// Returns [`Region::EMPTY`] if the regions do not overlap.
    #[inline]
    pub const fn intersection(self, other: Region) -> Region {
        let y1 = if self.y > other.y { self.y } else { other.y };
        let x1 = if self.x > other.x { self.x } else { other.x };

        let sb = self.bottom();
        let ob = other.bottom();
        let y2 = if sb < ob { sb } else { ob };

        let sr = self.right();
        let or = other.right();
        let x2 = if sr < or { sr } else { or };

        let h = y2 - y1;
        let w = x2 - x1;

        if h <= 0 || w <= 0 {
            Region::EMPTY
        } else {
            Region { y: y1, x: x1, height: h, width: w }
        }
    }

    /// Move the region by `offset`.
    #[inline]
    pub const fn translate(self, offset: Point) -> Region {
        Region { y: self.y + offset.y, x: self.x + offset.x, height: self.height, width: self.width }
    }

    /// Iterate every cell of the region in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let (y0, x0) = (self.y, self.x);
        let (y1, x1) = (self.bottom(), self.right());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| Point { y, x }))
    }
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

fn check_hint(axis: &'static str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) if v > 0.0 && v <= 1.0 => Ok(Some(v)),
        Some(v) => Err(Error::InvalidHint { axis, value: v }),
    }
}

/// Size as a proportion of the parent's size.
///
/// `None` on an axis leaves that dimension alone.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SizeHint {
    height: Option<f64>,
    width: Option<f64>,
}

impl SizeHint {
    /// No hint on either axis.
    pub const NONE: SizeHint = SizeHint { height: None, width: None };

    /// Fill the parent on both axes.
    pub const FULL: SizeHint = SizeHint { height: Some(1.0), width: Some(1.0) };

    /// Create a validated size hint. Each value must be `None` or in `(0, 1]`.
    pub fn new(height: Option<f64>, width: Option<f64>) -> Result<Self> {
        Ok(Self {
            height: check_hint("height", height)?,
            width: check_hint("width", width)?,
        })
    }

    pub fn height(self) -> Option<f64> {
        self.height
    }

    pub fn width(self) -> Option<f64> {
        self.width
    }
}

/// Position as a proportion of the parent's size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PosHint {
    y: Option<f64>,
    x: Option<f64>,
}

impl PosHint {
    /// No hint on either axis.
    pub const NONE: PosHint = PosHint { y: None, x: None };

    /// Center of the parent.
    pub const CENTER: PosHint = PosHint { y: Some(0.5), x: Some(0.5) };

    /// Centered horizontally, vertical position left alone.
    pub const CENTER_X: PosHint = PosHint { y: None, x: Some(0.5) };

    /// Create a validated position hint. Each value must be `None` or in `(0, 1]`.
    pub fn new(y: Option<f64>, x: Option<f64>) -> Result<Self> {
        Ok(Self {
            y: check_hint("y", y)?,
            x: check_hint("x", x)?,
        })
    }

    pub fn y(self) -> Option<f64> {
        self.y
    }

    pub fn x(self) -> Option<f64> {
        self.x
    }
}

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// The point of a widget that is attached to its position hint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    Center,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Offset of the anchor point inside a widget of `size`.
    pub const fn offset(self, size: Size) -> Point {
        let (h, w) = (size.height, size.width);
        let (y, x) = match self {
            Anchor::TopLeft => (0, 0),
            Anchor::TopCenter => (0, w / 2),
            Anchor::TopRight => (0, w),
            Anchor::LeftCenter => (h / 2, 0),
            Anchor::Center => (h / 2, w / 2),
            Anchor::RightCenter => (h / 2, w),
            Anchor::BottomLeft => (h, 0),
            Anchor::BottomCenter => (h, w / 2),
            Anchor::BottomRight => (h, w),
        };
        Point { y, x }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
