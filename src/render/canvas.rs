//! Canvas: the screen buffer of characters and color pairs.
//!
//! A [`Canvas`] is two equal-shape row-major arrays, one of characters and
//! one of [`ColorPair`]s. Widgets never see the whole canvas: they paint
//! through a [`CanvasView`] restricted to the cells they are allowed to touch.

use crate::color::ColorPair;
use crate::geometry::{Point, Region, Size};

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A single changed cell between two frames.
///
/// Used by the driver to emit minimal terminal escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub y: u16,
    pub x: u16,
    pub ch: char,
    pub colors: ColorPair,
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Screen buffer of characters and color pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    chars: Vec<char>,
    colors: Vec<ColorPair>,
}

impl Canvas {
    /// Create a canvas filled with `ch` in `colors`.
    pub fn new(size: Size, ch: char, colors: ColorPair) -> Self {
        let size = Size::new(size.height.max(0), size.width.max(0));
        let len = size.area() as usize;
        Self {
            size,
            chars: vec![ch; len],
            colors: vec![colors; len],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The canvas as a region at the origin.
    pub fn region(&self) -> Region {
        self.size.to_region()
    }

    fn index(&self, point: Point) -> Option<usize> {
        self.size
            .contains(point)
            .then(|| (point.y * self.size.width + point.x) as usize)
    }

    /// Character at an absolute point.
    pub fn char_at(&self, point: Point) -> Option<char> {
        self.index(point).map(|i| self.chars[i])
    }

    /// Color pair at an absolute point.
    pub fn colors_at(&self, point: Point) -> Option<ColorPair> {
        self.index(point).map(|i| self.colors[i])
    }

    /// Overwrite every cell.
    pub fn fill(&mut self, ch: char, colors: ColorPair) {
        self.chars.fill(ch);
        self.colors.fill(colors);
    }

    /// One row of characters, or an empty string past the last row.
    pub fn row_text(&self, row: i32) -> String {
        if row < 0 || row >= self.size.height {
            return String::new();
        }
        let w = self.size.width as usize;
        let start = row as usize * w;
        self.chars[start..start + w].iter().collect()
    }

    /// A writable view of `clip` (clamped to the canvas) for a widget whose
    /// top-left corner is at absolute `origin`.
    pub fn view(&mut self, clip: Region, origin: Point) -> CanvasView<'_> {
        let clip = clip.intersection(self.region());
        CanvasView { canvas: self, clip, origin }
    }

    /// Cells that differ from `previous`.
    ///
    /// If the sizes differ every cell of `self` is reported.
    pub fn diff(&self, previous: &Canvas) -> Vec<CellUpdate> {
        if self.size != previous.size {
            return self.all_cells();
        }
        let mut updates = Vec::new();
        for (i, (ch, colors)) in self.chars.iter().zip(&self.colors).enumerate() {
            if *ch != previous.chars[i] || *colors != previous.colors[i] {
                updates.push(self.update_at(i));
            }
        }
        updates
    }

    /// Every cell as an update, for the first frame.
    pub fn all_cells(&self) -> Vec<CellUpdate> {
        (0..self.chars.len()).map(|i| self.update_at(i)).collect()
    }

    fn update_at(&self, i: usize) -> CellUpdate {
        let w = self.size.width.max(1) as usize;
        CellUpdate {
            y: (i / w) as u16,
            x: (i % w) as u16,
            ch: self.chars[i],
            colors: self.colors[i],
        }
    }
}

// ---------------------------------------------------------------------------
// CanvasView
// ---------------------------------------------------------------------------

/// A clipped window onto a [`Canvas`].
///
/// Coordinates passed to the view are local to the widget being painted
/// (relative to `origin`). Cells outside the clip are silently ignored, so a
/// widget can never paint outside the region it was given.
pub struct CanvasView<'a> {
    canvas: &'a mut Canvas,
    clip: Region,
    origin: Point,
}

impl CanvasView<'_> {
    /// The writable region in absolute coordinates.
    pub fn clip(&self) -> Region {
        self.clip
    }

    /// The writable region in widget-local coordinates.
    pub fn local_clip(&self) -> Region {
        self.clip.translate(-self.origin)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    fn index(&self, local: Point) -> Option<usize> {
        let abs = local + self.origin;
        if self.clip.contains(abs) {
            self.canvas.index(abs)
        } else {
            None
        }
    }

    pub fn char_at(&self, local: Point) -> Option<char> {
        self.index(local).map(|i| self.canvas.chars[i])
    }

    pub fn colors_at(&self, local: Point) -> Option<ColorPair> {
        self.index(local).map(|i| self.canvas.colors[i])
    }

    /// Mutable access to one cell.
    pub fn cell_mut(&mut self, local: Point) -> Option<(&mut char, &mut ColorPair)> {
        let i = self.index(local)?;
        Some((&mut self.canvas.chars[i], &mut self.canvas.colors[i]))
    }

    pub fn set_char(&mut self, local: Point, ch: char) {
        if let Some(i) = self.index(local) {
            self.canvas.chars[i] = ch;
        }
    }

    pub fn set_colors(&mut self, local: Point, colors: ColorPair) {
        if let Some(i) = self.index(local) {
            self.canvas.colors[i] = colors;
        }
    }

    pub fn put(&mut self, local: Point, ch: char, colors: ColorPair) {
        if let Some(i) = self.index(local) {
            self.canvas.chars[i] = ch;
            self.canvas.colors[i] = colors;
        }
    }

    /// Fill every clipped cell with `ch`.
    pub fn fill_char(&mut self, ch: char) {
        for local in self.local_clip().points() {
            self.set_char(local, ch);
        }
    }

    /// Fill every clipped cell with `colors`.
    pub fn fill_colors(&mut self, colors: ColorPair) {
        for local in self.local_clip().points() {
            self.set_colors(local, colors);
        }
    }

    /// Visit every clipped cell with its local coordinates.
    pub fn for_each_cell(&mut self, mut f: impl FnMut(Point, &mut char, &mut ColorPair)) {
        for local in self.local_clip().points() {
            if let Some((ch, colors)) = self.cell_mut(local) {
                f(local, ch, colors);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
