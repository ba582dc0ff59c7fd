//! Text widget: a character grid and a color grid painted verbatim.

use std::any::Any;

use crate::color::{ColorPair, WHITE_ON_BLACK};
use crate::geometry::{Point, Size};
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext};
use crate::widget::traits::Widget;

// ---------------------------------------------------------------------------
// Border
// ---------------------------------------------------------------------------

/// Box-drawing style for [`TextWidget::add_border`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    Light,
    Heavy,
    Double,
    Curved,
    Ascii,
}

impl Border {
    /// `[top-left, top-right, bottom-left, bottom-right, horizontal, vertical]`
    fn glyphs(self) -> [char; 6] {
        match self {
            Border::Light => ['┌', '┐', '└', '┘', '─', '│'],
            Border::Heavy => ['┏', '┓', '┗', '┛', '━', '┃'],
            Border::Double => ['╔', '╗', '╚', '╝', '═', '║'],
            Border::Curved => ['╭', '╮', '╰', '╯', '─', '│'],
            Border::Ascii => ['+', '+', '+', '+', '-', '|'],
        }
    }
}

// ---------------------------------------------------------------------------
// TextWidget
// ---------------------------------------------------------------------------

/// A widget whose content is a grid of chars with a color pair per cell.
///
/// The grids follow the widget's size: on resize, overlapping content is
/// kept and new cells get `default_char` and `default_color_pair`. When the
/// widget is transparent, space cells are not painted.
///
/// # Examples
///
/// ```ignore
/// let label = TextWidget::new(Size::new(1, 5)).with_text("hello", 0, 0);
/// tree.insert(WidgetData::new().with_size((1, 5)), label);
/// ```
#[derive(Debug, Clone)]
pub struct TextWidget {
    size: Size,
    chars: Vec<char>,
    colors: Vec<ColorPair>,
    default_char: char,
    default_color_pair: ColorPair,
}

impl TextWidget {
    pub fn new(size: impl Into<Size>) -> Self {
        let size = clamp_size(size.into());
        let cells = size.area() as usize;
        Self {
            size,
            chars: vec![' '; cells],
            colors: vec![WHITE_ON_BLACK; cells],
            default_char: ' ',
            default_color_pair: WHITE_ON_BLACK,
        }
    }

    /// Set the default char and fill every cell with it.
    pub fn with_default_char(mut self, ch: char) -> Self {
        self.default_char = ch;
        self.chars.fill(ch);
        self
    }

    /// Set the default color pair and fill every cell with it.
    pub fn with_default_color_pair(mut self, colors: ColorPair) -> Self {
        self.set_default_color_pair(colors);
        self
    }

    pub fn with_text(mut self, text: &str, row: i32, col: i32) -> Self {
        self.add_text(text, row, col);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.add_border(border);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Size of the char grid.
    pub fn canvas_size(&self) -> Size {
        self.size
    }

    pub fn default_char(&self) -> char {
        self.default_char
    }

    pub fn default_color_pair(&self) -> ColorPair {
        self.default_color_pair
    }

    /// Set the default color pair and recolor every cell with it.
    pub fn set_default_color_pair(&mut self, colors: ColorPair) {
        self.default_color_pair = colors;
        self.colors.fill(colors);
    }

    fn index(&self, point: Point) -> Option<usize> {
        self.size
            .contains(point)
            .then(|| (point.y * self.size.width + point.x) as usize)
    }

    pub fn char_at(&self, point: Point) -> Option<char> {
        self.index(point).map(|i| self.chars[i])
    }

    pub fn colors_at(&self, point: Point) -> Option<ColorPair> {
        self.index(point).map(|i| self.colors[i])
    }

    /// The chars of one row as a string.
    pub fn row_text(&self, row: i32) -> String {
        (0..self.size.width)
            .filter_map(|x| self.char_at(Point::new(row, x)))
            .collect()
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Write `text` starting at `(row, col)`. Each `'\n'` continues on the
    /// next row at `col`. Cells outside the grid are dropped.
    pub fn add_text(&mut self, text: &str, row: i32, col: i32) {
        for (dy, line) in text.split('\n').enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                let point = Point::new(row + dy as i32, col + dx as i32);
                if let Some(i) = self.index(point) {
                    self.chars[i] = ch;
                }
            }
        }
    }

    pub fn set_char(&mut self, point: Point, ch: char) {
        if let Some(i) = self.index(point) {
            self.chars[i] = ch;
        }
    }

    pub fn set_colors(&mut self, point: Point, colors: ColorPair) {
        if let Some(i) = self.index(point) {
            self.colors[i] = colors;
        }
    }

    /// Color every cell of one row.
    pub fn set_row_colors(&mut self, row: i32, colors: ColorPair) {
        for x in 0..self.size.width {
            self.set_colors(Point::new(row, x), colors);
        }
    }

    /// Reset every cell to the defaults.
    pub fn clear(&mut self) {
        self.chars.fill(self.default_char);
        self.colors.fill(self.default_color_pair);
    }

    /// Draw a box around the outermost cells.
    pub fn add_border(&mut self, border: Border) {
        let Size { height: h, width: w } = self.size;
        if h == 0 || w == 0 {
            return;
        }
        let [tl, tr, bl, br, horizontal, vertical] = border.glyphs();
        for x in 0..w {
            self.set_char(Point::new(0, x), horizontal);
            self.set_char(Point::new(h - 1, x), horizontal);
        }
        for y in 0..h {
            self.set_char(Point::new(y, 0), vertical);
            self.set_char(Point::new(y, w - 1), vertical);
        }
        self.set_char(Point::new(0, 0), tl);
        self.set_char(Point::new(0, w - 1), tr);
        self.set_char(Point::new(h - 1, 0), bl);
        self.set_char(Point::new(h - 1, w - 1), br);
    }

    /// Resize the grids, keeping the overlapping top-left content.
    pub fn resize(&mut self, size: Size) {
        let size = clamp_size(size);
        if size == self.size {
            return;
        }
        let cells = size.area() as usize;
        let mut chars = vec![self.default_char; cells];
        let mut colors = vec![self.default_color_pair; cells];
        for y in 0..size.height.min(self.size.height) {
            for x in 0..size.width.min(self.size.width) {
                let old = (y * self.size.width + x) as usize;
                let new = (y * size.width + x) as usize;
                chars[new] = self.chars[old];
                colors[new] = self.colors[old];
            }
        }
        self.size = size;
        self.chars = chars;
        self.colors = colors;
    }
}

fn clamp_size(size: Size) -> Size {
    Size::new(size.height.max(0), size.width.max(0))
}

impl Widget for TextWidget {
    fn widget_type(&self) -> &'static str {
        "TextWidget"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let transparent = cx.is_transparent();
        for local in view.local_clip().points() {
            let Some(i) = self.index(local) else {
                continue;
            };
            let ch = self.chars[i];
            if transparent && ch == ' ' {
                continue;
            }
            view.put(local, ch, self.colors[i]);
        }
    }

    fn on_size(&mut self, cx: &mut WidgetContext<'_>) {
        self.resize(cx.size());
    }

    fn on_attach(&mut self, cx: &mut WidgetContext<'_>) {
        self.resize(cx.size());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
