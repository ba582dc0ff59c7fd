//! Snapshot helpers: render a widget tree or a canvas to plain text.
//!
//! Rows are trimmed of trailing spaces and joined with `'\n'`, so expected
//! output can be written as short string literals or `insta` inline
//! snapshots.

use crate::color::{ColorPair, WHITE_ON_BLACK};
use crate::geometry::{Point, Size};
use crate::render::{render, Canvas};
use crate::tree::WidgetTree;

/// Plain text of every canvas row, trailing spaces trimmed.
pub fn canvas_to_string(canvas: &Canvas) -> String {
    let rows = canvas.size().height.max(0);
    (0..rows)
        .map(|y| canvas.row_text(y).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the whole tree onto a fresh blank canvas of `size`.
pub fn render_tree(tree: &WidgetTree, size: Size) -> Canvas {
    let mut canvas = Canvas::new(size, ' ', WHITE_ON_BLACK);
    let region = canvas.region();
    render(tree, &mut canvas, region);
    canvas
}

/// Render the whole tree and return it as text.
pub fn render_to_string(tree: &WidgetTree, size: Size) -> String {
    canvas_to_string(&render_tree(tree, size))
}

/// Color pairs of one canvas row, for assertions on styling.
pub fn row_colors(canvas: &Canvas, row: i32) -> Vec<ColorPair> {
    (0..canvas.size().width)
        .filter_map(|x| canvas.colors_at(Point::new(row, x)))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================
