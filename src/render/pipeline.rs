//! Render pipeline: paint the intersection of a source region with every widget.
//!
//! Rendering walks the tree bottom-up in paint order. Each widget is clipped
//! to `source ∩ own bounding box`, and its children are clipped to that same
//! intersection, so a widget can never paint outside its parent. Per widget:
//!
//! 1. background pass, unless transparent (char and color pair each only if set);
//! 2. the widget's own [`paint`](crate::widget::Widget::paint);
//! 3. children in list order;
//! 4. post-paint effects.
//!
//! Invisible or disabled widgets are skipped together with their subtree.

use tracing::trace;

use super::canvas::{Canvas, CanvasView};
use crate::geometry::{Point, Region};
use crate::tree::{PaintContext, WidgetId, WidgetTree};

/// A post-paint pass over a widget's rendered region.
pub trait Effect {
    /// Adjust the already painted cells of `view`.
    fn apply(&self, view: &mut CanvasView<'_>);
}

/// Render the whole tree into `canvas`, touching only cells inside `source`.
pub fn render(tree: &WidgetTree, canvas: &mut Canvas, source: Region) {
    let Some(root) = tree.root() else {
        return;
    };
    let source = source.intersection(canvas.region());
    trace!(?source, "render");
    render_widget(tree, root, Point::ZERO, canvas, source);
}

/// Render one widget and its subtree, clipped to `source`.
///
/// `parent_origin` is the absolute position of the widget's parent.
pub fn render_widget(
    tree: &WidgetTree,
    id: WidgetId,
    parent_origin: Point,
    canvas: &mut Canvas,
    source: Region,
) {
    let Some(data) = tree.data(id) else {
        return;
    };
    if !data.is_visible || !data.is_enabled {
        return;
    }

    let origin = parent_origin + data.pos;
    let bbox = Region::from_parts(origin, data.size);
    let clip = bbox.intersection(source);
    if clip.is_empty() {
        return;
    }

    {
        let mut view = canvas.view(clip, origin);
        if !data.is_transparent {
            if let Some(ch) = data.background_char {
                view.fill_char(ch);
            }
            if let Some(colors) = data.background_color_pair {
                view.fill_colors(colors);
            }
        }
        if let Some(widget) = tree.widget_dyn(id) {
            widget.paint(&PaintContext::new(tree, id, bbox), &mut view);
        }
    }

    if !tree.widget_dyn(id).is_some_and(|w| w.paints_children()) {
        for &child in tree.children(id) {
            render_widget(tree, child, origin, canvas, clip);
        }
    }

    let effects = tree.effects(id);
    if !effects.is_empty() {
        let mut view = canvas.view(clip, origin);
        for effect in effects {
            effect.apply(&mut view);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
