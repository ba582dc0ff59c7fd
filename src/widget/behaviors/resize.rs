//! Resizing a widget by dragging its border.

use crate::event::input::{MouseEvent, MouseEventType};
use crate::geometry::{Point, Size};
use crate::tree::{WidgetId, WidgetTree};

use super::grab::GrabKind;

/// Which sides of the border a resize grab moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub fn any(self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// Lets a widget be resized by grabbing the ring of cells along its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resizable {
    /// Thickness of the grabbable ring.
    pub border: Size,
    pub allow_vertical_resize: bool,
    pub allow_horizontal_resize: bool,
}

impl Default for Resizable {
    fn default() -> Self {
        Self {
            border: Size::new(1, 2),
            allow_vertical_resize: true,
            allow_horizontal_resize: true,
        }
    }
}

impl Resizable {
    pub fn new(border: Size) -> Self {
        Self { border, ..Self::default() }
    }

    /// Edges under a local point, or `None` outside the border ring.
    pub fn edges_at(&self, size: Size, local: Point) -> Option<Edges> {
        if !size.contains(local) {
            return None;
        }
        let mut edges = Edges::default();
        if self.allow_vertical_resize {
            edges.top = local.y < self.border.height;
            edges.bottom = !edges.top && local.y >= size.height - self.border.height;
        }
        if self.allow_horizontal_resize {
            edges.left = local.x < self.border.width;
            edges.right = !edges.left && local.x >= size.width - self.border.width;
        }
        edges.any().then_some(edges)
    }
}

/// Start a resize grab if the mouse-down lands in `id`'s border ring.
pub(crate) fn try_resize_grab(tree: &mut WidgetTree, id: WidgetId, event: &MouseEvent) -> bool {
    if event.event_type != MouseEventType::MouseDown || !tree.collides_point(id, event.position) {
        return false;
    }
    let Some(data) = tree.data(id) else {
        return false;
    };
    let Some(resizable) = data.resizable else {
        return false;
    };
    let local = tree.to_local(id, event.position);
    let Some(edges) = resizable.edges_at(data.size, local) else {
        return false;
    };
    tree.start_grab(id, event.position, GrabKind::Resize(edges));
    true
}

/// Move the grabbed edges by `dyx`.
///
/// Height and width never drop below `min_height` / `min_width` (1 when
/// unset); when a top or left edge hits the minimum, the opposite edge stays put.
pub(crate) fn apply_resize(tree: &mut WidgetTree, id: WidgetId, edges: Edges, dyx: Point) {
    let Some(data) = tree.data(id) else {
        return;
    };
    let min_height = data.min_height.unwrap_or(1).max(1);
    let min_width = data.min_width.unwrap_or(1).max(1);
    let (mut pos, mut size) = (data.pos, data.size);

    if edges.top {
        let height = (size.height - dyx.y).max(min_height);
        pos.y += size.height - height;
        size.height = height;
    } else if edges.bottom {
        size.height = (size.height + dyx.y).max(min_height);
    }
    if edges.left {
        let width = (size.width - dyx.x).max(min_width);
        pos.x += size.width - width;
        size.width = width;
    } else if edges.right {
        size.width = (size.width + dyx.x).max(min_width);
    }

    tree.set_pos(id, pos);
    tree.set_size(id, size);
}
