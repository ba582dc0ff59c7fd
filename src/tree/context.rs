//! Contexts handed to widget hooks.

use std::time::Instant;

use super::arena::WidgetTree;
use super::node::{WidgetData, WidgetId};
use crate::color::ColorTheme;
use crate::geometry::{Point, Region, Size};
use crate::task::{Task, TaskId};

// ---------------------------------------------------------------------------
// WidgetContext
// ---------------------------------------------------------------------------

/// Mutable access to the tree from inside a hook, scoped to one widget.
///
/// The widget running the hook is checked out of the tree for the duration,
/// so `tree()` sees every widget except that one's `Widget` value. Its
/// [`WidgetData`] is still in place.
pub struct WidgetContext<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> WidgetContext<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId) -> Self {
        Self { tree, id }
    }

    /// The widget this context belongs to.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    pub fn tree_ref(&self) -> &WidgetTree {
        &*self.tree
    }

    /// This widget's data. `None` only if the hook destroyed its own widget.
    pub fn data(&self) -> Option<&WidgetData> {
        self.tree.data(self.id)
    }

    pub fn size(&self) -> Size {
        self.data().map_or(Size::ZERO, |d| d.size)
    }

    pub fn pos(&self) -> Point {
        self.data().map_or(Point::ZERO, |d| d.pos)
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.tree.parent(self.id)
    }

    pub fn children(&self) -> Vec<WidgetId> {
        self.tree.children(self.id).to_vec()
    }

    pub fn set_pos(&mut self, pos: Point) -> bool {
        self.tree.set_pos(self.id, pos)
    }

    pub fn set_size(&mut self, size: Size) -> bool {
        self.tree.set_size(self.id, size)
    }

    pub fn absolute_pos(&self) -> Point {
        self.tree.absolute_pos(self.id)
    }

    pub fn to_local(&self, point: Point) -> Point {
        self.tree.to_local(self.id, point)
    }

    pub fn collides_point(&self, point: Point) -> bool {
        self.tree.collides_point(self.id, point)
    }

    /// Pointer movement since the previous event of the active grab.
    pub fn mouse_dyx(&self) -> Point {
        self.tree.mouse_dyx()
    }

    /// Grab the pointer for this widget.
    pub fn grab(&mut self, at: Point) {
        self.tree.grab(self.id, at);
    }

    pub fn ungrab(&mut self) {
        self.tree.ungrab();
    }

    pub fn is_grabbed(&self) -> bool {
        self.tree.grabbed() == Some(self.id)
    }

    pub fn is_focused(&self) -> bool {
        self.tree.focused() == Some(self.id)
    }

    pub fn focus(&mut self) {
        self.tree.focus(self.id);
    }

    pub fn theme(&self) -> ColorTheme {
        *self.tree.theme()
    }

    /// Spawn a task owned by this widget.
    pub fn spawn(&mut self, task: impl Task + 'static, now: Instant) -> TaskId {
        self.tree.spawn(self.id, task, now)
    }
}

// ---------------------------------------------------------------------------
// PaintContext
// ---------------------------------------------------------------------------

/// Read-only view of the tree while a widget paints.
pub struct PaintContext<'a> {
    tree: &'a WidgetTree,
    id: WidgetId,
    region: Region,
}

impl<'a> PaintContext<'a> {
    pub(crate) fn new(tree: &'a WidgetTree, id: WidgetId, region: Region) -> Self {
        Self { tree, id, region }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &'a WidgetTree {
        self.tree
    }

    /// The widget's absolute bounding box (not clipped).
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn is_transparent(&self) -> bool {
        self.tree.data(self.id).is_some_and(|d| d.is_transparent)
    }

    pub fn is_focused(&self) -> bool {
        self.tree.focused() == Some(self.id)
    }

    pub fn theme(&self) -> &'a ColorTheme {
        self.tree.theme()
    }
}
