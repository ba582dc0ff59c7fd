//! Pointer capture.
//!
//! While a grab is active pointer motion goes straight to the grabbing
//! widget, bypassing hit testing, until mouse-up or an explicit ungrab.

use tracing::debug;

use super::resize::Edges;
use crate::event::input::{MouseEvent, MouseEventType};
use crate::geometry::Point;
use crate::tree::{WidgetId, WidgetTree};

/// Lets a widget capture the pointer on mouse-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grabbable {
    pub is_grabbable: bool,
    /// Don't pull the widget to the front of its siblings when grabbed.
    pub disable_ptf: bool,
}

impl Default for Grabbable {
    fn default() -> Self {
        Self { is_grabbable: true, disable_ptf: false }
    }
}

impl Grabbable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_ptf(mut self, disable: bool) -> Self {
        self.disable_ptf = disable;
        self
    }
}

/// What an active grab does with pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabKind {
    /// Forwarded to the widget's `grab_update`.
    Move,
    /// Resizes the widget from the given border edges.
    Resize(Edges),
}

/// The widget currently holding the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveGrab {
    pub id: WidgetId,
    pub kind: GrabKind,
    /// Pointer position of the previous grabbed event.
    pub last: Point,
    /// Pointer movement between the previous and the current event.
    pub mouse_dyx: Point,
}

impl WidgetTree {
    /// Route pointer motion to `id` until mouse-up or [`ungrab`](Self::ungrab).
    ///
    /// `at` is the absolute pointer position the grab starts from. The widget
    /// is pulled to the front unless its [`Grabbable`] disables that.
    pub fn grab(&mut self, id: WidgetId, at: Point) {
        self.start_grab(id, at, GrabKind::Move);
    }

    pub(crate) fn start_grab(&mut self, id: WidgetId, at: Point, kind: GrabKind) {
        if !self.contains(id) {
            return;
        }
        let ptf = !self
            .data(id)
            .and_then(|d| d.grabbable)
            .is_some_and(|g| g.disable_ptf);
        if ptf {
            self.pull_to_front(id);
        }
        self.grab = Some(ActiveGrab { id, kind, last: at, mouse_dyx: Point::ZERO });
        debug!(?id, ?kind, "grab");
    }

    pub fn ungrab(&mut self) {
        if let Some(grab) = self.grab.take() {
            debug!(id = ?grab.id, "ungrab");
        }
    }

    /// The widget holding the pointer, if any.
    pub fn grabbed(&self) -> Option<WidgetId> {
        self.grab.map(|g| g.id)
    }

    /// Pointer delta of the latest grabbed event, zero without a grab.
    pub fn mouse_dyx(&self) -> Point {
        self.grab.map_or(Point::ZERO, |g| g.mouse_dyx)
    }

    /// Advance the active grab to a new pointer position.
    pub(crate) fn track_grab(&mut self, at: Point) -> Option<ActiveGrab> {
        let grab = self.grab.as_mut()?;
        grab.mouse_dyx = at - grab.last;
        grab.last = at;
        Some(*grab)
    }
}

/// Start a move grab if `id` is grabbable and the mouse-down hits it.
pub(crate) fn try_grab(tree: &mut WidgetTree, id: WidgetId, event: &MouseEvent) -> bool {
    let grabbable = tree
        .data(id)
        .and_then(|d| d.grabbable)
        .is_some_and(|g| g.is_grabbable);
    if !grabbable
        || event.event_type != MouseEventType::MouseDown
        || !tree.collides_point(id, event.position)
    {
        return false;
    }
    tree.grab(id, event.position);
    true
}
