//! Event dispatch through the widget tree.
//!
//! Events enter at the root and travel down. For the default
//! [`DispatchOrder::ChildrenFirst`] a widget offers the event to its enabled
//! children topmost-first (recursively) and handles it itself only if none
//! of them did. The first handler returning `true` stops propagation.
//!
//! Before a widget's own hook runs, its behavior components get the event:
//! a resizable border, then a button, then a grab.
//!
//! While a grab is active, pointer motion and the releasing mouse-up skip
//! hit testing and go to the grabbing widget. Wheel events and further
//! mouse-downs are dispatched as usual.

use tracing::trace;

use super::input::{KeyPressEvent, MouseEvent, MouseEventType, PasteEvent};
use crate::tree::{WidgetContext, WidgetId, WidgetTree};
use crate::widget::behaviors::{button, grab, resize, GrabKind};
use crate::widget::{DispatchOrder, Widget};

/// One of the events routed through the tree.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Press(&'a KeyPressEvent),
    Click(&'a MouseEvent),
    DoubleClick(&'a MouseEvent),
    TripleClick(&'a MouseEvent),
    Paste(&'a PasteEvent),
}

impl<'a> Event<'a> {
    /// The mouse event of any click kind.
    pub fn mouse(self) -> Option<&'a MouseEvent> {
        match self {
            Event::Click(e) | Event::DoubleClick(e) | Event::TripleClick(e) => Some(e),
            Event::Press(_) | Event::Paste(_) => None,
        }
    }

    /// Run the matching hook of `widget`.
    pub fn deliver(self, widget: &mut dyn Widget, cx: &mut WidgetContext<'_>) -> bool {
        match self {
            Event::Press(e) => widget.on_press(cx, e),
            Event::Click(e) => widget.on_click(cx, e),
            Event::DoubleClick(e) => widget.on_double_click(cx, e),
            Event::TripleClick(e) => widget.on_triple_click(cx, e),
            Event::Paste(e) => widget.on_paste(cx, e),
        }
    }
}

impl WidgetTree {
    pub fn dispatch_press(&mut self, event: &KeyPressEvent) -> bool {
        self.dispatch_from_root(Event::Press(event))
    }

    /// Dispatch a mouse event.
    ///
    /// With an active grab, motion goes only to the grabbing widget and a
    /// mouse-up ends the grab. Any other event, and every event without a
    /// grab, is dispatched from the root; a mouse-down first moves focus to
    /// the topmost focusable widget under the pointer.
    pub fn dispatch_click(&mut self, event: &MouseEvent) -> bool {
        let grab_event = matches!(
            event.event_type,
            MouseEventType::MouseMove | MouseEventType::MouseUp
        );
        if grab_event && self.grab.is_some() {
            return self.dispatch_grabbed(event);
        }
        if event.event_type == MouseEventType::MouseDown {
            self.focus_at(event.position);
        }
        self.dispatch_from_root(Event::Click(event))
    }

    pub fn dispatch_double_click(&mut self, event: &MouseEvent) -> bool {
        self.dispatch_from_root(Event::DoubleClick(event))
    }

    pub fn dispatch_triple_click(&mut self, event: &MouseEvent) -> bool {
        self.dispatch_from_root(Event::TripleClick(event))
    }

    pub fn dispatch_paste(&mut self, event: &PasteEvent) -> bool {
        self.dispatch_from_root(Event::Paste(event))
    }

    fn dispatch_from_root(&mut self, event: Event<'_>) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        if !self.data(root).is_some_and(|d| d.is_enabled) {
            return false;
        }
        let handled = self.dispatch(root, event);
        trace!(?event, handled, "dispatch");
        handled
    }

    /// Offer `event` to the subtree rooted at `id` in its dispatch order.
    pub fn dispatch(&mut self, id: WidgetId, event: Event<'_>) -> bool {
        let order = self
            .widget_dyn(id)
            .map_or(DispatchOrder::default(), |w| w.dispatch_order());
        match order {
            DispatchOrder::ChildrenFirst => {
                for child in self.enabled_children_topmost_first(id) {
                    if self.dispatch(child, event) {
                        return true;
                    }
                }
                self.handle(id, event)
            }
            DispatchOrder::SelfFirst => {
                if self.handle(id, event) {
                    return true;
                }
                self.enabled_children_topmost_first(id)
                    .into_iter()
                    .any(|child| self.handle(child, event))
            }
        }
    }

    fn enabled_children_topmost_first(&self, id: WidgetId) -> Vec<WidgetId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .filter(|&c| self.data(c).is_some_and(|d| d.is_enabled))
            .collect()
    }

    /// Behavior components, then the widget's own hook.
    fn handle(&mut self, id: WidgetId, event: Event<'_>) -> bool {
        let Some(data) = self.data(id) else {
            return false;
        };
        if let Event::Press(_) = event {
            if data.focusable && self.focused() != Some(id) {
                return false;
            }
        }
        if let Event::Click(mouse) = event {
            if resize::try_resize_grab(self, id, mouse)
                || button::handle_button(self, id, mouse)
                || grab::try_grab(self, id, mouse)
            {
                return true;
            }
        }
        self.call_hook(id, false, |w, cx| event.deliver(w, cx))
    }

    fn dispatch_grabbed(&mut self, event: &MouseEvent) -> bool {
        let Some(active) = self.track_grab(event.position) else {
            return false;
        };
        if event.event_type == MouseEventType::MouseUp {
            self.ungrab();
            return true;
        }
        match active.kind {
            GrabKind::Move => self.call_hook(active.id, (), |w, cx| w.grab_update(cx, event)),
            GrabKind::Resize(edges) => resize::apply_resize(self, active.id, edges, active.mouse_dyx),
        }
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
