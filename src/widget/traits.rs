//! Widget trait: paint, input hooks, child hooks, geometry and focus hooks.
//!
//! A widget's geometry and flags live in its [`WidgetData`](crate::tree::WidgetData);
//! the `Widget` implementation holds widget-specific state and overrides the
//! hooks it cares about. Every hook has a no-op default.
//!
//! Hooks that mutate receive a [`WidgetContext`] wrapping the whole tree, so a
//! widget can move its children, grab the pointer or spawn tasks. While a hook
//! runs, the widget itself is checked out of the tree: hooks of the same widget
//! are not re-entered until the current one returns.

use std::any::Any;

use crate::color::ColorTheme;
use crate::error::Result;
use crate::event::input::{KeyPressEvent, MouseEvent, PasteEvent};
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext, WidgetId, WidgetTree};
use crate::widget::behaviors::ButtonState;

// ---------------------------------------------------------------------------
// DispatchOrder
// ---------------------------------------------------------------------------

/// Whether a widget sees events before or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchOrder {
    /// Children topmost-first (recursively), then the widget itself.
    #[default]
    ChildrenFirst,
    /// The widget itself, then its direct children topmost-first, without recursion.
    SelfFirst,
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by all widgets.
///
/// Input hooks return `true` when the event was handled, which stops
/// propagation.
pub trait Widget: Any {
    /// Type name, used in logs and error messages.
    fn widget_type(&self) -> &'static str;

    /// Paint the widget's own content over its background.
    ///
    /// `view` is already clipped to the part of the widget being rendered.
    fn paint(&self, _cx: &PaintContext<'_>, _view: &mut CanvasView<'_>) {}

    fn dispatch_order(&self) -> DispatchOrder {
        DispatchOrder::ChildrenFirst
    }

    /// `true` if `paint` already draws the children, so the render pass
    /// does not visit them.
    fn paints_children(&self) -> bool {
        false
    }

    fn on_press(&mut self, _cx: &mut WidgetContext<'_>, _event: &KeyPressEvent) -> bool {
        false
    }

    fn on_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
        false
    }

    fn on_double_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
        false
    }

    fn on_triple_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
        false
    }

    fn on_paste(&mut self, _cx: &mut WidgetContext<'_>, _event: &PasteEvent) -> bool {
        false
    }

    /// Called for each pointer move while this widget holds a move grab.
    /// The pointer delta is available as [`WidgetContext::mouse_dyx`].
    fn grab_update(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) {}

    /// Veto a child before it is attached.
    fn check_child(&self, _tree: &WidgetTree, _child: WidgetId) -> Result<()> {
        Ok(())
    }

    /// Veto a child before it is detached.
    fn check_remove(&self, _tree: &WidgetTree, _child: WidgetId) -> Result<()> {
        Ok(())
    }

    /// Forward children added to this widget to another widget.
    fn redirect_child(&self) -> Option<WidgetId> {
        None
    }

    fn on_child_added(&mut self, _cx: &mut WidgetContext<'_>, _child: WidgetId) {}

    fn on_child_removed(&mut self, _cx: &mut WidgetContext<'_>, _child: WidgetId) {}

    /// Called on every widget of a subtree after the subtree is attached.
    fn on_attach(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Called after the widget's size changed, before children are resolved.
    fn on_size(&mut self, _cx: &mut WidgetContext<'_>) {}

    fn on_focus(&mut self, _cx: &mut WidgetContext<'_>) {}

    fn on_blur(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Called when the button component changes state.
    fn on_button_state(&mut self, _cx: &mut WidgetContext<'_>, _state: ButtonState) {}

    /// Called when a pressed button is released.
    fn on_release(&mut self, _cx: &mut WidgetContext<'_>) {}

    fn update_theme(&mut self, _cx: &mut WidgetContext<'_>, _theme: &ColorTheme) {}

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
