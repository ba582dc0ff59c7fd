//! Button state machine: normal, hover, down.

use crate::event::input::{MouseEvent, MouseEventType};
use crate::tree::{WidgetId, WidgetTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hover,
    Down,
}

/// Button behavior. The widget observes it through
/// [`on_button_state`](crate::widget::Widget::on_button_state) and
/// [`on_release`](crate::widget::Widget::on_release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Button {
    /// Release even when the mouse-up happens outside the widget.
    pub always_release: bool,
    pub state: ButtonState,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always_release(mut self, always: bool) -> Self {
        self.always_release = always;
        self
    }
}

/// Step the button of `id` for a mouse event. Returns `true` if the event
/// was consumed (mouse-down or release inside the widget).
pub(crate) fn handle_button(tree: &mut WidgetTree, id: WidgetId, event: &MouseEvent) -> bool {
    let Some(button) = tree.data(id).and_then(|d| d.button) else {
        return false;
    };
    let collides = tree.collides_point(id, event.position);
    let was_down = button.state == ButtonState::Down;

    let (next, release, handled) = match event.event_type {
        MouseEventType::MouseDown if collides => (ButtonState::Down, false, true),
        MouseEventType::MouseUp if was_down && (collides || button.always_release) => {
            let next = if collides { ButtonState::Hover } else { ButtonState::Normal };
            (next, true, collides)
        }
        _ if collides && was_down => (ButtonState::Down, false, false),
        _ if collides => (ButtonState::Hover, false, false),
        _ => (ButtonState::Normal, false, false),
    };

    if next != button.state {
        if let Some(b) = tree.data_mut(id).and_then(|d| d.button.as_mut()) {
            b.state = next;
        }
        tree.call_hook(id, (), |w, cx| w.on_button_state(cx, next));
    }
    if release {
        tree.call_hook(id, (), |w, cx| w.on_release(cx));
    }
    handled
}
