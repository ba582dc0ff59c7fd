//! Event system: input records, dispatch, focus.

pub mod dispatch;
pub mod focus;
pub mod input;

pub use dispatch::Event;
pub use focus::FocusChain;
pub use input::{
    ClickTracker, InputEvent, Key, KeyPressEvent, Modifiers, MouseButton, MouseEvent,
    MouseEventType, PasteEvent,
};
