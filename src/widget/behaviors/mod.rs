//! Behavior components attached to a widget's data.
//!
//! The dispatcher queries these by capability before calling the widget's
//! own hooks: a resizable widget starts a resize grab from its border ring,
//! a button tracks its press state, a grabbable widget captures the pointer.

pub mod button;
pub mod grab;
pub mod resize;

pub use button::{Button, ButtonState};
pub use grab::{ActiveGrab, GrabKind, Grabbable};
pub use resize::{Edges, Resizable};
