//! Widget system: the widget trait and behavior components.

pub mod behaviors;
pub mod traits;

pub use traits::{DispatchOrder, Widget};
