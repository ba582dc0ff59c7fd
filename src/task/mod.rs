//! Background work on the event loop: scheduled tasks, tweens, easings.

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{Scheduler, Task, TaskId, TaskStatus};
pub use tween::Tween;
