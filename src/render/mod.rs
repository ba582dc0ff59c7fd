//! Rendering: canvas buffer, tree render pipeline, crossterm driver.

pub mod canvas;
pub mod driver;
pub mod pipeline;

pub use canvas::{Canvas, CanvasView, CellUpdate};
pub use driver::Driver;
pub use pipeline::{render, Effect};
