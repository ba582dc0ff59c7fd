//! Built-in widgets: Container, TextWidget, GraphicWidget, ScrollView,
//! Slider, Window, particle fields and effects.

pub mod container;
pub mod effects;
pub mod graphic;
pub mod particle_field;
pub mod scroll_view;
pub mod scrollbar;
pub mod slider;
pub mod text;
pub mod window;

pub use container::Container;
pub use effects::RainbowCycleEffect;
pub use graphic::GraphicWidget;
pub use particle_field::{GraphicParticle, Particle, ParticleField, TextParticle};
pub use scroll_view::ScrollView;
pub use scrollbar::{Orientation, Scrollbar, Thumb};
pub use slider::Slider;
pub use text::{Border, TextWidget};
pub use window::Window;
