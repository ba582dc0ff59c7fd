//! # quilt-tui
//!
//! A compositing terminal widget toolkit.
//!
//! Widgets live in an arena tree and are laid out by size and position hints
//! relative to their parent. Every frame paints the tree back to front onto a
//! character canvas, clipped by each widget's visible region, and only the
//! changed cells reach the terminal. Input is dispatched topmost-first with
//! short-circuiting, and a widget can grab the pointer to receive its motion
//! until release. Widgets own cooperative tasks (tweens, effects) that
//! are stepped on the frame loop and cancelled when the widget is detached.
//!
//! ## Core Systems
//!
//! - **[`geometry`]**: Point, Size, Region, hints and anchors
//! - **[`color`]**: RGB colors, color pairs, gradients, themes
//! - **[`tree`]**: slotmap-backed widget arena, layout resolution, attribute subscriptions
//! - **[`widget`]**: Widget trait and behavior components (grab, resize, button)
//! - **[`widgets`]**: Container, TextWidget, GraphicWidget, ScrollView, Slider, Window, particle fields
//! - **[`event`]**: input records, dispatch, focus
//! - **[`render`]**: canvas, paint pipeline, crossterm driver
//! - **[`task`]**: scheduler, tweens, easing curves
//! - **[`app`]**: application root and frame loop
//! - **[`logging`]**: file logging through `tracing`
//! - **[`testing`]**: headless Pilot and snapshot helpers

// Foundation
pub mod color;
pub mod error;
pub mod geometry;

// Widget tree
pub mod tree;

// Widget system
pub mod widget;
pub mod widgets;

// Events and background work
pub mod event;
pub mod task;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod logging;

// Test support
pub mod testing;

pub use app::{App, AppConfig};
pub use error::{Error, Result};
pub use tree::{WidgetData, WidgetId, WidgetTree};
pub use widget::Widget;
