//! Node types: WidgetId, WidgetData.

use slotmap::new_key_type;

use crate::color::ColorPair;
use crate::geometry::{Anchor, Point, PosHint, Size, SizeHint};
use crate::widget::behaviors::{Button, Grabbable, Resizable};

new_key_type! {
    /// Unique identifier for a widget in a [`WidgetTree`](super::WidgetTree). Copy, lightweight (u64).
    pub struct WidgetId;
}

/// Geometry, flags and behavior components of a single widget.
///
/// The widget's own state (text, texture, proportions) lives in its
/// [`Widget`](crate::widget::Widget) implementation; this is everything the
/// tree, the resolver, the renderer and the dispatcher need to know.
#[derive(Debug, Clone)]
pub struct WidgetData {
    /// Position relative to the parent.
    pub pos: Point,
    pub size: Size,
    pub size_hint: SizeHint,
    pub pos_hint: PosHint,
    /// Bounds applied only to hinted dimensions.
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub anchor: Anchor,
    /// Skip the background pass when painting.
    pub is_transparent: bool,
    /// Invisible widgets are not painted but are still dispatched to.
    pub is_visible: bool,
    /// Disabled widgets are neither painted nor dispatched to.
    pub is_enabled: bool,
    pub background_char: Option<char>,
    pub background_color_pair: Option<ColorPair>,
    /// Whether clicking this widget can give it focus.
    pub focusable: bool,
    pub grabbable: Option<Grabbable>,
    pub resizable: Option<Resizable>,
    pub button: Option<Button>,
}

impl Default for WidgetData {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            size: Size::ZERO,
            size_hint: SizeHint::NONE,
            pos_hint: PosHint::NONE,
            min_height: None,
            max_height: None,
            min_width: None,
            max_width: None,
            anchor: Anchor::TopLeft,
            is_transparent: false,
            is_visible: true,
            is_enabled: true,
            background_char: None,
            background_color_pair: None,
            focusable: false,
            grabbable: None,
            resizable: None,
            button: None,
        }
    }
}

impl WidgetData {
    /// Create a detached, zero-sized, visible and enabled widget at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pos(mut self, pos: impl Into<Point>) -> Self {
        self.pos = pos.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<Size>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_size_hint(mut self, hint: SizeHint) -> Self {
        self.size_hint = hint;
        self
    }

    pub fn with_pos_hint(mut self, hint: PosHint) -> Self {
        self.pos_hint = hint;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set minimum and maximum height used with a height hint (builder).
    pub fn with_height_bounds(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// Set minimum and maximum width used with a width hint (builder).
    pub fn with_width_bounds(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Fill the parent on both axes.
    pub fn auto_resize(self) -> Self {
        self.with_size_hint(SizeHint::FULL)
    }

    /// Stay centered in the parent.
    pub fn auto_position(self) -> Self {
        self.with_pos_hint(PosHint::CENTER).with_anchor(Anchor::Center)
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.is_transparent = transparent;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    pub fn with_background_char(mut self, ch: char) -> Self {
        self.background_char = Some(ch);
        self
    }

    pub fn with_background_color_pair(mut self, pair: ColorPair) -> Self {
        self.background_color_pair = Some(pair);
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn grabbable(mut self, grabbable: Grabbable) -> Self {
        self.grabbable = Some(grabbable);
        self
    }

    pub fn resizable(mut self, resizable: Resizable) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.button = Some(button);
        self
    }

    /// Height, honoring `min_height` then `max_height`.
    pub(crate) fn clamp_height(&self, height: i32) -> i32 {
        clamp_opt(height, self.min_height, self.max_height)
    }

    /// Width, honoring `min_width` then `max_width`.
    pub(crate) fn clamp_width(&self, width: i32) -> i32 {
        clamp_opt(width, self.min_width, self.max_width)
    }
}

fn clamp_opt(value: i32, min: Option<i32>, max: Option<i32>) -> i32 {
    let value = min.map_or(value, |m| value.max(m));
    max.map_or(value, |m| value.min(m))
}
