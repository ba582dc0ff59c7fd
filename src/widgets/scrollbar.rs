//! Scrollbars of a [`ScrollView`](super::ScrollView).
//!
//! A bar paints its track and a thumb (the indicator) sized by the ratio of
//! the viewport to the scrolled content. Clicking the track jumps the
//! indicator under the pointer; pressing on the indicator and dragging moves
//! it. Either way the bar writes the new proportion back to its scroll view.

use std::any::Any;

use crate::color::{Color, ColorPair, ColorTheme};
use crate::event::input::{MouseEvent, MouseEventType};
use crate::geometry::Point;
use crate::render::canvas::CanvasView;
use crate::tree::{PaintContext, WidgetContext, WidgetId, WidgetTree};
use crate::widget::traits::Widget;

use super::scroll_view::ScrollView;

/// Width of a vertical bar in cells. A horizontal bar is one row tall.
pub const VERTICAL_BAR_WIDTH: i32 = 2;

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// The component of `point` along this axis.
    pub fn along(self, point: Point) -> i32 {
        match self {
            Orientation::Vertical => point.y,
            Orientation::Horizontal => point.x,
        }
    }
}

// ---------------------------------------------------------------------------
// Thumb
// ---------------------------------------------------------------------------

/// Placement of the indicator along a track, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub start: i32,
    pub len: i32,
    /// Cells the indicator can travel: track length minus `len`.
    pub travel: i32,
}

impl Thumb {
    /// Indicator for a track of `track` cells showing `viewport` cells of
    /// `content`, scrolled to `proportion`.
    ///
    /// The indicator fills the whole track when everything is visible.
    pub fn compute(track: i32, viewport: i32, content: i32, proportion: f64) -> Thumb {
        if track <= 0 {
            return Thumb { start: 0, len: 0, travel: 0 };
        }
        let len = if viewport <= 0 || content <= viewport {
            track
        } else {
            ((track as f64 * viewport as f64 / content as f64).round_ties_even() as i32).clamp(1, track)
        };
        let travel = track - len;
        let start = (proportion.clamp(0.0, 1.0) * travel as f64).round_ties_even() as i32;
        Thumb { start, len, travel }
    }

    pub fn contains(self, along: i32) -> bool {
        along >= self.start && along < self.start + self.len
    }
}

// ---------------------------------------------------------------------------
// Scrollbar
// ---------------------------------------------------------------------------

/// One scrollbar of a scroll view. Created by the scroll view itself.
#[derive(Debug, Clone)]
pub struct Scrollbar {
    orientation: Orientation,
    scroll_view: WidgetId,
    track_color: Color,
    indicator_color: Color,
    /// Pointer offset into the indicator while dragging.
    drag_offset: Option<i32>,
}

impl Scrollbar {
    pub(crate) fn new(orientation: Orientation, scroll_view: WidgetId, theme: &ColorTheme) -> Self {
        Self {
            orientation,
            scroll_view,
            track_color: theme.primary_bg_light,
            indicator_color: theme.secondary_bg,
            drag_offset: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Current indicator placement, read from the scroll view.
    pub fn thumb(&self, tree: &WidgetTree, id: WidgetId) -> Thumb {
        let track = tree.data(id).map_or(0, |d| match self.orientation {
            Orientation::Vertical => d.size.height,
            Orientation::Horizontal => d.size.width,
        });
        match tree.widget::<ScrollView>(self.scroll_view) {
            Some(sv) => {
                let (proportion, viewport, content) =
                    sv.axis_state(tree, self.scroll_view, self.orientation);
                Thumb::compute(track, viewport, content, proportion)
            }
            None => Thumb::compute(track, 0, 0, 0.0),
        }
    }

    /// Move the indicator so it starts at `start`, if it can travel at all.
    fn scroll_to(&self, cx: &mut WidgetContext<'_>, start: i32) {
        let thumb = self.thumb(cx.tree_ref(), cx.id());
        if thumb.travel <= 0 {
            return;
        }
        let proportion = start as f64 / thumb.travel as f64;
        let orientation = self.orientation;
        cx.tree().with_widget_mut::<ScrollView, _>(self.scroll_view, |sv, cx| match orientation {
            Orientation::Vertical => sv.set_vertical(cx, proportion),
            Orientation::Horizontal => sv.set_horizontal(cx, proportion),
        });
    }
}

impl Widget for Scrollbar {
    fn widget_type(&self) -> &'static str {
        "Scrollbar"
    }

    fn paint(&self, cx: &PaintContext<'_>, view: &mut CanvasView<'_>) {
        let thumb = self.thumb(cx.tree(), cx.id());
        let track = ColorPair::from_colors(self.track_color, self.track_color);
        let indicator = ColorPair::from_colors(self.indicator_color, self.indicator_color);
        let orientation = self.orientation;
        view.for_each_cell(|local, ch, colors| {
            *ch = ' ';
            *colors = if thumb.contains(orientation.along(local)) { indicator } else { track };
        });
    }

    fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        if event.event_type != MouseEventType::MouseDown || !cx.collides_point(event.position) {
            return false;
        }
        let along = self.orientation.along(cx.to_local(event.position));
        let thumb = self.thumb(cx.tree_ref(), cx.id());
        if !thumb.contains(along) {
            self.scroll_to(cx, along - thumb.len / 2);
        }
        let thumb = self.thumb(cx.tree_ref(), cx.id());
        self.drag_offset = Some(along - thumb.start);
        cx.grab(event.position);
        true
    }

    fn grab_update(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) {
        let Some(offset) = self.drag_offset else {
            return;
        };
        if event.event_type != MouseEventType::MouseMove {
            return;
        }
        let along = self.orientation.along(cx.to_local(event.position));
        self.scroll_to(cx, along - offset);
    }

    fn update_theme(&mut self, _cx: &mut WidgetContext<'_>, theme: &ColorTheme) {
        self.track_color = theme.primary_bg_light;
        self.indicator_color = theme.secondary_bg;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumb_fills_track_when_content_fits() {
        assert_eq!(Thumb::compute(10, 10, 8, 0.3), Thumb { start: 0, len: 10, travel: 0 });
    }

    #[test]
    fn thumb_scales_with_viewport_ratio() {
        let thumb = Thumb::compute(10, 10, 40, 0.0);
        assert_eq!(thumb.len, 2);
        assert_eq!(thumb.travel, 8);
        assert_eq!(Thumb::compute(10, 10, 40, 1.0).start, 8);
        assert_eq!(Thumb::compute(10, 10, 40, 0.5).start, 4);
        assert_eq!(Thumb::compute(10, 12, 40, 0.0).len, 3);
    }

    #[test]
    fn thumb_start_rounds_half_to_even() {
        let thumb = Thumb::compute(10, 10, 20, 0.5);
        assert_eq!((thumb.len, thumb.travel), (5, 5));
        assert_eq!(thumb.start, 2);
        assert_eq!(Thumb::compute(10, 3, 10, 0.5).start, 4);
    }

    #[test]
    fn thumb_is_at_least_one_cell() {
        assert_eq!(Thumb::compute(4, 1, 1000, 0.0).len, 1);
    }

    #[test]
    fn empty_track_has_no_thumb() {
        let thumb = Thumb::compute(0, 5, 10, 0.5);
        assert_eq!(thumb.len, 0);
        assert!(!thumb.contains(0));
    }
}
