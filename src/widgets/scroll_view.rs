//! Scroll view: a viewport over a single, possibly larger, child.
//!
//! The child (the "view") is positioned at negative offsets so that the part
//! selected by the vertical and horizontal proportions shows through. Two
//! scrollbars sit on top of the view along the right and bottom edges.
//!
//! Scrolling is driven by the bars, the mouse wheel, arrow keys and by
//! grabbing the scroll view itself and dragging the content.

use std::any::Any;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::event::input::{Key, KeyPressEvent, MouseEvent, MouseEventType};
use crate::geometry::{Point, Size};
use crate::tree::{Attr, WidgetContext, WidgetData, WidgetId, WidgetTree};
use crate::widget::behaviors::Grabbable;
use crate::widget::traits::Widget;

use super::scrollbar::{Orientation, Scrollbar, VERTICAL_BAR_WIDTH};

// ---------------------------------------------------------------------------
// ScrollView
// ---------------------------------------------------------------------------

/// A viewport that scrolls one child.
///
/// Proportions are in `[0, 1]`: `0` shows the top (left) of the view, `1`
/// the bottom (right). A proportion is forced to `0` while there is no view
/// or the view fits along that axis.
///
/// # Examples
///
/// ```ignore
/// let sv = ScrollView::new()
///     .show_horizontal_bar(false)
///     .build(&mut tree, WidgetData::new().with_size((10, 10)));
/// let content = tree.insert(WidgetData::new().with_size((20, 5)), Container);
/// tree.add_widget(sv, content)?;
/// ScrollView::set_vertical_proportion(&mut tree, sv, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ScrollView {
    pub allow_vertical_scroll: bool,
    pub allow_horizontal_scroll: bool,
    pub scrollwheel_enabled: bool,
    pub arrow_keys_enabled: bool,
    is_grabbable: bool,
    show_vertical_bar: bool,
    show_horizontal_bar: bool,
    vertical_proportion: f64,
    horizontal_proportion: f64,
    view: Option<WidgetId>,
    vertical_bar: Option<WidgetId>,
    horizontal_bar: Option<WidgetId>,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self {
            allow_vertical_scroll: true,
            allow_horizontal_scroll: true,
            scrollwheel_enabled: true,
            arrow_keys_enabled: true,
            is_grabbable: true,
            show_vertical_bar: true,
            show_horizontal_bar: true,
            vertical_proportion: 0.0,
            horizontal_proportion: 0.0,
            view: None,
            vertical_bar: None,
            horizontal_bar: None,
        }
    }
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_vertical_scroll(mut self, allow: bool) -> Self {
        self.allow_vertical_scroll = allow;
        self
    }

    pub fn allow_horizontal_scroll(mut self, allow: bool) -> Self {
        self.allow_horizontal_scroll = allow;
        self
    }

    pub fn show_vertical_bar(mut self, show: bool) -> Self {
        self.show_vertical_bar = show;
        self
    }

    pub fn show_horizontal_bar(mut self, show: bool) -> Self {
        self.show_horizontal_bar = show;
        self
    }

    pub fn scrollwheel_enabled(mut self, enabled: bool) -> Self {
        self.scrollwheel_enabled = enabled;
        self
    }

    pub fn arrow_keys_enabled(mut self, enabled: bool) -> Self {
        self.arrow_keys_enabled = enabled;
        self
    }

    /// Whether dragging the scroll view itself scrolls the content.
    pub fn is_grabbable(mut self, grabbable: bool) -> Self {
        self.is_grabbable = grabbable;
        self
    }

    /// Insert the scroll view and its two bars into `tree`.
    pub fn build(self, tree: &mut WidgetTree, data: WidgetData) -> WidgetId {
        let data = data.grabbable(Grabbable {
            is_grabbable: self.is_grabbable,
            disable_ptf: false,
        });
        let (show_vertical, show_horizontal) = (self.show_vertical_bar, self.show_horizontal_bar);
        let id = tree.insert(data, self);

        let theme = *tree.theme();
        let bar_data = |show: bool| {
            WidgetData::new().enabled(show).grabbable(Grabbable {
                is_grabbable: false,
                disable_ptf: true,
            })
        };
        let vertical = tree.insert(
            bar_data(show_vertical),
            Scrollbar::new(Orientation::Vertical, id, &theme),
        );
        let horizontal = tree.insert(
            bar_data(show_horizontal),
            Scrollbar::new(Orientation::Horizontal, id, &theme),
        );
        tree.attach(id, vertical);
        tree.attach(id, horizontal);

        tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| {
            sv.vertical_bar = Some(vertical);
            sv.horizontal_bar = Some(horizontal);
            sv.layout_bars(cx);
        });
        id
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The scrolled child, if one was added.
    pub fn view(&self) -> Option<WidgetId> {
        self.view
    }

    pub fn vertical_bar(&self) -> Option<WidgetId> {
        self.vertical_bar
    }

    pub fn horizontal_bar(&self) -> Option<WidgetId> {
        self.horizontal_bar
    }

    pub fn vertical_proportion(&self) -> f64 {
        self.vertical_proportion
    }

    pub fn horizontal_proportion(&self) -> f64 {
        self.horizontal_proportion
    }

    pub fn is_showing_vertical_bar(&self) -> bool {
        self.show_vertical_bar
    }

    pub fn is_showing_horizontal_bar(&self) -> bool {
        self.show_horizontal_bar
    }

    fn view_data<'t>(&self, tree: &'t WidgetTree) -> Option<&'t WidgetData> {
        self.view.and_then(|v| tree.data(v))
    }

    /// How far the view can move vertically.
    pub fn total_vertical_distance(&self, tree: &WidgetTree, id: WidgetId) -> i32 {
        match (self.view_data(tree), tree.data(id)) {
            (Some(view), Some(own)) => {
                view.size.height - own.size.height + i32::from(self.show_horizontal_bar)
            }
            _ => 0,
        }
    }

    /// How far the view can move horizontally.
    pub fn total_horizontal_distance(&self, tree: &WidgetTree, id: WidgetId) -> i32 {
        match (self.view_data(tree), tree.data(id)) {
            (Some(view), Some(own)) => {
                view.size.width - own.size.width
                    + VERTICAL_BAR_WIDTH * i32::from(self.show_vertical_bar)
            }
            _ => 0,
        }
    }

    /// `(proportion, viewport, content)` along one axis, for the scrollbars.
    pub(crate) fn axis_state(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        orientation: Orientation,
    ) -> (f64, i32, i32) {
        let own = tree.data(id).map_or(Size::ZERO, |d| d.size);
        let view = self.view_data(tree).map_or(Size::ZERO, |d| d.size);
        match orientation {
            Orientation::Vertical => (
                self.vertical_proportion,
                own.height - i32::from(self.show_horizontal_bar),
                view.height,
            ),
            Orientation::Horizontal => (
                self.horizontal_proportion,
                own.width - VERTICAL_BAR_WIDTH * i32::from(self.show_vertical_bar),
                view.width,
            ),
        }
    }

    // ── Tree-level setters ───────────────────────────────────────────

    /// Scroll the scroll view `id` vertically. No-op if `id` is not a scroll view.
    pub fn set_vertical_proportion(tree: &mut WidgetTree, id: WidgetId, proportion: f64) {
        tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| sv.set_vertical(cx, proportion));
    }

    /// Scroll the scroll view `id` horizontally. No-op if `id` is not a scroll view.
    pub fn set_horizontal_proportion(tree: &mut WidgetTree, id: WidgetId, proportion: f64) {
        tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| sv.set_horizontal(cx, proportion));
    }

    pub fn set_show_vertical_bar(tree: &mut WidgetTree, id: WidgetId, show: bool) {
        tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| {
            sv.show_vertical_bar = show;
            if let Some(bar) = sv.vertical_bar {
                cx.tree().set_enabled(bar, show);
            }
            sv.layout_bars(cx);
            sv.set_view_pos(cx);
        });
    }

    pub fn set_show_horizontal_bar(tree: &mut WidgetTree, id: WidgetId, show: bool) {
        tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| {
            sv.show_horizontal_bar = show;
            if let Some(bar) = sv.horizontal_bar {
                cx.tree().set_enabled(bar, show);
            }
            sv.layout_bars(cx);
            sv.set_view_pos(cx);
        });
    }

    // ── Scrolling ────────────────────────────────────────────────────

    /// Set the vertical proportion from inside a hook.
    pub fn set_vertical(&mut self, cx: &mut WidgetContext<'_>, proportion: f64) {
        if !self.allow_vertical_scroll {
            return;
        }
        let fits = self
            .view_data(cx.tree_ref())
            .is_none_or(|view| view.size.height <= cx.size().height);
        if fits {
            self.vertical_proportion = 0.0;
        } else {
            self.vertical_proportion = proportion.clamp(0.0, 1.0);
            self.set_view_top(cx);
        }
    }

    /// Set the horizontal proportion from inside a hook.
    pub fn set_horizontal(&mut self, cx: &mut WidgetContext<'_>, proportion: f64) {
        if !self.allow_horizontal_scroll {
            return;
        }
        let fits = self
            .view_data(cx.tree_ref())
            .is_none_or(|view| view.size.width <= cx.size().width);
        if fits {
            self.horizontal_proportion = 0.0;
        } else {
            self.horizontal_proportion = proportion.clamp(0.0, 1.0);
            self.set_view_left(cx);
        }
    }

    fn set_view_top(&self, cx: &mut WidgetContext<'_>) {
        let Some(view) = self.view else {
            return;
        };
        let distance = self.total_vertical_distance(cx.tree_ref(), cx.id());
        let top = if distance <= 0 {
            0
        } else {
            -(self.vertical_proportion * distance as f64).round_ties_even() as i32
        };
        let left = cx.tree_ref().data(view).map_or(0, |d| d.pos.x);
        cx.tree().set_pos(view, Point::new(top, left));
    }

    fn set_view_left(&self, cx: &mut WidgetContext<'_>) {
        let Some(view) = self.view else {
            return;
        };
        let distance = self.total_horizontal_distance(cx.tree_ref(), cx.id());
        let left = if distance <= 0 {
            0
        } else {
            -(self.horizontal_proportion * distance as f64).round_ties_even() as i32
        };
        let top = cx.tree_ref().data(view).map_or(0, |d| d.pos.y);
        cx.tree().set_pos(view, Point::new(top, left));
    }

    /// Re-place the view from the current proportions.
    fn set_view_pos(&self, cx: &mut WidgetContext<'_>) {
        self.set_view_top(cx);
        self.set_view_left(cx);
    }

    /// Scroll so the view moves `n` rows down (content toward the top).
    pub fn scroll_up(&mut self, cx: &mut WidgetContext<'_>, n: i32) {
        let Some(view) = self.view_data(cx.tree_ref()) else {
            return;
        };
        let top = view.pos.y;
        let distance = self.total_vertical_distance(cx.tree_ref(), cx.id());
        if distance <= 0 {
            self.set_vertical(cx, 0.0);
        } else {
            self.set_vertical(cx, f64::from(-top - n) / f64::from(distance));
        }
    }

    pub fn scroll_down(&mut self, cx: &mut WidgetContext<'_>, n: i32) {
        self.scroll_up(cx, -n);
    }

    /// Scroll so the view moves `n` columns right (content toward the left edge).
    pub fn scroll_left(&mut self, cx: &mut WidgetContext<'_>, n: i32) {
        let Some(view) = self.view_data(cx.tree_ref()) else {
            return;
        };
        let left = view.pos.x;
        let distance = self.total_horizontal_distance(cx.tree_ref(), cx.id());
        if distance <= 0 {
            self.set_horizontal(cx, 0.0);
        } else {
            self.set_horizontal(cx, f64::from(-left - n) / f64::from(distance));
        }
    }

    pub fn scroll_right(&mut self, cx: &mut WidgetContext<'_>, n: i32) {
        self.scroll_left(cx, -n);
    }

    // ── Internals ────────────────────────────────────────────────────

    fn layout_bars(&self, cx: &mut WidgetContext<'_>) {
        let Size { height, width } = cx.size();
        let show_h = i32::from(self.show_horizontal_bar);
        let show_v = i32::from(self.show_vertical_bar);
        if let Some(bar) = self.vertical_bar {
            let tree = cx.tree();
            tree.set_pos(bar, Point::new(0, width - VERTICAL_BAR_WIDTH));
            tree.set_size(bar, Size::new((height - show_h).max(0), VERTICAL_BAR_WIDTH));
        }
        if let Some(bar) = self.horizontal_bar {
            let tree = cx.tree();
            tree.set_pos(bar, Point::new(height - 1, 0));
            tree.set_size(bar, Size::new(1, (width - VERTICAL_BAR_WIDTH * show_v).max(0)));
        }
    }

    /// Re-place the view whenever it is resized.
    fn watch_view(&self, cx: &mut WidgetContext<'_>) {
        let Some(view) = self.view else {
            return;
        };
        let id = cx.id();
        let tree = cx.tree();
        tree.unsubscribe(id, view, Attr::Size);
        tree.subscribe(
            view,
            Attr::Size,
            id,
            Rc::new(move |tree: &mut WidgetTree, _| {
                tree.with_widget_mut::<ScrollView, _>(id, |sv, cx| sv.set_view_pos(cx));
            }),
        );
    }
}

impl Widget for ScrollView {
    fn widget_type(&self) -> &'static str {
        "ScrollView"
    }

    fn check_child(&self, _tree: &WidgetTree, _child: WidgetId) -> Result<()> {
        match self.view {
            Some(_) => Err(Error::SlotOccupied("ScrollView")),
            None => Ok(()),
        }
    }

    fn check_remove(&self, _tree: &WidgetTree, child: WidgetId) -> Result<()> {
        if self.view == Some(child) {
            Ok(())
        } else {
            Err(Error::NotAChild)
        }
    }

    fn on_child_added(&mut self, cx: &mut WidgetContext<'_>, child: WidgetId) {
        self.view = Some(child);
        cx.tree().send_to_back(child);
        self.watch_view(cx);
        self.set_view_pos(cx);
        debug!(scroll_view = ?cx.id(), view = ?child, "scroll view content set");
    }

    fn on_child_removed(&mut self, cx: &mut WidgetContext<'_>, child: WidgetId) {
        if self.view == Some(child) {
            let id = cx.id();
            cx.tree().unsubscribe(id, child, Attr::Size);
            self.view = None;
            self.vertical_proportion = 0.0;
            self.horizontal_proportion = 0.0;
        }
    }

    fn on_attach(&mut self, cx: &mut WidgetContext<'_>) {
        self.watch_view(cx);
    }

    fn on_size(&mut self, cx: &mut WidgetContext<'_>) {
        self.layout_bars(cx);
        self.set_view_pos(cx);
    }

    fn on_press(&mut self, cx: &mut WidgetContext<'_>, event: &KeyPressEvent) -> bool {
        if !self.arrow_keys_enabled {
            return false;
        }
        match event.key {
            Key::Up => self.scroll_up(cx, 1),
            Key::Down => self.scroll_down(cx, 1),
            Key::Left => self.scroll_left(cx, 1),
            Key::Right => self.scroll_right(cx, 1),
            _ => return false,
        }
        true
    }

    fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        if !self.scrollwheel_enabled || !cx.collides_point(event.position) {
            return false;
        }
        match event.event_type {
            MouseEventType::ScrollUp => self.scroll_up(cx, 1),
            MouseEventType::ScrollDown => self.scroll_down(cx, 1),
            _ => return false,
        }
        true
    }

    fn grab_update(&mut self, cx: &mut WidgetContext<'_>, _event: &MouseEvent) {
        let dyx = cx.mouse_dyx();
        self.scroll_up(cx, dyx.y);
        self.scroll_left(cx, dyx.x);
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
    use crate::event::input::MouseEvent;
    use crate::widgets::Container;

    fn scene(view_size: (i32, i32)) -> (WidgetTree, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((30, 30)), Container);
        let sv = ScrollView::new()
            .show_horizontal_bar(false)
            .show_vertical_bar(false)
            .build(&mut tree, WidgetData::new().with_size((10, 10)));
        tree.add_widget(root, sv).unwrap();
        let view = tree.insert(WidgetData::new().with_size(view_size), Container);
        tree.add_widget(sv, view).unwrap();
        (tree, sv, view)
    }

    fn view_pos(tree: &WidgetTree, view: WidgetId) -> Point {
        tree.data(view).unwrap().pos
    }

    fn proportion(tree: &WidgetTree, sv: WidgetId) -> f64 {
        tree.widget::<ScrollView>(sv).unwrap().vertical_proportion()
    }

    #[test]
    fn half_proportion_moves_view_halfway() {
        let (mut tree, sv, view) = scene((20, 5));
        ScrollView::set_vertical_proportion(&mut tree, sv, 0.5);
        assert_eq!(view_pos(&tree, view), Point::new(-5, 0));
        assert_eq!(proportion(&tree, sv), 0.5);
    }

    #[test]
    fn half_proportion_over_odd_distance_rounds_to_even() {
        let (mut tree, sv, view) = scene((15, 5));
        ScrollView::set_vertical_proportion(&mut tree, sv, 0.5);
        assert_eq!(view_pos(&tree, view), Point::new(-2, 0));

        let (mut tree, sv, view) = scene((5, 17));
        ScrollView::set_horizontal_proportion(&mut tree, sv, 0.5);
        assert_eq!(view_pos(&tree, view), Point::new(0, -4));
    }

    #[test]
    fn proportion_is_clamped() {
        let (mut tree, sv, view) = scene((20, 5));
        ScrollView::set_vertical_proportion(&mut tree, sv, 3.0);
        assert_eq!(proportion(&tree, sv), 1.0);
        assert_eq!(view_pos(&tree, view), Point::new(-10, 0));
    }

    #[test]
    fn fitting_view_forces_zero() {
        let (mut tree, sv, view) = scene((5, 5));
        ScrollView::set_vertical_proportion(&mut tree, sv, 0.7);
        assert_eq!(proportion(&tree, sv), 0.0);
        assert_eq!(view_pos(&tree, view), Point::ZERO);
    }

    #[test]
    fn disallowed_axis_is_ignored() {
        let (mut tree, sv, view) = scene((20, 20));
        tree.with_widget_mut::<ScrollView, _>(sv, |sv, _| sv.allow_horizontal_scroll = false);
        ScrollView::set_horizontal_proportion(&mut tree, sv, 1.0);
        assert_eq!(view_pos(&tree, view), Point::ZERO);
    }

    #[test]
    fn horizontal_bar_adds_to_vertical_distance() {
        let mut tree = WidgetTree::new();
        let sv = ScrollView::new()
            .show_vertical_bar(false)
            .build(&mut tree, WidgetData::new().with_size((10, 10)));
        let view = tree.insert(WidgetData::new().with_size((20, 20)), Container);
        tree.add_widget(sv, view).unwrap();
        let widget = tree.widget::<ScrollView>(sv).unwrap();
        assert_eq!(widget.total_vertical_distance(&tree, sv), 11);
        assert_eq!(widget.total_horizontal_distance(&tree, sv), 10);
    }

    #[test]
    fn second_child_is_rejected() {
        let (mut tree, sv, _) = scene((20, 5));
        let other = tree.insert(WidgetData::new(), Container);
        assert!(matches!(tree.add_widget(sv, other), Err(Error::SlotOccupied(_))));
    }

    #[test]
    fn bars_cannot_be_removed() {
        let (mut tree, sv, _) = scene((20, 5));
        let bar = tree.widget::<ScrollView>(sv).unwrap().vertical_bar().unwrap();
        assert!(matches!(tree.remove_widget(sv, bar), Err(Error::NotAChild)));
    }

    #[test]
    fn view_resize_repositions() {
        let (mut tree, sv, view) = scene((20, 5));
        ScrollView::set_vertical_proportion(&mut tree, sv, 1.0);
        assert_eq!(view_pos(&tree, view), Point::new(-10, 0));
        tree.set_size(view, Size::new(30, 5));
        assert_eq!(view_pos(&tree, view), Point::new(-20, 0));
    }

    #[test]
    fn wheel_scrolls_one_row() {
        let (mut tree, sv, view) = scene((20, 5));
        let handled = tree.dispatch_click(&MouseEvent::new(MouseEventType::ScrollDown, (3, 3)));
        assert!(handled);
        assert_eq!(view_pos(&tree, view), Point::new(-1, 0));
        assert!((proportion(&tree, sv) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn arrow_keys_scroll() {
        let (mut tree, sv, view) = scene((20, 20));
        tree.dispatch_press(&KeyPressEvent::from(Key::Down));
        tree.dispatch_press(&KeyPressEvent::from(Key::Right));
        assert_eq!(view_pos(&tree, view), Point::new(-1, -1));
        tree.with_widget_mut::<ScrollView, _>(sv, |sv, _| sv.arrow_keys_enabled = false);
        assert!(!tree.dispatch_press(&KeyPressEvent::from(Key::Down)));
    }

    #[test]
    fn dragging_content_scrolls() {
        let (mut tree, _, view) = scene((20, 5));
        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (5, 5)));
        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseMove, (2, 5)));
        assert_eq!(view_pos(&tree, view), Point::new(-3, 0));
        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseUp, (2, 5)));
        assert!(tree.grabbed().is_none());
    }

    #[test]
    fn clicking_vertical_bar_jumps() {
        let mut tree = WidgetTree::new();
        let sv = ScrollView::new()
            .show_horizontal_bar(false)
            .build(&mut tree, WidgetData::new().with_size((10, 10)));
        let view = tree.insert(WidgetData::new().with_size((40, 8)), Container);
        tree.add_widget(sv, view).unwrap();
        // Track of 10 rows showing 10 of 40: indicator of 2 cells, travel 8.
        tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (9, 9)));
        assert_eq!(proportion(&tree, sv), 1.0);
        assert_eq!(view_pos(&tree, view), Point::new(-30, 0));
    }

    #[test]
    fn resubscribes_after_reattach() {
        let (mut tree, sv, view) = scene((20, 5));
        let root = tree.root().unwrap();
        tree.remove_widget(root, sv).unwrap();
        tree.add_widget(root, sv).unwrap();
        ScrollView::set_vertical_proportion(&mut tree, sv, 1.0);
        tree.set_size(view, Size::new(30, 5));
        assert_eq!(view_pos(&tree, view), Point::new(-20, 0));
    }
}
