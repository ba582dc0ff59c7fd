//! Geometry resolution: size and position hints, and the observed setters.
//!
//! A hinted dimension is `floor(hint * parent_dim)` clamped to the widget's
//! min then max; a hinted position is `round(hint * parent_dim)` (ties go to
//! the even integer) minus the anchor offset. Unhinted axes are left alone.
//! Resizing happens before repositioning, and resolution always descends
//! into the children.

use super::arena::WidgetTree;
use super::node::{WidgetData, WidgetId};
use super::observe::Attr;
use crate::geometry::{Point, PosHint, Size, SizeHint};

/// The size `data` should have inside a parent of `parent` size.
pub fn resolve_size(data: &WidgetData, parent: Size) -> Size {
    let height = match data.size_hint.height() {
        Some(h) => data.clamp_height((h * parent.height as f64) as i32),
        None => data.size.height,
    };
    let width = match data.size_hint.width() {
        Some(w) => data.clamp_width((w * parent.width as f64) as i32),
        None => data.size.width,
    };
    Size::new(height, width)
}

/// The position a widget of `size` should have inside a parent of `parent` size.
pub fn resolve_pos(data: &WidgetData, size: Size, parent: Size) -> Point {
    let anchor = data.anchor.offset(size);
    let y = match data.pos_hint.y() {
        Some(h) => (h * parent.height as f64).round_ties_even() as i32 - anchor.y,
        None => data.pos.y,
    };
    let x = match data.pos_hint.x() {
        Some(h) => (h * parent.width as f64).round_ties_even() as i32 - anchor.x,
        None => data.pos.x,
    };
    Point::new(y, x)
}

impl WidgetTree {
    /// Re-apply hints against the parent's current size, then resolve the
    /// whole subtree. Detached widgets only resolve their children.
    pub fn update_geometry(&mut self, id: WidgetId) {
        let resized = match self.parent(id).and_then(|p| self.data(p)).map(|d| d.size) {
            Some(parent_size) => {
                let Some(data) = self.data(id) else {
                    return;
                };
                let size = resolve_size(data, parent_size);
                let resized = self.set_size(id, size);
                if let Some(data) = self.data(id) {
                    let pos = resolve_pos(data, data.size, parent_size);
                    self.set_pos(id, pos);
                }
                resized
            }
            None => false,
        };
        // set_size already resolved the children.
        if !resized {
            self.update_children(id);
        }
    }

    fn update_children(&mut self, id: WidgetId) {
        for child in self.children(id).to_vec() {
            self.update_geometry(child);
        }
    }

    /// Move a widget. Notifies [`Attr::Pos`] subscribers if it changed.
    pub fn set_pos(&mut self, id: WidgetId, pos: Point) -> bool {
        let Some(data) = self.data_mut(id) else {
            return false;
        };
        if data.pos == pos {
            return false;
        }
        data.pos = pos;
        self.notify(id, Attr::Pos);
        true
    }

    /// Resize a widget. Negative dimensions are clamped to zero.
    ///
    /// On change: [`Attr::Size`] subscribers run, then the widget's
    /// `on_size`, then every child is re-resolved. Returns whether the size
    /// changed.
    pub fn set_size(&mut self, id: WidgetId, size: Size) -> bool {
        let size = Size::new(size.height.max(0), size.width.max(0));
        let Some(data) = self.data_mut(id) else {
            return false;
        };
        if data.size == size {
            return false;
        }
        data.size = size;
        self.notify(id, Attr::Size);
        self.call_hook(id, (), |w, cx| w.on_size(cx));
        self.update_children(id);
        true
    }

    pub fn set_size_hint(&mut self, id: WidgetId, hint: SizeHint) {
        let Some(data) = self.data_mut(id) else {
            return;
        };
        data.size_hint = hint;
        self.notify(id, Attr::SizeHint);
        self.update_geometry(id);
    }

    pub fn set_pos_hint(&mut self, id: WidgetId, hint: PosHint) {
        let Some(data) = self.data_mut(id) else {
            return;
        };
        data.pos_hint = hint;
        self.notify(id, Attr::PosHint);
        self.update_geometry(id);
    }

    pub fn set_transparent(&mut self, id: WidgetId, transparent: bool) {
        self.set_flag(id, Attr::IsTransparent, |d| &mut d.is_transparent, transparent);
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        self.set_flag(id, Attr::IsVisible, |d| &mut d.is_visible, visible);
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        self.set_flag(id, Attr::IsEnabled, |d| &mut d.is_enabled, enabled);
    }

    fn set_flag(
        &mut self,
        id: WidgetId,
        attr: Attr,
        field: impl FnOnce(&mut WidgetData) -> &mut bool,
        value: bool,
    ) {
        let Some(data) = self.data_mut(id) else {
            return;
        };
        let flag = field(data);
        if *flag != value {
            *flag = value;
            self.notify(id, attr);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Anchor;
    use crate::widgets::Container;

    fn hinted(h: Option<f64>, w: Option<f64>) -> WidgetData {
        WidgetData::new().with_size_hint(SizeHint::new(h, w).unwrap())
    }

    #[test]
    fn size_hint_floors() {
        let data = hinted(Some(0.5), Some(0.3));
        assert_eq!(resolve_size(&data, Size::new(11, 10)), Size::new(5, 3));
    }

    #[test]
    fn size_hint_none_keeps_dimension() {
        let data = hinted(None, Some(1.0)).with_size((7, 2));
        assert_eq!(resolve_size(&data, Size::new(20, 40)), Size::new(7, 40));
    }

    #[test]
    fn size_hint_clamps_min_then_max() {
        let data = hinted(Some(0.1), Some(1.0))
            .with_height_bounds(Some(4), None)
            .with_width_bounds(Some(2), Some(8));
        assert_eq!(resolve_size(&data, Size::new(10, 30)), Size::new(4, 8));
    }

    #[test]
    fn pos_hint_subtracts_anchor() {
        let data = WidgetData::new()
            .with_pos_hint(PosHint::CENTER)
            .with_anchor(Anchor::Center);
        assert_eq!(resolve_pos(&data, Size::new(4, 6), Size::new(10, 20)), Point::new(3, 7));

        let data = data.with_anchor(Anchor::BottomRight);
        assert_eq!(resolve_pos(&data, Size::new(4, 6), Size::new(10, 20)), Point::new(1, 4));
    }

    #[test]
    fn pos_hint_rounds_half_to_even() {
        let data = WidgetData::new().with_pos_hint(PosHint::new(Some(0.25), None).unwrap()).with_pos((0, 9));
        assert_eq!(resolve_pos(&data, Size::ZERO, Size::new(10, 10)), Point::new(2, 9));

        let data = data.with_pos_hint(PosHint::new(Some(0.75), None).unwrap());
        assert_eq!(resolve_pos(&data, Size::ZERO, Size::new(10, 10)), Point::new(8, 9));
    }

    #[test]
    fn centered_cell_in_odd_parent() {
        let data = WidgetData::new()
            .with_pos_hint(PosHint::CENTER)
            .with_anchor(Anchor::Center);
        assert_eq!(resolve_pos(&data, Size::new(1, 1), Size::new(5, 5)), Point::new(2, 2));

        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((5, 5)), Container);
        let cell = tree.insert(WidgetData::new().with_size((1, 1)).auto_position(), Container);
        tree.add_widget(root, cell).unwrap();
        assert_eq!(tree.data(cell).unwrap().pos, Point::new(2, 2));
    }

    #[test]
    fn resize_propagates_to_grandchildren() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((10, 10)), Container);
        let child = tree.insert(hinted(Some(0.5), Some(0.5)), Container);
        let grandchild = tree.insert(
            hinted(Some(1.0), None).with_size((0, 3)).with_pos_hint(PosHint::new(None, Some(0.5)).unwrap()),
            Container,
        );
        tree.add_widget(root, child).unwrap();
        tree.add_widget(child, grandchild).unwrap();
        assert_eq!(tree.data(grandchild).unwrap().size, Size::new(5, 3));

        tree.set_size(root, Size::new(20, 40));
        assert_eq!(tree.data(child).unwrap().size, Size::new(10, 20));
        assert_eq!(tree.data(grandchild).unwrap().size, Size::new(10, 3));
        assert_eq!(tree.data(grandchild).unwrap().pos, Point::new(0, 10));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((17, 23)), Container);
        let child = tree.insert(
            hinted(Some(0.37), Some(0.81)).auto_position(),
            Container,
        );
        tree.add_widget(root, child).unwrap();
        let first = tree.data(child).unwrap().clone();
        tree.update_geometry(child);
        tree.update_geometry(child);
        let second = tree.data(child).unwrap();
        assert_eq!(first.size, second.size);
        assert_eq!(first.pos, second.pos);
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new(), Container);
        tree.set_size(root, Size::new(-3, 4));
        assert_eq!(tree.data(root).unwrap().size, Size::new(0, 4));
    }

    #[test]
    fn flag_setters_update_data() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new(), Container);
        tree.set_enabled(root, false);
        tree.set_visible(root, false);
        tree.set_transparent(root, true);
        let data = tree.data(root).unwrap();
        assert!(!data.is_enabled && !data.is_visible && data.is_transparent);
    }
}
