//! Keyboard focus and the focus chain.
//!
//! At most one widget is focused. Focus moves on mouse-down (the topmost
//! enabled focusable widget under the pointer) or through the focus chain
//! with [`WidgetTree::focus_next`] / [`WidgetTree::focus_previous`].

use tracing::debug;

use crate::geometry::Point;
use crate::tree::{WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// FocusChain
// ---------------------------------------------------------------------------

/// Enabled focusable widgets in depth-first (tab) order.
///
/// The chain is a snapshot; rebuild it after the tree changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusChain {
    nodes: Vec<WidgetId>,
}

impl FocusChain {
    /// Collect the chain from the tree's root. Disabled subtrees are skipped.
    pub fn build(tree: &WidgetTree) -> Self {
        let Some(root) = tree.root() else {
            return Self::default();
        };
        let nodes = tree
            .walk(root)
            .into_iter()
            .filter(|&id| {
                tree.data(id).is_some_and(|d| d.focusable) && tree.is_effectively_enabled(id)
            })
            .collect();
        Self { nodes }
    }

    /// The widget after `current`, wrapping around. Starts at the first
    /// widget when nothing (or something outside the chain) is focused.
    pub fn next_after(&self, current: Option<WidgetId>) -> Option<WidgetId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.position(current) {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.nodes.get(next).copied()
    }

    /// The widget before `current`, wrapping around.
    pub fn previous_before(&self, current: Option<WidgetId>) -> Option<WidgetId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.position(current) {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.nodes.get(prev).copied()
    }

    fn position(&self, current: Option<WidgetId>) -> Option<usize> {
        current.and_then(|id| self.nodes.iter().position(|&n| n == id))
    }

    pub fn as_slice(&self) -> &[WidgetId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Focus on the tree
// ---------------------------------------------------------------------------

impl WidgetTree {
    /// The focused widget, if any.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Give `id` focus. The previous widget's `on_blur` runs before the new
    /// widget's `on_focus`; neither runs if `id` already has focus.
    pub fn focus(&mut self, id: WidgetId) {
        if self.focused == Some(id) || !self.contains(id) {
            return;
        }
        let previous = self.focused.replace(id);
        debug!(?id, ?previous, "focus");
        if let Some(previous) = previous {
            self.call_hook(previous, (), |w, cx| w.on_blur(cx));
        }
        self.call_hook(id, (), |w, cx| w.on_focus(cx));
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        if let Some(previous) = self.focused.take() {
            debug!(?previous, "blur");
            self.call_hook(previous, (), |w, cx| w.on_blur(cx));
        }
    }

    /// Move focus forward along the focus chain.
    pub fn focus_next(&mut self) -> Option<WidgetId> {
        let next = FocusChain::build(self).next_after(self.focused)?;
        self.focus(next);
        Some(next)
    }

    /// Move focus backward along the focus chain.
    pub fn focus_previous(&mut self) -> Option<WidgetId> {
        let prev = FocusChain::build(self).previous_before(self.focused)?;
        self.focus(prev);
        Some(prev)
    }

    /// Focus the topmost enabled focusable widget under `point`, or blur.
    pub(crate) fn focus_at(&mut self, point: Point) {
        let Some(root) = self.root() else {
            return;
        };
        let hit = self.walk(root).into_iter().rev().find(|&id| {
            self.data(id).is_some_and(|d| d.focusable)
                && self.is_effectively_enabled(id)
                && self.collides_point(id, point)
        });
        match hit {
            Some(id) => self.focus(id),
            None => self.blur(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::tree::{WidgetContext, WidgetData};
    use crate::widget::Widget;
    use crate::widgets::Container;

    struct Spy {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Widget for Spy {
        fn widget_type(&self) -> &'static str {
            "Spy"
        }
        fn on_focus(&mut self, cx: &mut WidgetContext<'_>) {
            assert!(cx.is_focused());
            self.log.borrow_mut().push(format!("focus {}", self.name));
        }
        fn on_blur(&mut self, cx: &mut WidgetContext<'_>) {
            assert!(!cx.is_focused());
            self.log.borrow_mut().push(format!("blur {}", self.name));
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn focusable(pos: (i32, i32)) -> WidgetData {
        WidgetData::new().with_pos(pos).with_size((2, 2)).focusable(true)
    }

    fn scene() -> (WidgetTree, [WidgetId; 3], Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = WidgetTree::new();
        let root = tree.insert(WidgetData::new().with_size((10, 10)), Container);
        let spy = |name| Spy { name, log: log.clone() };
        let a = tree.insert(focusable((0, 0)), spy("a"));
        let b = tree.insert(focusable((1, 1)), spy("b"));
        let c = tree.insert(focusable((5, 5)), spy("c"));
        tree.add_widgets(root, &[a, b, c]).unwrap();
        (tree, [a, b, c], log)
    }

    #[test]
    fn chain_is_depth_first_and_skips_disabled() {
        let (mut tree, [a, b, c], _) = scene();
        assert_eq!(FocusChain::build(&tree).as_slice(), &[a, b, c]);
        tree.set_enabled(b, false);
        assert_eq!(FocusChain::build(&tree).as_slice(), &[a, c]);
    }

    #[test]
    fn next_and_previous_wrap() {
        let (mut tree, [a, b, c], _) = scene();
        assert_eq!(tree.focus_next(), Some(a));
        assert_eq!(tree.focus_next(), Some(b));
        assert_eq!(tree.focus_next(), Some(c));
        assert_eq!(tree.focus_next(), Some(a));
        assert_eq!(tree.focus_previous(), Some(c));
    }

    #[test]
    fn focus_change_blurs_previous_first() {
        let (mut tree, [a, b, _], log) = scene();
        tree.focus(a);
        tree.focus(a);
        tree.focus(b);
        tree.blur();
        assert_eq!(*log.borrow(), vec!["focus a", "blur a", "focus b", "blur b"]);
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn focus_at_picks_topmost() {
        let (mut tree, [_, b, _], _) = scene();
        tree.focus_at(Point::new(1, 1));
        assert_eq!(tree.focused(), Some(b));
        tree.focus_at(Point::new(9, 0));
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn detaching_focused_widget_blurs_it() {
        let (mut tree, [a, ..], log) = scene();
        let root = tree.root().unwrap();
        tree.focus(a);
        tree.remove_widget(root, a).unwrap();
        assert_eq!(tree.focused(), None);
        assert_eq!(log.borrow().last().map(String::as_str), Some("blur a"));
    }
}
