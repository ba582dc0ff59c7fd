//! Property subscriptions: run a callback when a widget attribute changes.
//!
//! Subscriptions are keyed by `(source, attribute)` and owned by a widget.
//! Setters on [`WidgetTree`] call [`WidgetTree::notify`] at every mutation
//! site; there is no implicit change tracking.

use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use super::arena::WidgetTree;
use super::node::WidgetId;

new_key_type! {
    /// Handle returned by [`WidgetTree::subscribe`].
    pub struct SubscriptionId;
}

/// Observable widget attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Pos,
    Size,
    SizeHint,
    PosHint,
    IsTransparent,
    IsVisible,
    IsEnabled,
}

/// Callback run with the tree and the id of the widget that changed.
pub type Callback = Rc<dyn Fn(&mut WidgetTree, WidgetId)>;

struct Subscription {
    source: WidgetId,
    attr: Attr,
    owner: WidgetId,
    callback: Callback,
}

/// Registry of all subscriptions in a tree.
#[derive(Default)]
pub struct Observers {
    subs: SlotMap<SubscriptionId, Subscription>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("len", &self.subs.len()).finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    fn insert(&mut self, source: WidgetId, attr: Attr, owner: WidgetId, callback: Callback) -> SubscriptionId {
        self.subs.insert(Subscription { source, attr, owner, callback })
    }

    /// Remove every subscription `owner` holds on `(source, attr)`.
    fn remove_matching(&mut self, owner: WidgetId, source: WidgetId, attr: Attr) -> usize {
        let before = self.subs.len();
        self.subs
            .retain(|_, s| !(s.owner == owner && s.source == source && s.attr == attr));
        before - self.subs.len()
    }

    pub(crate) fn drop_owned_by(&mut self, owner: WidgetId) {
        self.subs.retain(|_, s| s.owner != owner);
    }

    pub(crate) fn drop_source(&mut self, source: WidgetId) {
        self.subs.retain(|_, s| s.source != source);
    }

    fn callbacks(&self, source: WidgetId, attr: Attr) -> Vec<Callback> {
        self.subs
            .values()
            .filter(|s| s.source == source && s.attr == attr)
            .map(|s| Rc::clone(&s.callback))
            .collect()
    }
}

impl WidgetTree {
    /// Run `callback` whenever `attr` of `source` changes.
    ///
    /// The subscription is dropped when `owner` is detached or destroyed, or
    /// when `source` is destroyed.
    pub fn subscribe(
        &mut self,
        source: WidgetId,
        attr: Attr,
        owner: WidgetId,
        callback: Callback,
    ) -> SubscriptionId {
        trace!(?source, ?attr, ?owner, "subscribe");
        self.observers.insert(source, attr, owner, callback)
    }

    /// Drop `owner`'s subscriptions to `(source, attr)`. Returns `true` if any existed.
    pub fn unsubscribe(&mut self, owner: WidgetId, source: WidgetId, attr: Attr) -> bool {
        self.observers.remove_matching(owner, source, attr) > 0
    }

    /// Drop a single subscription by handle.
    pub fn unsubscribe_id(&mut self, id: SubscriptionId) -> bool {
        self.observers.subs.remove(id).is_some()
    }

    /// Run every callback subscribed to `(source, attr)`.
    pub fn notify(&mut self, source: WidgetId, attr: Attr) {
        for callback in self.observers.callbacks(source, attr) {
            callback(self, source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::geometry::{Point, Size};
    use crate::tree::WidgetData;
    use crate::widgets::Container;

    fn counter_callback(count: &Rc<Cell<u32>>) -> Callback {
        let count = Rc::clone(count);
        Rc::new(move |_, _| count.set(count.get() + 1))
    }

    #[test]
    fn notify_runs_matching_callbacks_only() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(WidgetData::new(), Container);
        let b = tree.insert(WidgetData::new(), Container);
        let size_hits = Rc::new(Cell::new(0));
        let pos_hits = Rc::new(Cell::new(0));
        tree.subscribe(a, Attr::Size, b, counter_callback(&size_hits));
        tree.subscribe(a, Attr::Pos, b, counter_callback(&pos_hits));

        tree.set_size(a, Size::new(3, 3));
        tree.set_size(a, Size::new(3, 3));
        tree.set_pos(a, Point::new(1, 1));

        assert_eq!(size_hits.get(), 1);
        assert_eq!(pos_hits.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(WidgetData::new(), Container);
        let hits = Rc::new(Cell::new(0));
        tree.subscribe(a, Attr::Size, a, counter_callback(&hits));
        assert!(tree.unsubscribe(a, a, Attr::Size));
        assert!(!tree.unsubscribe(a, a, Attr::Size));
        tree.set_size(a, Size::new(1, 1));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callbacks_may_mutate_the_tree() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(WidgetData::new(), Container);
        let b = tree.insert(WidgetData::new(), Container);
        tree.subscribe(
            a,
            Attr::Size,
            b,
            Rc::new(move |tree, source| {
                let width = tree.data(source).map_or(0, |d| d.size.width);
                tree.set_pos(b, Point::new(0, width));
            }),
        );
        tree.set_size(a, Size::new(1, 7));
        assert_eq!(tree.data(b).unwrap().pos, Point::new(0, 7));
    }

    #[test]
    fn destroying_source_drops_subscriptions() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(WidgetData::new(), Container);
        let b = tree.insert(WidgetData::new(), Container);
        let id = tree.subscribe(b, Attr::Pos, a, Rc::new(|_, _| {}));
        tree.destroy(b);
        assert!(tree.observers.is_empty());
        assert!(!tree.unsubscribe_id(id));
    }
}
