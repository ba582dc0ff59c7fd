//! The widget arena: insert, attach, detach, destroy, walk, hit testing.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, trace};

use super::context::WidgetContext;
use super::node::{WidgetData, WidgetId};
use super::observe::Observers;
use crate::color::ColorTheme;
use crate::error::{Error, Result};
use crate::geometry::{Point, Region};
use crate::render::pipeline::Effect;
use crate::task::Scheduler;
use crate::widget::behaviors::ActiveGrab;
use crate::widget::Widget;

/// Empty slice constant for returning when a widget has no children.
const EMPTY_CHILDREN: &[WidgetId] = &[];

/// A widget's arena slot.
///
/// The boxed widget is `None` only while one of its hooks is running.
pub(crate) struct Node {
    pub(crate) data: WidgetData,
    pub(crate) widget: Option<Box<dyn Widget>>,
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// The widget tree, backed by a slotmap arena.
///
/// All widgets live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps, so edges are plain ids and there are no
/// reference cycles. Child order is paint order: the last child is topmost.
///
/// Besides structure, the tree owns everything that is keyed by widget: the
/// property subscriptions, the task scheduler, the active pointer grab, the
/// focused widget, post-paint effects and the color theme.
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, Node>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    root: Option<WidgetId>,
    pub(crate) observers: Observers,
    pub(crate) scheduler: Scheduler,
    pub(crate) grab: Option<ActiveGrab>,
    pub(crate) focused: Option<WidgetId>,
    pub(crate) effects: SecondaryMap<WidgetId, Vec<Box<dyn Effect>>>,
    pub(crate) theme: ColorTheme,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            observers: Observers::new(),
            scheduler: Scheduler::new(),
            grab: None,
            focused: None,
            effects: SecondaryMap::new(),
            theme: ColorTheme::default(),
        }
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Insert a detached widget.
    ///
    /// If no root has been set yet, this widget becomes the root.
    pub fn insert(&mut self, data: WidgetData, widget: impl Widget) -> WidgetId {
        self.insert_boxed(data, Box::new(widget))
    }

    /// Insert a detached, already boxed widget.
    pub fn insert_boxed(&mut self, data: WidgetData, widget: Box<dyn Widget>) -> WidgetId {
        let kind = widget.widget_type();
        let id = self.nodes.insert(Node { data, widget: Some(widget) });
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        trace!(?id, kind, "widget inserted");
        id
    }

    /// Attach `child` to `parent` and resolve the child's geometry.
    ///
    /// The parent's [`redirect_child`](Widget::redirect_child) is followed
    /// first, then its [`check_child`](Widget::check_child) may veto the
    /// child. On success the child is appended (topmost), hints are applied,
    /// `on_attach` runs over the child's subtree and the parent's
    /// `on_child_added` runs last. On error nothing is changed.
    pub fn add_widget(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(Error::NoSuchWidget);
        }
        if self.parent.contains_key(child) {
            return Err(Error::AlreadyAttached);
        }
        let parent = self.redirect_target(parent);
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(Error::WouldCycle);
        }
        if let Some(Some(widget)) = self.nodes.get(parent).map(|n| n.widget.as_ref()) {
            widget.check_child(self, child)?;
        }

        self.attach(parent, child);
        debug!(?parent, ?child, "widget attached");

        for id in self.walk(child) {
            self.call_hook(id, (), |w, cx| w.on_attach(cx));
        }
        self.call_hook(parent, (), |w, cx| w.on_child_added(cx, child));
        Ok(())
    }

    /// Attach several children in order.
    pub fn add_widgets(&mut self, parent: WidgetId, children: &[WidgetId]) -> Result<()> {
        for &child in children {
            self.add_widget(parent, child)?;
        }
        Ok(())
    }

    /// Attach without consulting the parent's child hooks.
    ///
    /// Composite widgets use this to wire up their own internal parts.
    pub(crate) fn attach(&mut self, parent: WidgetId, child: WidgetId) {
        self.parent.insert(child, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(child);
        }
        self.update_geometry(child);
    }

    /// Detach `child` from `parent`.
    ///
    /// Fails with [`Error::NotAChild`] if `child` is not a child of `parent`
    /// (after following `redirect_child`). Tasks and subscriptions owned by
    /// the detached subtree are dropped, and a grab or focus inside it is
    /// released.
    pub fn remove_widget(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let parent = self.redirect_target(parent);
        if self.parent(child) != Some(parent) {
            return Err(Error::NotAChild);
        }
        if let Some(Some(widget)) = self.nodes.get(parent).map(|n| n.widget.as_ref()) {
            widget.check_remove(self, child)?;
        }

        self.call_hook(parent, (), |w, cx| w.on_child_removed(cx, child));
        self.detach(child);
        debug!(?parent, ?child, "widget detached");
        Ok(())
    }

    fn detach(&mut self, child: WidgetId) {
        if let Some(parent) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != child);
            }
        }
        self.release_subtree(child);
    }

    /// Drop everything the subtree rooted at `id` holds outside the arena.
    fn release_subtree(&mut self, id: WidgetId) {
        let subtree = self.walk(id);
        for &node in &subtree {
            self.scheduler.cancel_owned(node);
            self.observers.drop_owned_by(node);
        }
        if let Some(grab) = self.grab {
            if subtree.contains(&grab.id) {
                self.ungrab();
            }
        }
        if let Some(focused) = self.focused {
            if subtree.contains(&focused) {
                self.blur();
            }
        }
    }

    /// Detach (if attached) and free a widget and all its descendants.
    ///
    /// Returns `false` if the widget did not exist.
    pub fn destroy(&mut self, id: WidgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if self.remove_widget(parent, id).is_err() {
                self.detach(id);
            }
        } else {
            self.release_subtree(id);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut queue = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            self.effects.remove(current);
            self.observers.drop_source(current);
            self.nodes.remove(current);
        }
        debug!(?id, "widget destroyed");
        true
    }

    /// Move a widget to the end of its parent's children so it paints last.
    pub fn pull_to_front(&mut self, id: WidgetId) {
        if let Some(parent) = self.parent(id) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != id);
                siblings.push(id);
            }
        }
    }

    /// Move a widget to the start of its parent's children so it paints first.
    pub fn send_to_back(&mut self, id: WidgetId) {
        if let Some(parent) = self.parent(id) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != id);
                siblings.insert(0, id);
            }
        }
    }

    fn redirect_target(&self, mut id: WidgetId) -> WidgetId {
        while let Some(next) = self
            .nodes
            .get(id)
            .and_then(|n| n.widget.as_ref())
            .and_then(|w| w.redirect_child())
        {
            if next == id || !self.contains(next) {
                break;
            }
            id = next;
        }
        id
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Get the parent of a widget, if it has one.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a widget in paint order. Returns an empty slice if
    /// the widget has no children or does not exist.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Pre-order depth-first traversal starting from `start` (paint order).
    pub fn walk(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// The current root widget, if set.
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Explicitly set the root widget.
    pub fn set_root(&mut self, id: WidgetId) {
        self.root = Some(id);
    }

    /// Number of widgets in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Immutable access to a widget's data.
    pub fn data(&self, id: WidgetId) -> Option<&WidgetData> {
        self.nodes.get(id).map(|n| &n.data)
    }

    /// Mutable access to a widget's data.
    ///
    /// Changes made through this reference are not observed; prefer the
    /// setters (`set_pos`, `set_size`, `set_enabled`, ...) which notify
    /// subscribers and re-resolve geometry.
    pub fn data_mut(&mut self, id: WidgetId) -> Option<&mut WidgetData> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    /// Borrow a widget as its concrete type.
    ///
    /// Returns `None` if the id is stale, the type does not match, or the
    /// widget is currently running a hook.
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        self.widget_dyn(id)?.as_any().downcast_ref::<W>()
    }

    /// Borrow a widget as a trait object.
    pub fn widget_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id)?.widget.as_deref()
    }

    /// Whether the widget is of concrete type `W`.
    pub fn is_widget<W: Widget>(&self, id: WidgetId) -> bool {
        self.widget::<W>(id).is_some()
    }

    /// Run `f` with mutable access to a widget of type `W` and a context over
    /// the rest of the tree.
    ///
    /// Returns `None` if the widget does not exist, is not a `W`, or is
    /// already checked out by a running hook.
    pub fn with_widget_mut<W: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut WidgetContext<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.nodes.get_mut(id)?.widget.take()?;
        let result = match widget.as_any_mut().downcast_mut::<W>() {
            Some(concrete) => {
                let mut cx = WidgetContext::new(self, id);
                Some(f(concrete, &mut cx))
            }
            None => None,
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        result
    }

    /// Run a hook on a widget, returning `default` if it cannot be reached.
    pub(crate) fn call_hook<R>(
        &mut self,
        id: WidgetId,
        default: R,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetContext<'_>) -> R,
    ) -> R {
        let Some(mut widget) = self.nodes.get_mut(id).and_then(|n| n.widget.take()) else {
            return default;
        };
        let result = {
            let mut cx = WidgetContext::new(self, id);
            f(widget.as_mut(), &mut cx)
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        result
    }

    // ── Coordinates ──────────────────────────────────────────────────

    /// Position on screen: own position plus all ancestors' positions.
    pub fn absolute_pos(&self, id: WidgetId) -> Point {
        let mut pos = self.data(id).map_or(Point::ZERO, |d| d.pos);
        for ancestor in self.ancestors(id) {
            if let Some(data) = self.data(ancestor) {
                pos = pos + data.pos;
            }
        }
        pos
    }

    /// Absolute bounding box.
    pub fn region(&self, id: WidgetId) -> Region {
        let size = self.data(id).map(|d| d.size).unwrap_or_default();
        Region::from_parts(self.absolute_pos(id), size)
    }

    /// Convert an absolute point to the widget's local coordinates.
    pub fn to_local(&self, id: WidgetId, point: Point) -> Point {
        point - self.absolute_pos(id)
    }

    /// Whether an absolute point is inside the widget and inside every ancestor.
    pub fn collides_point(&self, id: WidgetId, point: Point) -> bool {
        let Some(data) = self.data(id) else {
            return false;
        };
        if !data.size.contains(self.to_local(id, point)) {
            return false;
        }
        match self.parent(id) {
            Some(parent) => self.collides_point(parent, point),
            None => true,
        }
    }

    /// Whether the widget and all its ancestors are enabled.
    pub fn is_effectively_enabled(&self, id: WidgetId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|w| self.data(w).is_some_and(|d| d.is_enabled))
    }

    // ── Theme and effects ────────────────────────────────────────────

    pub fn theme(&self) -> &ColorTheme {
        &self.theme
    }

    /// Replace the color theme and let every widget restyle itself.
    pub fn set_theme(&mut self, theme: ColorTheme) {
        self.theme = theme;
        let ids: Vec<_> = self.nodes.keys().collect();
        for id in ids {
            self.call_hook(id, (), |w, cx| w.update_theme(cx, &theme));
        }
    }

    /// Attach a post-paint effect to a widget.
    pub fn add_effect(&mut self, id: WidgetId, effect: impl Effect + 'static) {
        if !self.contains(id) {
            return;
        }
        if let Some(list) = self.effects.entry(id) {
            list.or_default().push(Box::new(effect));
        }
    }

    pub(crate) fn effects(&self, id: WidgetId) -> &[Box<dyn Effect>] {
        self.effects.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
