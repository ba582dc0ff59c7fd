//! Integration tests for quilt-tui.
//!
//! These tests exercise the public API from outside the crate, verifying that
//! the tree, render pipeline, dispatcher, widgets and app work together.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use quilt_tui::color::{Color, ColorPair, WHITE_ON_BLACK};
use quilt_tui::event::input::{Key, MouseEvent, MouseEventType};
use quilt_tui::geometry::{Point, PosHint, Region, Size, SizeHint};
use quilt_tui::render::{render, Canvas};
use quilt_tui::testing::{canvas_to_string, render_to_string, Pilot};
use quilt_tui::tree::WidgetContext;
use quilt_tui::widgets::*;
use quilt_tui::{AppConfig, Error, Widget, WidgetData, WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Log = Rc<RefCell<Vec<&'static str>>>;

/// Logs every click it receives and accepts it if `accept` is set.
struct Recorder {
    name: &'static str,
    accept: bool,
    log: Log,
}

impl Widget for Recorder {
    fn widget_type(&self) -> &'static str {
        "Recorder"
    }

    fn on_click(&mut self, cx: &mut WidgetContext<'_>, event: &MouseEvent) -> bool {
        if !cx.collides_point(event.position) {
            return false;
        }
        self.log.borrow_mut().push(self.name);
        self.accept
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn filled(ch: char, pos: (i32, i32), size: (i32, i32)) -> WidgetData {
    WidgetData::new()
        .with_pos(pos)
        .with_size(size)
        .with_background_char(ch)
}

fn root(tree: &mut WidgetTree, size: (i32, i32)) -> WidgetId {
    tree.insert(WidgetData::new().with_size(size), Container)
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn hint_resolution_is_idempotent() {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (17, 33));
    let child = tree.insert(
        WidgetData::new()
            .with_size_hint(SizeHint::new(Some(0.3), Some(0.7)).unwrap())
            .with_pos_hint(PosHint::CENTER),
        Container,
    );
    tree.add_widget(root, child).unwrap();
    let region = |tree: &WidgetTree| {
        let data = tree.data(child).unwrap();
        Region::from_parts(data.pos, data.size)
    };
    let first = region(&tree);

    tree.update_geometry(child);
    tree.update_geometry(child);
    assert_eq!(region(&tree), first);
    assert_eq!(first.size(), Size::new(5, 23));
}

#[test]
fn invalid_hints_are_rejected() {
    assert!(matches!(
        SizeHint::new(Some(0.0), None),
        Err(Error::InvalidHint { .. })
    ));
    assert!(matches!(
        SizeHint::new(None, Some(1.5)),
        Err(Error::InvalidHint { .. })
    ));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn render_only_writes_inside_requested_region() {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (3, 6));
    let a = tree.insert(filled('a', (0, 0), (3, 6)), Container);
    tree.add_widget(root, a).unwrap();

    let mut canvas = Canvas::new(Size::new(3, 6), '.', WHITE_ON_BLACK);
    render(&tree, &mut canvas, Region::new(1, 2, 1, 3));
    assert_eq!(canvas_to_string(&canvas), "......\n..aaa.\n......");
}

#[test]
fn topmost_sibling_wins() {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (2, 5));
    let below = tree.insert(filled('b', (0, 0), (2, 4)), Container);
    let above = tree.insert(filled('t', (1, 2), (1, 3)), Container);
    tree.add_widgets(root, &[below, above]).unwrap();
    assert_eq!(render_to_string(&tree, Size::new(2, 5)), "bbbb\nbbttt");

    tree.pull_to_front(below);
    assert_eq!(render_to_string(&tree, Size::new(2, 5)), "bbbb\nbbbbt");
}

#[test]
fn disabled_and_hidden_subtrees_are_skipped() {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (1, 4));
    let parent = tree.insert(filled('p', (0, 0), (1, 2)), Container);
    let child = tree.insert(filled('c', (0, 1), (1, 1)), Container);
    let hidden = tree.insert(filled('h', (0, 2), (1, 2)), Container);
    tree.add_widget(root, parent).unwrap();
    tree.add_widget(parent, child).unwrap();
    tree.add_widget(root, hidden).unwrap();
    assert_eq!(render_to_string(&tree, Size::new(1, 4)), "pchh");

    tree.set_enabled(parent, false);
    tree.set_visible(hidden, false);
    assert_eq!(render_to_string(&tree, Size::new(1, 4)), "");
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_stops_at_first_handler() {
    let log = Log::default();
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (4, 4));
    let recorder = |name, accept| Recorder { name, accept, log: Rc::clone(&log) };
    let bottom = tree.insert(WidgetData::new().with_size((4, 4)), recorder("bottom", true));
    let middle = tree.insert(WidgetData::new().with_size((4, 4)), recorder("middle", true));
    let top = tree.insert(WidgetData::new().with_size((4, 4)), recorder("top", false));
    tree.add_widgets(root, &[bottom, middle, top]).unwrap();

    assert!(tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (1, 1))));
    assert_eq!(*log.borrow(), vec!["top", "middle"]);
}

#[test]
fn disabled_widgets_receive_nothing() {
    let log = Log::default();
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (4, 4));
    let parent = tree.insert(WidgetData::new().with_size((4, 4)), Container);
    let child = tree.insert(
        WidgetData::new().with_size((4, 4)),
        Recorder { name: "child", accept: true, log: Rc::clone(&log) },
    );
    tree.add_widget(root, parent).unwrap();
    tree.add_widget(parent, child).unwrap();
    tree.set_enabled(parent, false);

    assert!(!tree.dispatch_click(&MouseEvent::new(MouseEventType::MouseDown, (1, 1))));
    assert!(log.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// ScrollView
// ---------------------------------------------------------------------------

fn scroll_scene() -> (WidgetTree, WidgetId, WidgetId) {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (20, 20));
    let sv = ScrollView::new()
        .show_horizontal_bar(false)
        .build(&mut tree, WidgetData::new().with_size((10, 10)));
    tree.add_widget(root, sv).unwrap();
    let view = tree.insert(WidgetData::new().with_size((20, 5)), Container);
    tree.add_widget(sv, view).unwrap();
    (tree, sv, view)
}

#[test]
fn scroll_to_half_moves_view_up_five_rows() {
    let (mut tree, sv, view) = scroll_scene();
    let distance = tree.widget::<ScrollView>(sv).unwrap().total_vertical_distance(&tree, sv);
    assert_eq!(distance, 10);

    ScrollView::set_vertical_proportion(&mut tree, sv, 0.5);
    assert_eq!(tree.data(view).unwrap().pos.y, -5);
}

#[test]
fn scroll_proportion_stays_in_unit_range() {
    let (mut tree, sv, view) = scroll_scene();
    for p in [-2.0, 0.25, 7.0] {
        ScrollView::set_vertical_proportion(&mut tree, sv, p);
        let proportion = tree.widget::<ScrollView>(sv).unwrap().vertical_proportion();
        assert!((0.0..=1.0).contains(&proportion));
    }
    assert_eq!(tree.data(view).unwrap().pos.y, -10);
}

#[test]
fn scroll_view_holds_a_single_child() {
    let (mut tree, sv, _) = scroll_scene();
    let other = tree.insert(WidgetData::new(), Container);
    assert!(matches!(tree.add_widget(sv, other), Err(Error::SlotOccupied(_))));
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[test]
fn hex_colors_parse() {
    assert_eq!(Color::from_hex("1e1ea8").unwrap(), Color::new(30, 30, 168));
    assert!(matches!(Color::from_hex("1e1ea"), Err(Error::InvalidHexColor(_))));
}

// ---------------------------------------------------------------------------
// Slider
// ---------------------------------------------------------------------------

#[test]
fn slider_half_way() {
    let mut tree = WidgetTree::new();
    let root = root(&mut tree, (1, 20));
    let slider = Slider::new(0.0, 10.0)
        .unwrap()
        .with_proportion(0.5)
        .build(&mut tree, WidgetData::new().with_size((1, 20)));
    tree.add_widget(root, slider).unwrap();

    let widget = tree.widget::<Slider>(slider).unwrap();
    assert_eq!(widget.value(), 5.0);
    let handle = widget.handle().unwrap();
    assert_eq!(tree.data(handle).unwrap().pos.x, 10);

    let mut canvas = Canvas::new(Size::new(1, 20), ' ', WHITE_ON_BLACK);
    render(&tree, &mut canvas, Region::new(0, 0, 1, 20));
    let fill = |x| canvas.colors_at(Point::new(0, x)).map(|c: ColorPair| c.fg);
    assert_eq!(fill(0), fill(9));
    assert_ne!(fill(9), fill(11));
}

#[test]
fn slider_rejects_empty_range() {
    assert!(matches!(Slider::new(3.0, 3.0), Err(Error::InvalidRange { .. })));
}

// ---------------------------------------------------------------------------
// Pilot end-to-end
// ---------------------------------------------------------------------------

#[test]
fn pilot_drags_window_by_title_bar() {
    let mut pilot = Pilot::new((30, 60));
    let window = Window::new("Title").build(
        pilot.tree_mut(),
        WidgetData::new().with_pos((5, 10)).with_size((10, 20)),
    );
    pilot.app_mut().add_widget(window).unwrap();

    pilot.drag((6, 15), (8, 18));
    assert_eq!(pilot.tree().data(window).unwrap().pos, Point::new(7, 13));
    assert_eq!(pilot.tree().focused(), Some(window));
}

#[test]
fn pilot_slider_drag_updates_value() {
    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&values);
    let mut pilot = Pilot::new((1, 11));
    let slider = Slider::new(0.0, 10.0)
        .unwrap()
        .on_change(move |v| sink.borrow_mut().push(v))
        .build(pilot.tree_mut(), WidgetData::new().with_size((1, 11)));
    pilot.app_mut().add_widget(slider).unwrap();

    pilot.drag((0, 0), (0, 10));
    let value = pilot.tree().widget::<Slider>(slider).unwrap().value();
    assert!((value - 10.0).abs() < 1e-9, "value was {value}");
    assert!(values.borrow().len() >= 2);
}

#[test]
fn pilot_particles_render_through_field() {
    let mut pilot = Pilot::new((2, 4));
    let field = pilot
        .tree_mut()
        .insert(WidgetData::new().with_size((2, 4)), ParticleField::<TextParticle>::new());
    pilot.app_mut().add_widget(field).unwrap();
    for (pos, ch) in [((0, 0), '*'), ((1, 3), '+')] {
        ParticleField::add_particle(pilot.tree_mut(), field, pos, TextParticle::new(ch, WHITE_ON_BLACK))
            .unwrap();
    }
    assert_eq!(pilot.render_to_string(), "*\n   +");

    let stray = pilot.tree_mut().insert(WidgetData::new(), Container);
    assert!(matches!(
        pilot.tree_mut().add_widget(field, stray),
        Err(Error::ChildTypeMismatch { .. })
    ));
}

#[test]
fn pilot_rainbow_effect_advances_with_time() {
    let mut pilot = Pilot::new((1, 1));
    let id = pilot.tree_mut().insert(WidgetData::new().with_size((1, 1)), Container);
    pilot.app_mut().add_widget(id).unwrap();
    let effect = RainbowCycleEffect::new().ncolors(4);
    let handle = effect.clone();
    let now = pilot.now();
    effect.attach(pilot.tree_mut(), id, now);

    let first = handle.current();
    pilot.advance(Duration::from_millis(100));
    assert_ne!(handle.current(), first);
}

#[test]
fn pilot_exit_key_is_configurable() {
    let mut pilot = Pilot::with_config(AppConfig::new().with_exit_key(Some(Key::Char('q'))), (2, 2));
    pilot.press_key(Key::Escape);
    assert!(pilot.is_running());
    pilot.press_key(Key::Char('q'));
    assert!(!pilot.is_running());
}
