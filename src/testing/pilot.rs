//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`] in headless mode with a virtual clock and
//! provides methods to simulate user input (keys, clicks, drags, wheel,
//! paste, resize), advance time to run widget tasks, and render the screen
//! to text for snapshot testing.

use std::time::{Duration, Instant};

use crate::app::{App, AppConfig};
use crate::event::input::{
    InputEvent, Key, KeyPressEvent, Modifiers, MouseEvent, MouseEventType, PasteEvent,
};
use crate::geometry::{Point, Size};
use crate::testing::snapshot::canvas_to_string;
use crate::tree::{WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// Time only moves when the pilot is told to: every input is stamped with the
/// virtual clock, and [`advance`](Self::advance) runs the tasks that became
/// due.
///
/// # Examples
///
/// ```ignore
/// use quilt_tui::testing::Pilot;
/// use quilt_tui::event::Key;
///
/// let mut pilot = Pilot::new((24, 80));
/// pilot.press_key(Key::Char('a'));
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    app: App,
    now: Instant,
}

impl Pilot {
    /// Create a headless app with the given terminal size and default config.
    pub fn new(size: impl Into<Size>) -> Self {
        Self::with_config(AppConfig::default(), size)
    }

    /// Create a headless app from `config`.
    pub fn with_config(config: AppConfig, size: impl Into<Size>) -> Self {
        Self {
            app: App::new_headless(config, size),
            now: Instant::now(),
        }
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.app.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.app.tree
    }

    /// The root container.
    pub fn root(&self) -> WidgetId {
        self.app.root()
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }

    /// Feed a raw input event at the current virtual time.
    pub fn send(&mut self, event: InputEvent) -> bool {
        self.app.handle_input(event, self.now)
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> bool {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, mods: Modifiers) -> bool {
        self.send(InputEvent::Key(KeyPressEvent::new(key, mods)))
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    // ── Mouse ────────────────────────────────────────────────────────

    fn mouse(&mut self, event_type: MouseEventType, pos: impl Into<Point>) -> bool {
        self.send(InputEvent::Mouse(MouseEvent::new(event_type, pos)))
    }

    /// Mouse-down at `pos`.
    pub fn mouse_down(&mut self, pos: impl Into<Point>) -> bool {
        self.mouse(MouseEventType::MouseDown, pos)
    }

    /// Mouse-up at `pos`.
    pub fn mouse_up(&mut self, pos: impl Into<Point>) -> bool {
        self.mouse(MouseEventType::MouseUp, pos)
    }

    /// Pointer motion to `pos`.
    pub fn mouse_move(&mut self, pos: impl Into<Point>) -> bool {
        self.mouse(MouseEventType::MouseMove, pos)
    }

    /// Mouse-down then mouse-up at `pos`. Returns whether the down was
    /// handled.
    pub fn click(&mut self, pos: impl Into<Point>) -> bool {
        let pos = pos.into();
        let handled = self.mouse_down(pos);
        self.mouse_up(pos);
        handled
    }

    /// Two clicks at the same instant.
    pub fn double_click(&mut self, pos: impl Into<Point>) {
        let pos = pos.into();
        self.click(pos);
        self.click(pos);
    }

    /// Three clicks at the same instant.
    pub fn triple_click(&mut self, pos: impl Into<Point>) {
        let pos = pos.into();
        for _ in 0..3 {
            self.click(pos);
        }
    }

    /// Press at `from`, move through every cell to `to` along the longer
    /// axis, release at `to`.
    pub fn drag(&mut self, from: impl Into<Point>, to: impl Into<Point>) {
        let (from, to) = (from.into(), to.into());
        self.mouse_down(from);
        let steps = (to.y - from.y).abs().max((to.x - from.x).abs());
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            let y = from.y + (f64::from(to.y - from.y) * t).round() as i32;
            let x = from.x + (f64::from(to.x - from.x) * t).round() as i32;
            self.mouse_move((y, x));
        }
        self.mouse_up(to);
    }

    /// Wheel up at `pos`.
    pub fn scroll_up(&mut self, pos: impl Into<Point>) -> bool {
        self.mouse(MouseEventType::ScrollUp, pos)
    }

    /// Wheel down at `pos`.
    pub fn scroll_down(&mut self, pos: impl Into<Point>) -> bool {
        self.mouse(MouseEventType::ScrollDown, pos)
    }

    // ── Other input ──────────────────────────────────────────────────

    pub fn paste(&mut self, text: &str) -> bool {
        self.send(InputEvent::Paste(PasteEvent::new(text)))
    }

    pub fn resize(&mut self, size: impl Into<Size>) {
        self.send(InputEvent::Resize(size.into()));
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Run the tasks due now without moving the clock.
    pub fn tick(&mut self) -> usize {
        self.app.tick(self.now)
    }

    /// Move the clock by `by` in frame-sized steps, running due tasks at
    /// each step. Returns the number of task steps.
    pub fn advance(&mut self, by: Duration) -> usize {
        let frame = self.app.config().frame_interval();
        let end = self.now + by;
        let mut steps = 0;
        while self.now < end {
            self.now = (self.now + frame).min(end);
            steps += self.app.tick(self.now);
        }
        steps
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Render a frame and return it as text.
    pub fn render_to_string(&mut self) -> String {
        canvas_to_string(self.app.render())
    }

    /// Render a frame and return one row, untrimmed.
    pub fn row(&mut self, row: i32) -> String {
        self.app.render().row_text(row)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PosHint;
    use crate::task::Tween;
    use crate::tree::WidgetData;
    use crate::tree::WidgetContext;
    use crate::widget::behaviors::Grabbable;
    use crate::widget::Widget;
    use crate::widgets::{Container, ScrollView, Slider, TextWidget};
    use pretty_assertions::assert_eq;
    use std::any::Any;

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_pilot_is_running() {
        let pilot = Pilot::new((24, 80));
        assert!(pilot.is_running());
        assert_eq!(pilot.app().size(), Size::new(24, 80));
        assert!(!pilot.app().has_driver());
    }

    #[test]
    fn escape_stops_app() {
        let mut pilot = Pilot::new((4, 4));
        pilot.type_text("abc");
        assert!(pilot.is_running());
        pilot.press_key(Key::Escape);
        assert!(!pilot.is_running());
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn renders_added_widgets() {
        let mut pilot = Pilot::with_config(AppConfig::new().with_background_char('.'), (3, 6));
        let label = pilot.tree_mut().insert(
            WidgetData::new().with_pos((1, 1)).with_size((1, 4)),
            TextWidget::new((1, 4)).with_text("quilt", 0, 0),
        );
        pilot.app_mut().add_widget(label).unwrap();
        insta::assert_snapshot!(pilot.render_to_string(), @r"
        ......
        .quil.
        ......
        ");
    }

    #[test]
    fn resize_repositions_hinted_widgets() {
        let mut pilot = Pilot::new((3, 6));
        let label = pilot.tree_mut().insert(
            WidgetData::new().with_size((1, 1)).with_pos_hint(PosHint::CENTER),
            TextWidget::new((1, 1)).with_text("x", 0, 0),
        );
        pilot.app_mut().add_widget(label).unwrap();
        pilot.resize((5, 10));
        assert_eq!(pilot.tree().data(label).unwrap().pos, Point::new(2, 5));
        assert_eq!(pilot.row(2), "     x    ");
    }

    // ── Mouse ────────────────────────────────────────────────────────

    /// Follows the pointer while grabbed.
    struct Mover;

    impl Widget for Mover {
        fn widget_type(&self) -> &'static str {
            "Mover"
        }

        fn grab_update(&mut self, cx: &mut WidgetContext<'_>, _event: &MouseEvent) {
            let pos = cx.pos() + cx.mouse_dyx();
            cx.set_pos(pos);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn drag_moves_grabbable_widget() {
        let mut pilot = Pilot::new((10, 10));
        let id = pilot.tree_mut().insert(
            WidgetData::new()
                .with_size((2, 2))
                .grabbable(Grabbable::new()),
            Mover,
        );
        pilot.app_mut().add_widget(id).unwrap();
        pilot.drag((0, 0), (3, 4));
        assert_eq!(pilot.tree().data(id).unwrap().pos, Point::new(3, 4));
        assert_eq!(pilot.tree().grabbed(), None);
    }

    #[test]
    fn wheel_scrolls_view() {
        let mut pilot = Pilot::new((10, 10));
        let sv = ScrollView::new().build(
            pilot.tree_mut(),
            WidgetData::new().with_size((10, 10)),
        );
        let view = pilot.tree_mut().insert(WidgetData::new().with_size((30, 10)), Container);
        pilot.tree_mut().add_widget(sv, view).unwrap();
        pilot.app_mut().add_widget(sv).unwrap();

        pilot.scroll_down((5, 5));
        let proportion = pilot.tree().widget::<ScrollView>(sv).unwrap().vertical_proportion();
        assert!(proportion > 0.0);
        assert!(pilot.tree().data(view).unwrap().pos.y < 0);
    }

    #[test]
    fn click_on_slider_moves_handle() {
        let mut pilot = Pilot::new((1, 21));
        let slider = Slider::new(0.0, 10.0)
            .unwrap()
            .build(pilot.tree_mut(), WidgetData::new().with_size((1, 21)));
        pilot.app_mut().add_widget(slider).unwrap();
        pilot.click((0, 10));
        let value = pilot.tree().widget::<Slider>(slider).unwrap().value();
        assert!((value - 5.0).abs() < 1e-9, "value was {value}");
    }

    // ── Time ─────────────────────────────────────────────────────────

    #[test]
    fn advance_runs_tweens() {
        let mut pilot = Pilot::new((10, 10));
        let id = pilot.tree_mut().insert(WidgetData::new().with_size((1, 1)), Container);
        pilot.app_mut().add_widget(id).unwrap();
        let now = pilot.now();
        pilot
            .tree_mut()
            .spawn(id, Tween::new(Duration::from_millis(100)).to_pos((4, 8)), now);

        assert!(pilot.advance(Duration::from_millis(50)) > 0);
        assert_ne!(pilot.tree().data(id).unwrap().pos, Point::new(4, 8));
        pilot.advance(Duration::from_millis(100));
        assert_eq!(pilot.tree().data(id).unwrap().pos, Point::new(4, 8));
    }

    #[test]
    fn advance_moves_clock() {
        let mut pilot = Pilot::new((1, 1));
        let t0 = pilot.now();
        pilot.advance(Duration::from_millis(40));
        assert_eq!(pilot.now() - t0, Duration::from_millis(40));
        assert_eq!(pilot.tick(), 0);
    }
}
