//! App struct: configuration, frame loop, input routing.
//!
//! [`App`] owns the widget tree and its root container, the canvas of the
//! current frame and the terminal driver. The `new_headless` constructor
//! allows testing without a real terminal.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use futures::{Stream, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::color::{ColorPair, WHITE_ON_BLACK};
use crate::error::Result;
use crate::event::input::{try_from_crossterm, ClickTracker, InputEvent, Key, MouseEventType};
use crate::geometry::Size;
use crate::logging;
use crate::render::{render, Canvas, Driver};
use crate::tree::{WidgetData, WidgetId, WidgetTree};
use crate::widgets::Container;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Terminal window title, set on start.
    pub title: Option<String>,
    /// Target frames per second for the render loop.
    pub fps: u32,
    /// Character filling the root container.
    pub background_char: char,
    /// Colors of the root container.
    pub background_color_pair: ColorPair,
    /// Maximum delay between the mouse-downs of a double or triple click.
    pub double_click_timeout: Duration,
    /// Key that stops the app. `None` disables it.
    pub exit_key: Option<Key>,
    /// File receiving `tracing` output. No file, no logging.
    pub log_file: Option<PathBuf>,
    /// Filter directives used when `QUILT_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            fps: 60,
            background_char: ' ',
            background_color_pair: WHITE_ON_BLACK,
            double_click_timeout: Duration::from_millis(500),
            exit_key: Some(Key::Escape),
            log_file: None,
            log_filter: "info".to_owned(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Frames per second, at least one.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_background_char(mut self, ch: char) -> Self {
        self.background_char = ch;
        self
    }

    pub fn with_background_color_pair(mut self, colors: ColorPair) -> Self {
        self.background_color_pair = colors;
        self
    }

    pub fn with_double_click_timeout(mut self, timeout: Duration) -> Self {
        self.double_click_timeout = timeout;
        self
    }

    pub fn with_exit_key(mut self, key: Option<Key>) -> Self {
        self.exit_key = key;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Delay between two frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// The root container always covers the terminal; widgets are added under it
/// with [`add_widget`](Self::add_widget). The driver is optional to support
/// headless testing.
pub struct App {
    /// The widget tree.
    pub tree: WidgetTree,
    root: WidgetId,
    /// Terminal output driver. `None` in headless mode.
    pub driver: Option<Driver>,
    config: AppConfig,
    canvas: Canvas,
    /// Last frame written to the driver; `None` forces a full redraw.
    previous: Option<Canvas>,
    clicks: ClickTracker,
    running: bool,
}

impl App {
    /// Create an app sized to the terminal, with a driver.
    ///
    /// The terminal is not touched until [`run`](Self::run).
    pub fn new(config: AppConfig) -> Result<Self> {
        let size = Driver::terminal_size()?;
        Ok(Self::build(config, size, Some(Driver::new())))
    }

    /// Create an app without a terminal.
    pub fn new_headless(config: AppConfig, size: impl Into<Size>) -> Self {
        Self::build(config, size.into(), None)
    }

    fn build(config: AppConfig, size: Size, driver: Option<Driver>) -> Self {
        let mut tree = WidgetTree::new();
        let root = tree.insert(
            WidgetData::new()
                .with_size(size)
                .with_background_char(config.background_char)
                .with_background_color_pair(config.background_color_pair),
            Container,
        );
        tree.set_root(root);
        let canvas = Canvas::new(size, config.background_char, config.background_color_pair);
        Self {
            tree,
            root,
            driver,
            clicks: ClickTracker::new(config.double_click_timeout),
            config,
            canvas,
            previous: None,
            running: true,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The root container.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.canvas.size()
    }

    /// The last rendered frame.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the loop after the current iteration.
    pub fn exit(&mut self) {
        if self.running {
            info!("exit requested");
        }
        self.running = false;
    }

    /// Add a widget under the root container.
    pub fn add_widget(&mut self, child: WidgetId) -> Result<()> {
        self.tree.add_widget(self.root, child)
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Route one input event. Returns `true` if something handled it.
    ///
    /// The exit key stops the app. Tab and BackTab move focus when no widget
    /// handles them. Mouse-downs are stamped with their click count, and
    /// double and triple clicks are dispatched after the plain click.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        trace!(?event, "input");
        match event {
            InputEvent::Key(press) => {
                if self.config.exit_key == Some(press.key) && press.mods.is_empty() {
                    self.exit();
                    return true;
                }
                if self.tree.dispatch_press(&press) {
                    return true;
                }
                match press.key {
                    Key::Tab => self.tree.focus_next().is_some(),
                    Key::BackTab => self.tree.focus_previous().is_some(),
                    _ => false,
                }
            }
            InputEvent::Mouse(mut mouse) => {
                let nclicks = self.clicks.register(&mut mouse, now);
                let handled = self.tree.dispatch_click(&mouse);
                if mouse.event_type != MouseEventType::MouseDown {
                    return handled;
                }
                match nclicks {
                    2 => self.tree.dispatch_double_click(&mouse) || handled,
                    3 => self.tree.dispatch_triple_click(&mouse) || handled,
                    _ => handled,
                }
            }
            InputEvent::Paste(paste) => self.tree.dispatch_paste(&paste),
            InputEvent::Resize(size) => {
                self.resize(size);
                true
            }
            InputEvent::FocusGained | InputEvent::FocusLost => false,
        }
    }

    /// Resize the root and recompute every widget's geometry.
    pub fn resize(&mut self, size: Size) {
        debug!(height = size.height, width = size.width, "resize");
        if !self.tree.set_size(self.root, size) {
            self.tree.update_geometry(self.root);
        }
        self.canvas = Canvas::new(size, self.config.background_char, self.config.background_color_pair);
        self.previous = None;
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Step every task due at `now`. Returns how many were stepped.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.tree.run_tasks(now)
    }

    /// Repaint the whole tree into the canvas.
    pub fn render(&mut self) -> &Canvas {
        self.canvas.fill(self.config.background_char, self.config.background_color_pair);
        let region = self.canvas.region();
        render(&self.tree, &mut self.canvas, region);
        &self.canvas
    }

    /// Write the cells that changed since the last flush to the driver.
    pub fn flush(&mut self) -> Result<()> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(());
        };
        let updates = match &self.previous {
            Some(previous) if previous.size() == self.canvas.size() => self.canvas.diff(previous),
            _ => self.canvas.all_cells(),
        };
        driver.apply_updates(&updates)?;
        driver.flush()?;
        self.previous = Some(self.canvas.clone());
        Ok(())
    }

    /// One frame: tasks, paint, flush.
    pub fn frame(&mut self, now: Instant) -> Result<()> {
        self.tick(now);
        self.render();
        self.flush()
    }

    // ── Event loop ───────────────────────────────────────────────────

    /// Install file logging if configured, take over the terminal and run
    /// until exit.
    ///
    /// The terminal is restored even if the loop fails.
    pub async fn run(&mut self) -> Result<()> {
        logging::init(&self.config)?;
        if let Some(driver) = self.driver.as_mut() {
            driver.enter()?;
            if let Some(title) = &self.config.title {
                driver.set_title(title)?;
            }
        }
        info!("app started");

        let events = EventStream::new().filter_map(|event| {
            futures::future::ready(match event {
                Ok(event) => try_from_crossterm(event).map(Ok),
                Err(err) => Some(Err(err)),
            })
        });
        let outcome = self.run_with_events(Box::pin(events)).await;

        if let Some(driver) = self.driver.as_mut() {
            driver.leave()?;
        }
        info!("app stopped");
        outcome
    }

    /// Run the loop over any event stream. Ends on exit or when the stream
    /// ends.
    pub async fn run_with_events<S>(&mut self, mut events: S) -> Result<()>
    where
        S: Stream<Item = io::Result<InputEvent>> + Unpin,
    {
        let mut frames = tokio::time::interval(self.config.frame_interval());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.running {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        self.handle_input(event, Instant::now());
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => {
                        debug!("event stream ended");
                        break;
                    }
                },
                _ = frames.tick() => self.frame(Instant::now())?,
            }
        }
        self.frame(Instant::now())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK_ON_WHITE;
    use crate::event::input::{KeyPressEvent, Modifiers, MouseEvent, PasteEvent};
    use crate::geometry::{Point, SizeHint};
    use crate::testing::snapshot::canvas_to_string;
    use crate::tree::WidgetContext;
    use crate::widget::Widget;
    use crate::widgets::TextWidget;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn headless() -> App {
        App::new_headless(AppConfig::new(), (4, 10))
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key(KeyPressEvent::from(key))
    }

    /// Records the click counts it sees.
    #[derive(Default)]
    struct Clicks(Rc<RefCell<Vec<&'static str>>>);

    impl Widget for Clicks {
        fn widget_type(&self) -> &'static str {
            "Clicks"
        }

        fn on_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
            self.0.borrow_mut().push("click");
            false
        }

        fn on_double_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
            self.0.borrow_mut().push("double");
            true
        }

        fn on_triple_click(&mut self, _cx: &mut WidgetContext<'_>, _event: &MouseEvent) -> bool {
            self.0.borrow_mut().push("triple");
            true
        }

        fn on_paste(&mut self, _cx: &mut WidgetContext<'_>, event: &PasteEvent) -> bool {
            self.0.borrow_mut().push(if event.paste == "x" { "paste" } else { "other" });
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn headless_app_no_driver() {
        let app = headless();
        assert!(!app.has_driver());
        assert!(app.is_running());
        assert_eq!(app.size(), Size::new(4, 10));
        assert_eq!(app.tree.root(), Some(app.root()));
    }

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fps, 60);
        assert_eq!(config.double_click_timeout, Duration::from_millis(500));
        assert_eq!(config.exit_key, Some(Key::Escape));
        assert!(config.log_file.is_none());
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new()
            .with_title("demo")
            .with_fps(0)
            .with_background_char('.')
            .with_exit_key(None);
        assert_eq!(config.title.as_deref(), Some("demo"));
        assert_eq!(config.fps, 1);
        assert_eq!(config.background_char, '.');
        assert!(config.exit_key.is_none());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn exit_key_stops_app() {
        let mut app = headless();
        assert!(app.handle_input(key(Key::Escape), Instant::now()));
        assert!(!app.is_running());
    }

    #[test]
    fn disabled_exit_key_is_ignored() {
        let mut app = App::new_headless(AppConfig::new().with_exit_key(None), (4, 10));
        assert!(!app.handle_input(key(Key::Escape), Instant::now()));
        assert!(app.is_running());
    }

    #[test]
    fn tab_cycles_focus() {
        let mut app = headless();
        let a = app.tree.insert(WidgetData::new().focusable(true), Container);
        let b = app.tree.insert(WidgetData::new().focusable(true), Container);
        app.add_widget(a).unwrap();
        app.add_widget(b).unwrap();

        app.handle_input(key(Key::Tab), Instant::now());
        assert_eq!(app.tree.focused(), Some(a));
        app.handle_input(key(Key::Tab), Instant::now());
        assert_eq!(app.tree.focused(), Some(b));
        app.handle_input(key(Key::BackTab), Instant::now());
        assert_eq!(app.tree.focused(), Some(a));
    }

    #[test]
    fn modified_exit_key_is_a_normal_press() {
        let mut app = headless();
        let event = InputEvent::Key(KeyPressEvent::new(Key::Escape, Modifiers::SHIFT));
        app.handle_input(event, Instant::now());
        assert!(app.is_running());
    }

    // ── Mouse and paste ──────────────────────────────────────────────

    #[test]
    fn repeated_mouse_downs_dispatch_double_and_triple() {
        let mut app = headless();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = app.tree.insert(
            WidgetData::new().with_size_hint(SizeHint::FULL),
            Clicks(Rc::clone(&log)),
        );
        app.add_widget(id).unwrap();

        let t0 = Instant::now();
        let down = || InputEvent::Mouse(MouseEvent::new(MouseEventType::MouseDown, (1, 1)));
        app.handle_input(down(), t0);
        app.handle_input(down(), t0 + Duration::from_millis(100));
        app.handle_input(down(), t0 + Duration::from_millis(200));
        assert_eq!(
            *log.borrow(),
            vec!["click", "click", "double", "click", "triple"]
        );
    }

    #[test]
    fn paste_reaches_widgets() {
        let mut app = headless();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = app.tree.insert(WidgetData::new(), Clicks(Rc::clone(&log)));
        app.add_widget(id).unwrap();
        assert!(app.handle_input(InputEvent::Paste(PasteEvent::new("x")), Instant::now()));
        assert_eq!(*log.borrow(), vec!["paste"]);
    }

    // ── Resize and render ────────────────────────────────────────────

    #[test]
    fn resize_reflows_hinted_children() {
        let mut app = headless();
        let id = app.tree.insert(
            WidgetData::new().with_size_hint(SizeHint::new(Some(0.5), Some(0.5)).unwrap()),
            Container,
        );
        app.add_widget(id).unwrap();
        assert_eq!(app.tree.data(id).unwrap().size, Size::new(2, 5));

        app.handle_input(InputEvent::Resize(Size::new(8, 20)), Instant::now());
        assert_eq!(app.size(), Size::new(8, 20));
        assert_eq!(app.tree.data(id).unwrap().size, Size::new(4, 10));
    }

    #[test]
    fn render_paints_background_and_widgets() {
        let mut app = App::new_headless(AppConfig::new().with_background_char('.'), (2, 5));
        let text = app.tree.insert(
            WidgetData::new().with_pos((1, 1)).with_size((1, 2)),
            TextWidget::new((1, 2)).with_text("hi", 0, 0),
        );
        app.add_widget(text).unwrap();
        let canvas = app.render();
        assert_eq!(canvas_to_string(canvas), ".....\n.hi..");
    }

    #[test]
    fn background_color_comes_from_config() {
        let mut app = App::new_headless(
            AppConfig::new().with_background_color_pair(BLACK_ON_WHITE),
            (1, 1),
        );
        assert_eq!(app.render().colors_at(Point::ZERO), Some(BLACK_ON_WHITE));
    }

    // ── Event loop ───────────────────────────────────────────────────

    #[test]
    fn run_with_events_stops_on_exit_key() {
        let mut app = headless();
        let events = futures::stream::iter(vec![Ok(key(Key::Char('a'))), Ok(key(Key::Escape))]);
        tokio_test::block_on(app.run_with_events(events)).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn run_with_events_ends_with_stream() {
        let mut app = App::new_headless(AppConfig::new().with_background_char('#'), (1, 3));
        tokio_test::block_on(app.run_with_events(futures::stream::empty::<io::Result<InputEvent>>())).unwrap();
        assert!(app.is_running());
        assert_eq!(canvas_to_string(app.canvas()), "###");
    }

    #[test]
    fn run_with_events_propagates_stream_errors() {
        let mut app = headless();
        let events = futures::stream::iter(vec![Err(io::Error::other("boom"))]);
        assert!(tokio_test::block_on(app.run_with_events(events)).is_err());
    }
}
