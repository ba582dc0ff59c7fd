//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyPressEvent`], [`MouseEvent`], [`PasteEvent`]
//! and supporting types. Crossterm events are converted with
//! [`try_from_crossterm`] so widgets never depend on crossterm directly.
//! [`ClickTracker`] turns a stream of mouse-downs into click counts.

use std::ops::{BitAnd, BitOr};
use std::time::{Duration, Instant};

use crate::geometry::{Point, Size};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// Map a crossterm key code. Codes with no counterpart yield `None`.
    fn from_crossterm(code: crossterm::event::KeyCode) -> Option<Key> {
        use crossterm::event::KeyCode;
        Some(match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(m: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        let mut out = Modifiers::NONE;
        if m.contains(KeyModifiers::SHIFT) {
            out = out | Modifiers::SHIFT;
        }
        if m.contains(KeyModifiers::CONTROL) {
            out = out | Modifiers::CTRL;
        }
        if m.contains(KeyModifiers::ALT) {
            out = out | Modifiers::ALT;
        }
        out
    }
}

// ---------------------------------------------------------------------------
// KeyPressEvent
// ---------------------------------------------------------------------------

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPressEvent {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyPressEvent {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyPressEvent {
    fn from(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// MouseEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    /// Motion or scrolling with no button held.
    NoButton,
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(b: crossterm::event::MouseButton) -> Self {
        match b {
            crossterm::event::MouseButton::Left => MouseButton::Left,
            crossterm::event::MouseButton::Right => MouseButton::Right,
            crossterm::event::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventType {
    MouseDown,
    MouseUp,
    /// Pointer motion, with or without a button held.
    MouseMove,
    ScrollUp,
    ScrollDown,
}

/// A mouse event in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub position: Point,
    pub button: MouseButton,
    pub event_type: MouseEventType,
    pub mods: Modifiers,
    /// Click count of a mouse-down (1 to 3); 0 for every other event.
    pub nclicks: u8,
}

impl MouseEvent {
    /// A left-button event with no modifiers.
    pub fn new(event_type: MouseEventType, position: impl Into<Point>) -> Self {
        let button = match event_type {
            MouseEventType::MouseMove | MouseEventType::ScrollUp | MouseEventType::ScrollDown => {
                MouseButton::NoButton
            }
            MouseEventType::MouseDown | MouseEventType::MouseUp => MouseButton::Left,
        };
        Self {
            position: position.into(),
            button,
            event_type,
            mods: Modifiers::NONE,
            nclicks: 0,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }
}

// ---------------------------------------------------------------------------
// PasteEvent
// ---------------------------------------------------------------------------

/// Bracketed-paste text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PasteEvent {
    pub paste: String,
}

impl PasteEvent {
    pub fn new(paste: impl Into<String>) -> Self {
        Self { paste: paste.into() }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyPressEvent),
    Mouse(MouseEvent),
    Paste(PasteEvent),
    Resize(Size),
    FocusGained,
    FocusLost,
}

/// Convert a crossterm event.
///
/// Key releases and repeats, unmapped key codes and horizontal scrolling
/// yield `None`.
pub fn try_from_crossterm(event: crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::{Event, KeyEventKind, MouseEventKind};
    match event {
        Event::Key(ke) => {
            if ke.kind != KeyEventKind::Press {
                return None;
            }
            let key = Key::from_crossterm(ke.code)?;
            Some(InputEvent::Key(KeyPressEvent::new(key, ke.modifiers.into())))
        }
        Event::Mouse(me) => {
            let (event_type, button) = match me.kind {
                MouseEventKind::Down(b) => (MouseEventType::MouseDown, b.into()),
                MouseEventKind::Up(b) => (MouseEventType::MouseUp, b.into()),
                MouseEventKind::Drag(b) => (MouseEventType::MouseMove, b.into()),
                MouseEventKind::Moved => (MouseEventType::MouseMove, MouseButton::NoButton),
                MouseEventKind::ScrollUp => (MouseEventType::ScrollUp, MouseButton::NoButton),
                MouseEventKind::ScrollDown => (MouseEventType::ScrollDown, MouseButton::NoButton),
                _ => return None,
            };
            Some(InputEvent::Mouse(MouseEvent {
                position: Point::new(i32::from(me.row), i32::from(me.column)),
                button,
                event_type,
                mods: me.modifiers.into(),
                nclicks: 0,
            }))
        }
        Event::Paste(s) => Some(InputEvent::Paste(PasteEvent::new(s))),
        Event::Resize(w, h) => Some(InputEvent::Resize(Size::new(i32::from(h), i32::from(w)))),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
    }
}

impl TryFrom<crossterm::event::Event> for InputEvent {
    /// The event itself, when it has no counterpart.
    type Error = crossterm::event::Event;

    fn try_from(event: crossterm::event::Event) -> Result<Self, Self::Error> {
        try_from_crossterm(event.clone()).ok_or(event)
    }
}

// ---------------------------------------------------------------------------
// ClickTracker
// ---------------------------------------------------------------------------

/// Counts consecutive mouse-downs at the same position.
///
/// A mouse-down with the same button at the same position within `timeout`
/// of the previous one increments the count, up to 3; anything else starts
/// over at 1.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    timeout: Duration,
    last: Option<(Point, MouseButton, Instant)>,
    count: u8,
}

impl ClickTracker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, last: None, count: 0 }
    }

    /// Stamp `event.nclicks` and return it.
    pub fn register(&mut self, event: &mut MouseEvent, now: Instant) -> u8 {
        if event.event_type != MouseEventType::MouseDown {
            event.nclicks = 0;
            return 0;
        }
        let repeat = self.last.is_some_and(|(pos, button, at)| {
            pos == event.position
                && button == event.button
                && now.saturating_duration_since(at) <= self.timeout
        });
        self.count = if repeat && self.count < 3 { self.count + 1 } else { 1 };
        self.last = Some((event.position, event.button, now));
        event.nclicks = self.count;
        self.count
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event as ct;

    fn key(code: ct::KeyCode, mods: ct::KeyModifiers) -> ct::Event {
        ct::Event::Key(ct::KeyEvent::new(code, mods))
    }

    fn mouse(kind: ct::MouseEventKind, column: u16, row: u16) -> ct::Event {
        ct::Event::Mouse(ct::MouseEvent {
            kind,
            column,
            row,
            modifiers: ct::KeyModifiers::NONE,
        })
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
        assert!(Modifiers::NONE.is_empty());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn key_press_from_crossterm() {
        let event = try_from_crossterm(key(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL));
        assert_eq!(
            event,
            Some(InputEvent::Key(KeyPressEvent::new(Key::Char('c'), Modifiers::CTRL)))
        );
    }

    #[test]
    fn navigation_keys_from_crossterm() {
        for (code, expected) in [
            (ct::KeyCode::Left, Key::Left),
            (ct::KeyCode::Up, Key::Up),
            (ct::KeyCode::PageDown, Key::PageDown),
            (ct::KeyCode::BackTab, Key::BackTab),
            (ct::KeyCode::Esc, Key::Escape),
            (ct::KeyCode::F(5), Key::F(5)),
        ] {
            let event = try_from_crossterm(key(code, ct::KeyModifiers::NONE));
            assert_eq!(event, Some(InputEvent::Key(expected.into())));
        }
    }

    #[test]
    fn unmapped_keys_and_releases_are_dropped() {
        assert_eq!(try_from_crossterm(key(ct::KeyCode::CapsLock, ct::KeyModifiers::NONE)), None);
        let release = ct::Event::Key(ct::KeyEvent::new_with_kind(
            ct::KeyCode::Char('a'),
            ct::KeyModifiers::NONE,
            ct::KeyEventKind::Release,
        ));
        assert_eq!(try_from_crossterm(release), None);
    }

    // ── Mouse ────────────────────────────────────────────────────────

    #[test]
    fn mouse_down_uses_row_column_order() {
        let event = try_from_crossterm(mouse(
            ct::MouseEventKind::Down(ct::MouseButton::Right),
            10,
            5,
        ));
        let Some(InputEvent::Mouse(me)) = event else {
            panic!("expected mouse event, got {event:?}");
        };
        assert_eq!(me.position, Point::new(5, 10));
        assert_eq!(me.button, MouseButton::Right);
        assert_eq!(me.event_type, MouseEventType::MouseDown);
    }

    #[test]
    fn drag_maps_to_move_with_button() {
        let event = try_from_crossterm(mouse(
            ct::MouseEventKind::Drag(ct::MouseButton::Left),
            3,
            7,
        ));
        let Some(InputEvent::Mouse(me)) = event else {
            panic!("expected mouse event, got {event:?}");
        };
        assert_eq!(me.event_type, MouseEventType::MouseMove);
        assert_eq!(me.button, MouseButton::Left);
    }

    #[test]
    fn scroll_events() {
        let up = try_from_crossterm(mouse(ct::MouseEventKind::ScrollUp, 0, 0));
        assert!(matches!(
            up,
            Some(InputEvent::Mouse(MouseEvent { event_type: MouseEventType::ScrollUp, .. }))
        ));
        assert_eq!(try_from_crossterm(mouse(ct::MouseEventKind::ScrollLeft, 0, 0)), None);
    }

    // ── Other events ─────────────────────────────────────────────────

    #[test]
    fn resize_paste_and_focus() {
        assert_eq!(
            try_from_crossterm(ct::Event::Resize(120, 40)),
            Some(InputEvent::Resize(Size::new(40, 120)))
        );
        assert_eq!(
            try_from_crossterm(ct::Event::Paste("hello".into())),
            Some(InputEvent::Paste(PasteEvent::new("hello")))
        );
        assert_eq!(try_from_crossterm(ct::Event::FocusLost), Some(InputEvent::FocusLost));
    }

    #[test]
    fn try_from_returns_unmapped_events() {
        let resize = InputEvent::try_from(ct::Event::Resize(10, 5));
        assert_eq!(resize.ok(), Some(InputEvent::Resize(Size::new(5, 10))));

        let scroll = mouse(ct::MouseEventKind::ScrollRight, 1, 1);
        assert_eq!(InputEvent::try_from(scroll.clone()), Err(scroll));
    }

    // ── ClickTracker ─────────────────────────────────────────────────

    #[test]
    fn clicks_count_up_to_three() {
        let mut tracker = ClickTracker::new(Duration::from_millis(500));
        let t0 = Instant::now();
        let mut counts = Vec::new();
        for i in 0..4 {
            let mut event = MouseEvent::new(MouseEventType::MouseDown, (2, 3));
            counts.push(tracker.register(&mut event, t0 + Duration::from_millis(100 * i)));
            assert_eq!(event.nclicks, counts[i as usize]);
        }
        assert_eq!(counts, vec![1, 2, 3, 1]);
    }

    #[test]
    fn click_count_resets_on_timeout_or_move() {
        let mut tracker = ClickTracker::new(Duration::from_millis(500));
        let t0 = Instant::now();
        let mut down = MouseEvent::new(MouseEventType::MouseDown, (0, 0));
        tracker.register(&mut down, t0);
        assert_eq!(tracker.register(&mut down, t0 + Duration::from_secs(1)), 1);

        let mut moved = MouseEvent::new(MouseEventType::MouseDown, (0, 1));
        assert_eq!(tracker.register(&mut moved, t0 + Duration::from_millis(1100)), 1);
    }

    #[test]
    fn non_down_events_have_no_clicks() {
        let mut tracker = ClickTracker::new(Duration::from_millis(500));
        let mut up = MouseEvent::new(MouseEventType::MouseUp, (0, 0));
        assert_eq!(tracker.register(&mut up, Instant::now()), 0);
        assert_eq!(up.nclicks, 0);
    }
}
