//! Post-paint effects.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::color::{rainbow_gradient, Color};
use crate::render::canvas::CanvasView;
use crate::render::Effect;
use crate::task::{Task, TaskId, TaskStatus};
use crate::tree::{WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// RainbowCycleEffect
// ---------------------------------------------------------------------------

/// Adds a color cycling through a rainbow to every painted cell.
///
/// Colors are added channel-wise with wrap-around. The effect is driven by a
/// task owned by the widget it is attached to, so it stops when the widget
/// is detached.
///
/// ```ignore
/// RainbowCycleEffect::new().foreground(true).attach(&mut tree, id, Instant::now());
/// ```
#[derive(Debug, Clone)]
pub struct RainbowCycleEffect {
    ncolors: usize,
    cycle_time: Duration,
    foreground: bool,
    background: bool,
    current: Rc<Cell<Color>>,
}

impl Default for RainbowCycleEffect {
    fn default() -> Self {
        Self {
            ncolors: 20,
            cycle_time: Duration::from_secs(1) / 12,
            foreground: false,
            background: true,
            current: Rc::new(Cell::new(Color::new(0, 0, 0))),
        }
    }
}

impl RainbowCycleEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rainbow steps, at least one.
    pub fn ncolors(mut self, n: usize) -> Self {
        self.ncolors = n.max(1);
        self
    }

    /// Delay between two colors.
    pub fn cycle_time(mut self, every: Duration) -> Self {
        self.cycle_time = every;
        self
    }

    /// Whether foreground colors are shifted.
    pub fn foreground(mut self, on: bool) -> Self {
        self.foreground = on;
        self
    }

    /// Whether background colors are shifted.
    pub fn background(mut self, on: bool) -> Self {
        self.background = on;
        self
    }

    /// The color currently being added.
    pub fn current(&self) -> Color {
        self.current.get()
    }

    /// Add the effect to `id` and start cycling at `now`.
    pub fn attach(self, tree: &mut WidgetTree, id: WidgetId, now: Instant) -> TaskId {
        let colors = rainbow_gradient(self.ncolors);
        if let Some(&first) = colors.first() {
            self.current.set(first);
        }
        let cycle = RainbowCycle {
            colors,
            index: 0,
            every: self.cycle_time,
            current: Rc::clone(&self.current),
        };
        tree.add_effect(id, self);
        tree.spawn(id, cycle, now)
    }
}

impl Effect for RainbowCycleEffect {
    fn apply(&self, view: &mut CanvasView<'_>) {
        let color = self.current.get();
        let (fg, bg) = (self.foreground, self.background);
        view.for_each_cell(|_, _, colors| {
            if fg {
                colors.fg = colors.fg.wrapping_add(color);
            }
            if bg {
                colors.bg = colors.bg.wrapping_add(color);
            }
        });
    }
}

/// Advances the shared color once per cycle.
struct RainbowCycle {
    colors: Vec<Color>,
    index: usize,
    every: Duration,
    current: Rc<Cell<Color>>,
}

impl Task for RainbowCycle {
    fn step(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, _now: Instant) -> TaskStatus {
        if self.colors.is_empty() {
            return TaskStatus::Done;
        }
        self.index = (self.index + 1) % self.colors.len();
        self.current.set(self.colors[self.index]);
        TaskStatus::Yield(self.every)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
