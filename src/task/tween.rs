//! Tweens: animate a widget's position and size over time.

use std::time::{Duration, Instant};

use super::easing::Easing;
use super::scheduler::{Task, TaskStatus};
use crate::geometry::{Point, Size};
use crate::tree::{WidgetId, WidgetTree};

/// Step interval of a tween, one frame at 60 fps.
pub const TWEEN_STEP: Duration = Duration::from_micros(16_667);

type Progress = Box<dyn FnMut(&mut WidgetTree, WidgetId, f64)>;
type Complete = Box<dyn FnOnce(&mut WidgetTree, WidgetId)>;

/// Interpolates the owner's position and/or size toward targets.
///
/// Start values are read from the owner on the first step. Every step
/// applies `easing` to the elapsed fraction, sets the interpolated
/// geometry, then calls `on_progress` with the eased value. After the
/// last step the targets are exact and `on_complete` runs.
///
/// ```ignore
/// let tween = Tween::new(Duration::from_millis(300))
///     .with_easing(Easing::OutBounce)
///     .to_pos(Point::new(0, 20));
/// tree.spawn(id, tween, Instant::now());
/// ```
pub struct Tween {
    duration: Duration,
    easing: Easing,
    target_pos: Option<Point>,
    target_size: Option<Size>,
    start: Option<(Instant, Point, Size)>,
    on_progress: Option<Progress>,
    on_complete: Option<Complete>,
}

impl Tween {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
            target_pos: None,
            target_size: None,
            start: None,
            on_progress: None,
            on_complete: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn to_pos(mut self, pos: impl Into<Point>) -> Self {
        self.target_pos = Some(pos.into());
        self
    }

    pub fn to_size(mut self, size: impl Into<Size>) -> Self {
        self.target_size = Some(size.into());
        self
    }

    pub fn on_progress(mut self, f: impl FnMut(&mut WidgetTree, WidgetId, f64) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&mut WidgetTree, WidgetId) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

fn lerp(from: i32, to: i32, p: f64) -> i32 {
    from + ((to - from) as f64 * p).round_ties_even() as i32
}

impl Task for Tween {
    fn step(&mut self, tree: &mut WidgetTree, owner: WidgetId, now: Instant) -> TaskStatus {
        let Some(data) = tree.data(owner) else {
            return TaskStatus::Done;
        };
        let (started, from_pos, from_size) =
            *self.start.get_or_insert((now, data.pos, data.size));

        let t = if self.duration.is_zero() {
            1.0
        } else {
            now.saturating_duration_since(started).as_secs_f64() / self.duration.as_secs_f64()
        };
        let finished = t >= 1.0;
        let p = if finished { 1.0 } else { self.easing.apply(t) };

        if let Some(to) = self.target_pos {
            tree.set_pos(owner, Point::new(lerp(from_pos.y, to.y, p), lerp(from_pos.x, to.x, p)));
        }
        if let Some(to) = self.target_size {
            tree.set_size(
                owner,
                Size::new(
                    lerp(from_size.height, to.height, p),
                    lerp(from_size.width, to.width, p),
                ),
            );
        }
        if let Some(progress) = self.on_progress.as_mut() {
            progress(tree, owner, p);
        }

        if finished {
            if let Some(complete) = self.on_complete.take() {
                complete(tree, owner);
            }
            TaskStatus::Done
        } else {
            TaskStatus::Yield(TWEEN_STEP)
        }
    }
}
