//! Cooperative widget tasks.
//!
//! A [`Task`] is stepped by [`WidgetTree::run_tasks`] on the event loop and
//! yields after every step. Each task is owned by a widget and is cancelled
//! when that widget is detached or destroyed.

use std::fmt;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::tree::{WidgetId, WidgetTree};

new_key_type! {
    /// Handle returned by [`WidgetTree::spawn`].
    pub struct TaskId;
}

/// What a task wants after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Step again after the delay.
    Yield(Duration),
    Done,
}

/// A unit of background work driven by the event loop.
pub trait Task {
    fn step(&mut self, tree: &mut WidgetTree, owner: WidgetId, now: Instant) -> TaskStatus;
}

impl<F> Task for F
where
    F: FnMut(&mut WidgetTree, WidgetId, Instant) -> TaskStatus,
{
    fn step(&mut self, tree: &mut WidgetTree, owner: WidgetId, now: Instant) -> TaskStatus {
        self(tree, owner, now)
    }
}

struct Entry {
    owner: WidgetId,
    due: Instant,
    /// `None` while the task is being stepped.
    task: Option<Box<dyn Task>>,
}

/// Pending tasks and when they are next due.
#[derive(Default)]
pub struct Scheduler {
    entries: SlotMap<TaskId, Entry>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler").field("len", &self.entries.len()).finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn spawn(&mut self, owner: WidgetId, task: Box<dyn Task>, due: Instant) -> TaskId {
        self.entries.insert(Entry { owner, due, task: Some(task) })
    }

    pub(crate) fn cancel(&mut self, id: TaskId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub(crate) fn cancel_owned(&mut self, owner: WidgetId) {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.owner != owner);
        let cancelled = before - self.entries.len();
        if cancelled > 0 {
            debug!(?owner, cancelled, "tasks cancelled");
        }
    }

    /// Earliest due time of any task.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.due).min()
    }

    /// Ids of tasks due at `now`, earliest first.
    fn due(&self, now: Instant) -> Vec<TaskId> {
        let mut due: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= now && e.task.is_some())
            .map(|(id, e)| (e.due, id))
            .collect();
        due.sort_by_key(|&(at, _)| at);
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl WidgetTree {
    /// Schedule `task` for `owner`. Its first step runs on the first
    /// [`run_tasks`](Self::run_tasks) at or after `now`.
    pub fn spawn(&mut self, owner: WidgetId, task: impl Task + 'static, now: Instant) -> TaskId {
        let id = self.scheduler.spawn(owner, Box::new(task), now);
        trace!(?owner, ?id, "task spawned");
        id
    }

    pub fn cancel_task(&mut self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    pub fn next_task_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Step every task due at `now` once. Returns the number of steps run.
    ///
    /// A task cancelled by an earlier step in the same pass is skipped; one
    /// cancelled during its own step is dropped afterwards.
    pub fn run_tasks(&mut self, now: Instant) -> usize {
        let mut steps = 0;
        for id in self.scheduler.due(now) {
            let Some(entry) = self.scheduler.entries.get_mut(id) else {
                continue;
            };
            let owner = entry.owner;
            let Some(mut task) = entry.task.take() else {
                continue;
            };
            let status = task.step(self, owner, now);
            steps += 1;

            match (status, self.scheduler.entries.get_mut(id)) {
                (TaskStatus::Yield(delay), Some(entry)) => {
                    entry.due = now + delay;
                    entry.task = Some(task);
                }
                (TaskStatus::Done, Some(_)) => {
                    self.scheduler.entries.remove(id);
                    trace!(?id, "task done");
                }
                (_, None) => {}
            }
        }
        steps
    }
}
