//! Scheduled revalidation queue
//!
//! Two kinds of deferred work, both idempotent:
//! - `defer`: due at the current instant, runs on the next tick
//! - `debounce`: due after a window; rescheduling the same task replaces
//!   the pending one so bursts coalesce into a single pass
//!
//! Time is virtual. Callers move the clock with `advance`.

use std::time::Duration;

use crate::model::ContentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Apply the validation rule for the node's access, then revalidate
    Validate(ContentId),
    /// Recompute validity only
    Revalidate(ContentId),
}

impl Task {
    #[inline]
    pub fn content_id(&self) -> ContentId {
        match *self {
            Task::Validate(id) | Task::Revalidate(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run on the next tick. A task already pending is kept as is.
    pub fn defer(&mut self, task: Task) {
        if self.pending.iter().any(|p| p.task == task && p.due <= self.now) {
            return;
        }
        self.push(self.now, task);
    }

    /// Run once `window` has passed without another call for `task`
    pub fn debounce(&mut self, task: Task, window: Duration) {
        self.pending.retain(|p| p.task != task);
        self.push(self.now + window, task);
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Remove and return every due task, earliest first
    pub fn drain_due(&mut self) -> Vec<Task> {
        let now = self.now;
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Due instant of the last pending task
    pub fn horizon(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).max()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn push(&mut self, due: Duration, task: Task) {
        self.seq += 1;
        self.pending.push(Pending { due, seq: self.seq, task });
    }
}
