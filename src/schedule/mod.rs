//! Cancellable delayed tasks on a virtual clock.
//!
//! The engine never sleeps and never spawns threads. Presentation pacing
//! (roll animation, bot "thinking", score reveal) is a task submitted with a
//! delay; the host moves time forward and collects whatever became due.
//!
//! Each submission returns a `TaskToken`. Cancelling a token guarantees the
//! task never fires, which is how a stale bot action is kept from mutating a
//! table that has moved on.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskToken(u64);

impl TaskToken {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    due: Duration,
    token: TaskToken,
    task: T,
}

/// Delayed task queue with an explicit clock.
///
/// Tasks fire in deadline order; equal deadlines fire in submission order.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_token: u64,
    queue: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_token: 0,
            queue: Vec::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Submit `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        let due = self.now.saturating_add(delay);
        debug!(token = token.0, due_ms = due.as_millis() as u64, "task scheduled");
        self.queue.push(Entry { due, token, task });
        token
    }

    /// Cancel a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.queue.len();
        self.queue.retain(|e| e.token != token);
        let cancelled = self.queue.len() != before;
        if cancelled {
            debug!(token = token.0, "task cancelled");
        }
        cancelled
    }

    /// Cancel everything. Returns how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    #[must_use]
    pub fn is_scheduled(&self, token: TaskToken) -> bool {
        self.queue.iter().any(|e| e.token == token)
    }

    /// Deadline of the earliest task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.iter().map(|e| e.due).min()
    }

    /// Time from now until the earliest task is due.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    /// Remove and return the earliest task due at or before `until`,
    /// moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskToken, T)> {
        let pos = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.token))
            .map(|(i, _)| i)?;

        let entry = self.queue.remove(pos);
        self.now = self.now.max(entry.due);
        Some((entry.token, entry.task))
    }

    /// Move the clock forward to `t`. Never moves backwards.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}
