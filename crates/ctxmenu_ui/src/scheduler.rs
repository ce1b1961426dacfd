//! Cancelable, keyed timers on a virtual clock.
//!
//! Hover debouncing and the deferred wheel check are the only suspended work
//! in the controller. Each task has a key; scheduling a key again replaces
//! its pending task, and tasks never run until the host advances the clock.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::tree::RowId;

/// What a scheduled task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Close another row's open submenu on the row's level.
    CloseSiblings(RowId),
    /// Open the row's submenu.
    OpenSubmenu(RowId),
    /// Close the menu after a wheel event unless it scrolled the menu itself.
    WheelCheck,
}

type Slot = (Duration, u64);

/// Timer queue ordered by deadline, then by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BTreeMap<Slot, TaskKey>,
    pending: HashMap<TaskKey, Slot>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `key` to fire after `delay`, replacing a pending task with the same key.
    pub fn schedule(&mut self, key: TaskKey, delay: Duration) {
        self.cancel(key);
        let slot = (self.now + delay, self.seq);
        self.seq += 1;
        self.queue.insert(slot, key);
        self.pending.insert(key, slot);
        tracing::trace!(?key, ?delay, "Task scheduled");
    }

    /// Cancel a pending task. Returns whether one was pending.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        match self.pending.remove(&key) {
            Some(slot) => {
                self.queue.remove(&slot);
                tracing::trace!(?key, "Task cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a task with this key is waiting to fire.
    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.pending.contains_key(&key)
    }

    /// Number of waiting tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Remove and return the earliest task that is due.
    pub fn pop_due(&mut self) -> Option<TaskKey> {
        let (&slot, &key) = self.queue.iter().next()?;
        if slot.0 > self.now {
            return None;
        }
        self.queue.remove(&slot);
        self.pending.remove(&key);
        Some(key)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(150);

    #[test]
    fn task_fires_only_after_delay() {
        let mut s = Scheduler::new();
        s.schedule(TaskKey::OpenSubmenu(RowId(1)), DELAY);
        s.advance(Duration::from_millis(149));
        assert_eq!(s.pop_due(), None);
        s.advance(Duration::from_millis(1));
        assert_eq!(s.pop_due(), Some(TaskKey::OpenSubmenu(RowId(1))));
        assert!(s.is_empty());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut s = Scheduler::new();
        s.schedule(TaskKey::CloseSiblings(RowId(1)), DELAY);
        assert!(s.cancel(TaskKey::CloseSiblings(RowId(1))));
        assert!(!s.cancel(TaskKey::CloseSiblings(RowId(1))));
        s.advance(DELAY);
        assert_eq!(s.pop_due(), None);
    }

    #[test]
    fn rescheduling_replaces_pending_task() {
        let mut s = Scheduler::new();
        s.schedule(TaskKey::WheelCheck, Duration::ZERO);
        s.advance(Duration::from_millis(10));
        s.schedule(TaskKey::WheelCheck, DELAY);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(), None);
        s.advance(DELAY);
        assert_eq!(s.pop_due(), Some(TaskKey::WheelCheck));
    }

    #[test]
    fn due_tasks_fire_in_deadline_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(TaskKey::OpenSubmenu(RowId(2)), DELAY);
        s.schedule(TaskKey::CloseSiblings(RowId(2)), DELAY);
        s.schedule(TaskKey::WheelCheck, Duration::ZERO);
        s.advance(DELAY);
        assert_eq!(s.pop_due(), Some(TaskKey::WheelCheck));
        assert_eq!(s.pop_due(), Some(TaskKey::OpenSubmenu(RowId(2))));
        assert_eq!(s.pop_due(), Some(TaskKey::CloseSiblings(RowId(2))));
        assert_eq!(s.pop_due(), None);
    }
}
