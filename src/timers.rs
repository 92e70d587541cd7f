// Deterministic timer queue. The host owns the real clock and advances this one;
// nothing here sleeps or touches JS.

use crate::types::Millis;

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due: Millis,
    task: T,
}

/// Virtual clock plus the tasks waiting on it.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Millis,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        TimerQueue {
            now: Millis::default(),
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `task` to run `delay_ms` after the current clock time.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now.saturating_add(delay_ms),
            task,
        });
        id
    }

    /// Cancel a pending task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending tasks.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest task due at or before `until`, moving the clock
    /// to its due time. Ties run in scheduling order.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TimerId, T)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;

        let pending = self.pending.remove(index);
        if pending.due > self.now {
            self.now = pending.due;
        }
        Some((pending.id, pending.task))
    }

    /// Move the clock forward. Never moves it backwards.
    pub fn set_now(&mut self, now: Millis) {
        if now > self.now {
            self.now = now;
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
