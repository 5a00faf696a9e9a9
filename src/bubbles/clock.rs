//! Deterministic task clock.
//!
//! The clock never reads wall time. Callers push it forward with
//! [`TaskClock::pop_due`] / [`TaskClock::settle`] from whatever drives them
//! (the frame loop in the app, plain method calls in tests). Cancelling a task
//! removes it immediately, so a cancelled task can never fire afterwards.
//!
//! There is at most one repeating task. When it fires it is disarmed until the
//! caller re-arms it with the next delay, which lets every period be redrawn.

use std::collections::HashMap;
use std::time::Duration;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due.
#[derive(Debug, PartialEq)]
pub enum Due<T> {
    Repeating(TaskId),
    Once(TaskId, T),
}

#[derive(Debug)]
struct RepeatingTask {
    id: TaskId,
    /// `None` while fired and waiting to be re-armed.
    due: Option<Duration>,
}

#[derive(Debug)]
pub struct TaskClock<T> {
    now: Duration,
    next_id: u64,
    repeating: Option<RepeatingTask>,
    once: HashMap<TaskId, (Duration, T)>,
}

impl<T> Default for TaskClock<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            repeating: None,
            once: HashMap::new(),
        }
    }
}

impl<T> TaskClock<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    fn allocate(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Start the repeating task, replacing any previous one.
    pub fn schedule_repeating(&mut self, first_delay: Duration) -> TaskId {
        let id = self.allocate();
        self.repeating = Some(RepeatingTask {
            id,
            due: Some(self.now + first_delay),
        });
        id
    }

    /// Re-arm the repeating task after it fired. Ignored if `id` was cancelled
    /// or replaced in the meantime.
    pub fn rearm(&mut self, id: TaskId, delay: Duration) {
        let now = self.now;
        if let Some(task) = self.repeating.as_mut().filter(|task| task.id == id) {
            task.due = Some(now + delay);
        }
    }

    pub fn cancel_repeating(&mut self) -> bool {
        self.repeating.take().is_some()
    }

    pub fn has_repeating(&self) -> bool {
        self.repeating.is_some()
    }

    /// Time until the repeating task fires, if it is armed.
    pub fn repeating_due_in(&self) -> Option<Duration> {
        self.repeating
            .as_ref()
            .and_then(|task| task.due)
            .map(|due| due.saturating_sub(self.now))
    }

    pub fn schedule_once(&mut self, delay: Duration, payload: T) -> TaskId {
        let id = self.allocate();
        self.once.insert(id, (self.now + delay, payload));
        id
    }

    /// Cancel every pending one-shot task. Returns how many were dropped.
    pub fn cancel_all_once(&mut self) -> usize {
        let count = self.once.len();
        self.once.clear();
        count
    }

    /// Pop the earliest task due at or before `until` and move the clock to
    /// its due time. The repeating task wins ties; one-shots tie-break by
    /// scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<Due<T>> {
        let repeating_due = self
            .repeating
            .as_ref()
            .and_then(|task| task.due.map(|due| (due, task.id)))
            .filter(|(due, _)| *due <= until);

        let once_due = self
            .once
            .iter()
            .filter(|(_, (due, _))| *due <= until)
            .map(|(id, (due, _))| (*due, *id))
            .min();

        match (repeating_due, once_due) {
            (Some((due, id)), Some((once_at, _))) if due <= once_at => self.fire_repeating(due, id),
            (Some((due, id)), None) => self.fire_repeating(due, id),
            (_, Some((due, id))) => {
                let (_, payload) = self.once.remove(&id)?;
                self.now = self.now.max(due);
                Some(Due::Once(id, payload))
            }
            (None, None) => None,
        }
    }

    fn fire_repeating(&mut self, due: Duration, id: TaskId) -> Option<Due<T>> {
        if let Some(task) = self.repeating.as_mut() {
            task.due = None;
        }
        self.now = self.now.max(due);
        Some(Due::Repeating(id))
    }

    /// Move the clock to `until` once nothing else is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
