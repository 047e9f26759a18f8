//! One-shot deferred timer engine.
//!
//! Every piece of delayed work in the controller (the post-activation flow
//! check, the moisture re-read, watering-schedule edges) is a one-shot
//! entry in a [`TimerQueue`]. The queue keeps its own virtual monotonic
//! clock: the main loop feeds it real elapsed time, tests feed it whatever
//! they like, so firing is fully deterministic.
//!
//! ```text
//!   schedule(delay, task) ──▶ ┌────────────┐ ──▶ pop_due(deadline) ──▶ owner runs task
//!   cancel(handle)        ──▶ │ TimerQueue │
//!                             └────────────┘
//! ```
//!
//! Entries fire once, earliest first; entries due at the same instant fire
//! in the order they were scheduled. Popping an entry moves the clock to
//! its due time, so anything the owner schedules while handling it is
//! measured from the firing instant rather than from the end of the
//! current advance.
//!
//! The queue grows on demand: every `turn_on` owes its caller a check, so
//! scheduling never fails.

use core::time::Duration;

use log::debug;

/// Identifies one scheduled timer. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// A timer that has come due, handed back to the owner to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    /// Virtual time the timer was due at.
    pub at: Duration,
    pub task: T,
}

/// Internal bookkeeping for a pending timer.
#[derive(Debug, Clone)]
struct TimerEntry<T> {
    handle: TimerHandle,
    due_ms: u64,
    task: T,
}

/// The timer engine.
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    now_ms: u64,
    next_id: u64,
}

fn to_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            now_ms: 0,
            next_id: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms)
    }

    /// Schedule `task` to fire once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        let due_ms = self.now_ms.saturating_add(to_ms(delay));
        self.entries.push(TimerEntry {
            handle,
            due_ms,
            task,
        });
        self.next_id += 1;
        debug!(
            "Scheduler: timer {} armed for t={}ms ({}ms from now)",
            handle.0,
            due_ms,
            due_ms - self.now_ms
        );
        handle
    }

    /// Drop a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(i) => {
                self.entries.swap_remove(i);
                debug!("Scheduler: timer {} cancelled", handle.0);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer whose task matches `pred`. Returns how
    /// many were dropped.
    pub fn cancel_matching(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.task));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Scheduler: {} timer(s) cancelled", dropped);
        }
        dropped
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Whether any pending timer's task matches `pred`.
    pub fn any_matching(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.entries.iter().any(|e| pred(&e.task))
    }

    /// Time left until `handle` fires, or `None` if it is not pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| Duration::from_millis(e.due_ms.saturating_sub(self.now_ms)))
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return the earliest timer due at or before `deadline`,
    /// advancing the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Fired<T>> {
        let deadline_ms = to_ms(deadline);
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= deadline_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle))
            .map(|(i, _)| i)?;

        let entry = self.entries.swap_remove(idx);
        self.now_ms = self.now_ms.max(entry.due_ms);
        debug!("Scheduler: timer {} fired at t={}ms", entry.handle.0, entry.due_ms);
        Some(Fired {
            handle: entry.handle,
            at: Duration::from_millis(entry.due_ms),
            task: entry.task,
        })
    }

    /// Move the clock forward to `deadline`. Never moves it backwards.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now_ms = self.now_ms.max(to_ms(deadline));
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
