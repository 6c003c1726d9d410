#![forbid(unsafe_code)]

//! Host-driven time, cancellable timers, and repeating tasks.
//!
//! There is no wall clock in the engine. The host advances a
//! [`DeterministicClock`] (from `requestAnimationFrame` timestamps in the
//! browser, by hand in tests) and the engine drains whatever is due.
//!
//! Self-rescheduling `setTimeout` chains become explicit entries: a one-shot
//! entry in a [`TimerQueue`], or a [`RepeatingTask`]. Both are gated by a
//! [`CancellationToken`]; once a controller's token is cancelled none of its
//! pending work fires.
//!
//! # Invariants
//!
//! 1. [`TimerQueue::pop_due`] yields entries in `(due, insertion)` order.
//! 2. An entry whose token is cancelled is never yielded.
//! 3. A [`RepeatingTask`] fires at most once per poll; missed periods are
//!    skipped, not replayed.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Shared stop flag for one controller's pending work.
///
/// Clones observe the same flag. Single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

struct Entry<T> {
    due: Duration,
    seq: u64,
    token: CancellationToken,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest entry on top.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One-shot timers keyed by due time.
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    seq: u64,
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.heap.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `due`, unless `token` is cancelled first.
    pub fn schedule_at(&mut self, due: Duration, payload: T, token: &CancellationToken) {
        self.seq += 1;
        self.heap.push(Entry {
            due,
            seq: self.seq,
            token: token.clone(),
            payload,
        });
    }

    /// Pop the earliest live entry due at or before `now`.
    ///
    /// Returns the entry's due time alongside the payload so callers can
    /// reschedule relative to it rather than to `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        while let Some(top) = self.heap.peek() {
            if top.due > now {
                return None;
            }
            let entry = self.heap.pop()?;
            if entry.token.is_cancelled() {
                crate::trace!(due = ?entry.due, "dropping cancelled timer");
                continue;
            }
            return Some((entry.due, entry.payload));
        }
        None
    }

    /// Due time of the earliest live entry.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .map(|e| e.due)
            .min()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cancelled entry.
    pub fn purge_cancelled(&mut self) {
        self.heap.retain(|e| !e.token.is_cancelled());
    }
}

// ---------------------------------------------------------------------------
// RepeatingTask
// ---------------------------------------------------------------------------

/// A fixed-period task, the explicit form of `setInterval`.
#[derive(Debug, Clone)]
pub struct RepeatingTask {
    period: Duration,
    next_due: Duration,
    token: CancellationToken,
}

impl RepeatingTask {
    /// First firing at `start + period`.
    #[must_use]
    pub fn new(start: Duration, period: Duration, token: CancellationToken) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next_due: start.saturating_add(period),
            token,
        }
    }

    /// Whether the task fires at `now`. Fires at most once per call.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.token.is_cancelled() || now < self.next_due {
            return false;
        }
        self.next_due = self.next_due.saturating_add(self.period);
        if self.next_due <= now {
            // Host was suspended; realign instead of replaying a burst.
            self.next_due = now.saturating_add(self.period);
        }
        true
    }

    #[must_use]
    pub const fn next_due(&self) -> Duration {
        self.next_due
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
