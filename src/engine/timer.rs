// One-shot deferred timers on a virtual clock
//
// Everything runs on the simulation thread, so a timer is just a deadline
// in a queue. Callers poll `pop_due` after advancing the clock and react to
// the returned kind. `TimerSlot` keeps at most one outstanding timer per
// class by cancelling the previous handle whenever it is re-armed.

use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<K> {
    handle: TimerHandle,
    deadline: Duration,
    kind: K,
}

/// A timer that became due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub handle: TimerHandle,
    pub deadline: Duration,
    pub kind: K,
}

/// Queue of pending one-shot timers
#[derive(Debug)]
pub struct TimerQueue<K> {
    pending: Vec<Pending<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `kind` to fire at `now + delay`
    pub fn schedule(&mut self, now: Duration, delay: Duration, kind: K) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            deadline: now + delay,
            kind,
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    #[allow(dead_code)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Remove and return the earliest timer whose deadline is at or before `now`.
    /// Ties resolve in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<K>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= now)
            .min_by_key(|(_, p)| (p.deadline, p.handle))
            .map(|(i, _)| i)?;

        let Pending {
            handle,
            deadline,
            kind,
        } = self.pending.remove(index);
        Some(Fired {
            handle,
            deadline,
            kind,
        })
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Holder for the single outstanding timer of one class
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<TimerHandle>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Schedule a timer, cancelling whatever this slot held before
    pub fn arm<K>(&mut self, queue: &mut TimerQueue<K>, now: Duration, delay: Duration, kind: K) {
        self.disarm(queue);
        self.handle = Some(queue.schedule(now, delay, kind));
    }

    pub fn disarm<K>(&mut self, queue: &mut TimerQueue<K>) {
        if let Some(handle) = self.handle.take() {
            queue.cancel(handle);
        }
    }

    /// Claim a fired timer. Returns true (and empties the slot) if it belonged here.
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}
