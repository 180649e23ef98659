//! # Event Scheduler
//!
//! Orders time-stamped actions against one logical clock. Events fire in
//! ascending fire-time order; ties fall back to submission order, which
//! keeps runs deterministic and is relied on by the rest of the engine.
//!
//! The scheduler is a plain priority queue: the owner moves the clock with
//! [`Scheduler::advance_clock`] and drains due events with
//! [`Scheduler::pop_due`], interpreting each action itself. Scheduling more
//! work while draining is fine; a zero-delay event submitted mid-drain is
//! due immediately and will be popped in the same pass.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct ScheduledEvent<A> {
    fire_at: u64,
    /// Submission order, the tie-breaker for equal fire times.
    seq: u64,
    /// Run that submitted the event; stale runs are discarded unfired.
    epoch: u64,
    action: A,
}

impl<A> PartialEq for ScheduledEvent<A> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<A> Eq for ScheduledEvent<A> {}

impl<A> PartialOrd for ScheduledEvent<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for ScheduledEvent<A> {
    /// Reversed so the `BinaryHeap` max-heap yields the earliest event first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

pub struct Scheduler<A> {
    clock: u64,
    seq: u64,
    epoch: u64,
    pending: BinaryHeap<ScheduledEvent<A>>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            clock: 0,
            seq: 0,
            epoch: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Current logical time in milliseconds.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Counter identifying the current run; bumped by [`Scheduler::invalidate`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Registers `action` to fire at `clock + delay`, tagged with the
    /// current epoch.
    pub fn schedule(&mut self, delay: u64, action: A) {
        let event = ScheduledEvent {
            fire_at: self.clock + delay,
            seq: self.seq,
            epoch: self.epoch,
            action,
        };
        self.seq += 1;
        self.pending.push(event);
    }

    pub fn advance_clock(&mut self, dt: u64) {
        self.clock += dt;
    }

    /// Pops the earliest due action, silently discarding any event left over
    /// from a previous epoch.
    pub fn pop_due(&mut self) -> Option<A> {
        loop {
            match self.pending.peek() {
                Some(head) if head.fire_at <= self.clock => {}
                _ => return None,
            }
            if let Some(event) = self.pending.pop() {
                if event.epoch == self.epoch {
                    return Some(event.action);
                }
            }
        }
    }

    /// Clears pending events and rewinds the clock. The epoch is left alone;
    /// use [`Scheduler::invalidate`] for a full run boundary.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.clock = 0;
    }

    /// Run boundary: clears state and bumps the epoch so anything still
    /// referencing the old run is rejected.
    pub fn invalidate(&mut self) {
        self.reset();
        self.epoch += 1;
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
