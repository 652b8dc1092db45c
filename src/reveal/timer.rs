// SPDX-License-Identifier: PMPL-1.0-or-later
//! Cancellable one-shot timers on a virtual clock.
//!
//! Timers live in a slot arena. A `TimerHandle` carries the generation of
//! its slot at scheduling time; removing an entry bumps the generation, so a
//! handle to a cancelled or fired timer can never touch a newer occupant.

use std::time::Duration;

/// Owned reference to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: usize,
    generation: u64,
}

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    /// Scheduling order, breaks deadline ties
    seq: u64,
    payload: T,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    entry: Option<Entry<T>>,
}

/// Slot arena of pending timers
#[derive(Debug)]
pub struct TimerArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    seq: u64,
    live: usize,
}

impl<T> Default for TimerArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            seq: 0,
            live: 0,
        }
    }

    /// Schedule `payload` to fire at the absolute virtual time `deadline`
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let seq = self.seq;
        self.seq += 1;
        self.live += 1;

        let entry = Entry { deadline, seq, payload };
        match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot];
                s.entry = Some(entry);
                TimerHandle { slot, generation: s.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, entry: Some(entry) });
                TimerHandle { slot: self.slots.len() - 1, generation: 0 }
            }
        }
    }

    /// Whether the handle still refers to a pending timer
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.slots
            .get(handle.slot)
            .map(|s| s.generation == handle.generation && s.entry.is_some())
            .unwrap_or(false)
    }

    /// Cancel a pending timer, returning its payload; stale handles are ignored
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        if !self.is_live(handle) {
            return None;
        }
        self.remove(handle.slot).map(|entry| entry.payload)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots
            .iter()
            .filter_map(|s| s.entry.as_ref())
            .map(|e| e.deadline)
            .min()
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, T)> {
        let slot = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.entry.as_ref().map(|e| (i, e)))
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;

        let handle = TimerHandle { slot, generation: self.slots[slot].generation };
        self.remove(slot).map(|entry| (handle, entry.payload))
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn remove(&mut self, slot: usize) -> Option<Entry<T>> {
        let s = self.slots.get_mut(slot)?;
        let entry = s.entry.take()?;
        s.generation += 1;
        self.free.push(slot);
        self.live -= 1;
        Some(entry)
    }
}
