// SPDX-License-Identifier: PMPL-1.0-or-later
//! Host for reveal instances sharing one virtual clock.
//!
//! Single-threaded and cooperative: time only moves when the owner calls
//! `advance`/`advance_to`. Each instance owns at most one pending timer.
//! Every input that changes timing cancels that timer before anything is
//! rescheduled, and a fired timer whose handle no longer matches its
//! instance is dropped.

use super::timer::{TimerArena, TimerHandle};
use super::{CursorStyle, RevealProps, RevealState, SpeedTier, Step, StreamingText};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

/// Identifier of a mounted reveal instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reveal-{}", self.0)
    }
}

/// Called once per run when an instance reaches its full text
pub type CompletionCallback = Box<dyn FnMut()>;

struct Instance {
    machine: StreamingText,
    timer: Option<TimerHandle>,
    on_complete: Option<CompletionCallback>,
}

/// Snapshot of what an instance renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealView {
    pub text: String,
    pub cursor: Option<&'static str>,
    pub state: RevealState,
    pub revealed: usize,
    pub total: usize,
}

impl std::fmt::Display for RevealView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.text, self.cursor.unwrap_or(""))
    }
}

/// Arena of reveal instances driven by one scheduler
#[derive(Default)]
pub struct RevealHost {
    now: Duration,
    next_id: u64,
    instances: BTreeMap<InstanceId, Instance>,
    timers: TimerArena<InstanceId>,
}

impl RevealHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the host was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Mount an instance; an instant or empty stream completes immediately
    pub fn mount(&mut self, props: RevealProps, on_complete: Option<CompletionCallback>) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        let (machine, step) = StreamingText::new(props);
        debug!(
            "Mounted {} ({} graphemes, speed {}, streaming {})",
            id,
            machine.total(),
            machine.speed(),
            machine.is_streaming()
        );
        self.instances.insert(id, Instance { machine, timer: None, on_complete });
        self.apply(id, step);
        id
    }

    /// Unmount an instance, cancelling its pending tick
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        match self.instances.remove(&id) {
            Some(instance) => {
                if let Some(handle) = instance.timer {
                    self.timers.cancel(handle);
                }
                debug!("Unmounted {}", id);
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn set_text(&mut self, id: InstanceId, text: impl Into<String>) {
        self.update(id, |m| m.set_text(text));
    }

    pub fn set_streaming(&mut self, id: InstanceId, streaming: bool) {
        self.update(id, |m| m.set_streaming(streaming));
    }

    pub fn set_speed(&mut self, id: InstanceId, speed: SpeedTier) {
        self.update(id, |m| m.set_speed(speed));
    }

    pub fn set_cursor(&mut self, id: InstanceId, cursor: CursorStyle) {
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.machine.set_cursor(cursor);
        }
    }

    /// Apply a full set of props, in text, streaming, speed, cursor order
    pub fn set_props(&mut self, id: InstanceId, props: RevealProps) {
        self.set_text(id, props.text);
        self.set_streaming(id, props.is_streaming);
        self.set_speed(id, props.speed);
        self.set_cursor(id, props.cursor);
    }

    pub fn pause(&mut self, id: InstanceId) {
        self.update(id, StreamingText::pause);
    }

    pub fn resume(&mut self, id: InstanceId) {
        self.update(id, StreamingText::resume);
    }

    pub fn view(&self, id: InstanceId) -> Option<RevealView> {
        self.instances.get(&id).map(|instance| {
            let machine = &instance.machine;
            RevealView {
                text: machine.visible_text().to_string(),
                cursor: machine.cursor(),
                state: machine.state(),
                revealed: machine.revealed(),
                total: machine.total(),
            }
        })
    }

    /// Absolute virtual time of the next pending tick
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Number of pending ticks across all instances
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward by `delta`, firing every tick that falls due
    pub fn advance(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Move the clock to `target`, firing due ticks in deadline order
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= target) {
            self.now = self.now.max(deadline);
            let Some((handle, id)) = self.timers.pop_due(self.now) else {
                break;
            };

            let step = match self.instances.get_mut(&id) {
                Some(instance) if instance.timer == Some(handle) => {
                    instance.timer = None;
                    instance.machine.tick()
                }
                _ => {
                    trace!("Dropping stale tick for {}", id);
                    continue;
                }
            };
            self.apply(id, step);
        }
        self.now = self.now.max(target);
    }

    fn update(&mut self, id: InstanceId, f: impl FnOnce(&mut StreamingText) -> Step) {
        let step = match self.instances.get_mut(&id) {
            Some(instance) => f(&mut instance.machine),
            None => {
                trace!("Ignoring update for unmounted {}", id);
                return;
            }
        };
        self.apply(id, step);
    }

    fn apply(&mut self, id: InstanceId, step: Step) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if step == Step::Unchanged {
            return;
        }

        if let Some(handle) = instance.timer.take() {
            self.timers.cancel(handle);
        }

        match step {
            Step::Unchanged | Step::Stop => {}
            Step::Schedule(delay) => {
                instance.timer = Some(self.timers.schedule(self.now + delay, id));
            }
            Step::Complete => {
                debug!("{} completed at {:?}", id, self.now);
                if let Some(callback) = instance.on_complete.as_mut() {
                    callback();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<usize>>, CompletionCallback) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_single_timer_per_instance() {
        let mut host = RevealHost::new();
        let id = host.mount(RevealProps::new("Hello"), None);
        assert_eq!(host.live_timers(), 1);

        host.set_speed(id, SpeedTier::Fast);
        host.set_text(id, "Hello there");
        host.pause(id);
        host.resume(id);
        assert_eq!(host.live_timers(), 1);
    }

    #[test]
    fn test_unmount_cancels() {
        let mut host = RevealHost::new();
        let (count, callback) = counter();
        let id = host.mount(RevealProps::new("Hi"), Some(callback));
        assert!(host.unmount(id));
        assert_eq!(host.live_timers(), 0);

        host.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 0);
        assert!(host.view(id).is_none());
        assert!(!host.unmount(id));

        // Inputs to an unmounted instance are no-ops
        host.set_text(id, "again");
        assert_eq!(host.live_timers(), 0);
    }

    #[test]
    fn test_clock_advances_through_deadlines() {
        let mut host = RevealHost::new();
        let id = host.mount(RevealProps::new("abcd").with_speed(SpeedTier::Fast), None);
        assert_eq!(host.next_deadline(), Some(Duration::from_millis(10)));

        host.advance(Duration::from_millis(25));
        assert_eq!(host.now(), Duration::from_millis(25));
        assert_eq!(host.view(id).map(|v| v.revealed), Some(2));
        assert_eq!(host.next_deadline(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_view_display() {
        let mut host = RevealHost::new();
        let id = host.mount(
            RevealProps::new("ab").with_speed(SpeedTier::Slow).with_cursor(CursorStyle::Underscore),
            None,
        );
        host.advance(Duration::from_millis(50));
        assert_eq!(host.view(id).map(|v| v.to_string()), Some("a_".to_string()));
    }
}
