//! # Controllable simulated time.
//!
//! [`VirtualClock`] is an explicitly owned fake notion of time: callbacks
//! scheduled against simulated deadlines, fired only when [`tick`] advances
//! the clock. There is no ambient global timer state and no wall-clock
//! dependency — every time-based decision in the engine goes through an
//! instance of this clock.
//!
//! ## Rules
//! - Due callbacks fire in deadline order; ties fire in registration order.
//! - A callback may schedule further timers; those fire within the same
//!   `tick` call when their deadline falls inside the advanced window.
//! - Callbacks run outside the internal lock, so scheduling from inside a
//!   callback never deadlocks.
//! - [`clear`] drops every pending timer without firing it (used between
//!   the stepping and observing phases of a scenario).
//!
//! [`tick`]: VirtualClock::tick
//! [`clear`]: VirtualClock::clear

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::clock::settle::Settle;

/// Callback scheduled on the virtual clock.
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Handle to a scheduled callback, used to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
}

struct TimerEntry {
    id: u64,
    due_ms: u64,
    run: TimerCallback,
}

#[derive(Default)]
struct ClockState {
    now_ms: u64,
    next_id: u64,
    timers: Vec<TimerEntry>,
}

/// Controllable, simulated clock.
///
/// Cheap to share by reference; interior state is lock-protected so plugin
/// contexts can schedule deferred emissions through `&VirtualClock`.
#[derive(Default)]
pub struct VirtualClock {
    inner: Mutex<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time in milliseconds since clock creation.
    pub fn now_ms(&self) -> u64 {
        self.state().now_ms
    }

    /// Number of pending (scheduled, not yet fired) callbacks.
    pub fn pending(&self) -> usize {
        self.state().timers.len()
    }

    /// Schedules `run` to fire once simulated time has advanced by
    /// `delay_ms` milliseconds.
    pub fn after(&self, delay_ms: u64, run: TimerCallback) -> TimerHandle {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        let due_ms = state.now_ms.saturating_add(delay_ms);
        state.timers.push(TimerEntry { id, due_ms, run });
        TimerHandle { id }
    }

    /// Cancels a scheduled callback. Returns `false` if it already fired or
    /// was cancelled before.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let mut state = self.state();
        let before = state.timers.len();
        state.timers.retain(|t| t.id != handle.id);
        state.timers.len() < before
    }

    /// Drops every pending callback without firing it. Returns how many
    /// were dropped.
    pub fn clear(&self) -> usize {
        let mut state = self.state();
        let dropped = state.timers.len();
        state.timers.clear();
        dropped
    }

    /// Advances simulated time by `ms`, firing every callback whose deadline
    /// falls within the advanced window. Returns how many fired.
    ///
    /// Simulated time moves to each deadline as its callback fires, so a
    /// callback scheduling `after(0, ..)` re-fires within the same tick.
    pub fn tick(&self, ms: u64) -> usize {
        let target = {
            let state = self.state();
            state.now_ms.saturating_add(ms)
        };

        let mut fired = 0;
        loop {
            let next = {
                let mut state = self.state();
                let due = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let entry = state.timers.swap_remove(i);
                        state.now_ms = state.now_ms.max(entry.due_ms);
                        Some(entry)
                    }
                    None => None,
                }
            };
            match next {
                Some(entry) => {
                    (entry.run)();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state().now_ms = target;
        fired
    }

    /// Returns a fresh settle detector.
    ///
    /// The caller owns at most one pending detector at a time and re-arms by
    /// replacement: storing the new value drops (cancels) the old one, which
    /// is the debounce.
    pub fn debounce(&self) -> Settle {
        Settle::new()
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |tag: &'static str| -> TimerCallback {
                let log = log.clone();
                Box::new(move || log.lock().expect("log lock").push(tag))
            }
        };
        (log, make)
    }

    #[test]
    fn test_tick_fires_in_deadline_then_registration_order() {
        let clock = VirtualClock::new();
        let (log, cb) = recorder();

        clock.after(50, cb("b"));
        clock.after(10, cb("a"));
        clock.after(50, cb("c"));

        assert_eq!(clock.tick(100), 3);
        assert_eq!(*log.lock().expect("log lock"), vec!["a", "b", "c"]);
        assert_eq!(clock.now_ms(), 100);
    }

    #[test]
    fn test_not_yet_due_callbacks_stay_pending() {
        let clock = VirtualClock::new();
        let (log, cb) = recorder();

        clock.after(10, cb("soon"));
        clock.after(500, cb("later"));

        assert_eq!(clock.tick(100), 1);
        assert_eq!(clock.pending(), 1);

        assert_eq!(clock.tick(400), 1);
        assert_eq!(*log.lock().expect("log lock"), vec!["soon", "later"]);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let clock = VirtualClock::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = clock.after(10, Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        assert_eq!(clock.tick(100), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_schedule_within_same_tick() {
        let clock = Arc::new(VirtualClock::new());
        let (log, cb) = recorder();

        let chained = {
            let clock = clock.clone();
            let inner = cb("inner");
            Box::new(move || {
                clock.after(20, inner);
            })
        };
        clock.after(10, chained);

        // 10ms outer + 20ms inner both fall inside a 100ms window
        assert_eq!(clock.tick(100), 2);
        assert_eq!(*log.lock().expect("log lock"), vec!["inner"]);
    }

    #[test]
    fn test_clear_drops_everything_silently() {
        let clock = VirtualClock::new();
        let (log, cb) = recorder();

        clock.after(1, cb("x"));
        clock.after(2, cb("y"));
        assert_eq!(clock.clear(), 2);
        assert_eq!(clock.tick(10), 0);
        assert!(log.lock().expect("log lock").is_empty());
    }
}
