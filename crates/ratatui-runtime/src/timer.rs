use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Opaque handle of a periodic timer registered with a [`Runtime`](crate::Runtime).
///
/// Handles are never reused within one runtime, so a stale handle can be
/// cancelled safely: it simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    interval: Duration,
    next_due: Instant,
}

/// Registry of periodic timers, keyed by [`TimerId`].
///
/// Timers are added and removed by handle, never by comparing what they do.
/// The set does not read the clock itself; every method takes `now`.
#[derive(Debug, Default)]
pub(crate) struct TimerSet {
    timers: HashMap<TimerId, Timer>,
    next_id: u64,
}

impl TimerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a timer that first fires `interval` after `now`.
    pub(crate) fn start(&mut self, interval: Duration, now: Instant) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                interval,
                next_due: now + interval,
            },
        );
        id
    }

    /// Removes a timer. Returns `false` if the handle was not registered.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Changes the period of a timer and re-arms it from `now`.
    ///
    /// Returns `false` if the handle was not registered.
    pub(crate) fn set_interval(&mut self, id: TimerId, interval: Duration, now: Instant) -> bool {
        let Some(timer) = self.timers.get_mut(&id) else {
            return false;
        };
        timer.interval = interval;
        timer.next_due = now + interval;
        true
    }

    pub(crate) fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Earliest instant at which some timer is due.
    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.next_due).min()
    }

    /// Takes the most overdue timer whose deadline is at or before `now`
    /// and schedules its next firing.
    ///
    /// A timer that fell more than a period behind (e.g. the process was
    /// suspended) fires once and restarts from `now`.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<TimerId> {
        let (&id, timer) = self
            .timers
            .iter_mut()
            .filter(|(_, t)| t.next_due <= now)
            .min_by_key(|(id, t)| (t.next_due, id.0))?;
        timer.next_due += timer.interval;
        if timer.next_due < now {
            timer.next_due = now + timer.interval;
        }
        Some(id)
    }
}
