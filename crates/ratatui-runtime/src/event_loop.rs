use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::{
    event::TuiEvent,
    timer::{TimerId, TimerSet},
};

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at a fixed period, whether or not anything changed.
    Interval(Duration),
    /// Render after state changes (timer or crossterm event).
    #[default]
    OnDirty,
}

impl RenderMode {
    /// Creates `Interval` mode from frame rate (FPS).
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state management.
///
/// Multiplexes the registered timers, the render schedule and terminal
/// input, returning one event per call to `next()`. Timers take priority
/// over rendering so a slow terminal cannot starve game logic.
#[derive(Debug)]
pub(super) struct EventLoop {
    timers: TimerSet,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with no timers and `OnDirty` rendering.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            timers: TimerSet::new(),
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn start_timer(&mut self, interval: Duration) -> TimerId {
        self.timers.start(interval, Instant::now())
    }

    pub(super) fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub(super) fn set_timer_interval(&mut self, id: TimerId, interval: Duration) -> bool {
        self.timers.set_interval(id, interval, Instant::now())
    }

    pub(super) fn has_timer(&self, id: TimerId) -> bool {
        self.timers.contains(id)
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
        self.dirty = true;
    }

    /// Returns the next event.
    ///
    /// Blocks until a timer or render deadline is reached or a crossterm
    /// event occurs. Without timers and with nothing to render, only waits
    /// for crossterm events.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(id) = self.timers.pop_due(now) {
                self.dirty = true;
                return Ok(TuiEvent::Timer(id));
            }

            let do_render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
        };
        let next_timeout_at = [self.timers.next_due(), next_render_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
