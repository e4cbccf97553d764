use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use crate::{
    App, TimerId,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Owns the event loop and its timer registry, and executes applications
/// that implement the `App` trait.
///
/// Timers are periodic and identified by the [`TimerId`] handle returned
/// from [`start_timer`](Self::start_timer). Each firing is delivered to
/// [`App::on_timer`] with that handle.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    key_release_events: bool,
}

impl Runtime {
    /// Creates a new Runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a periodic timer that first fires after `interval`.
    pub fn start_timer(&mut self, interval: Duration) -> TimerId {
        self.events.start_timer(interval)
    }

    /// Removes a timer. Unknown or already cancelled handles are ignored.
    pub fn cancel_timer(&mut self, id: TimerId) {
        self.events.cancel_timer(id);
    }

    /// Changes a timer's period and re-arms it from now.
    ///
    /// Returns `false` if the handle is not registered.
    pub fn set_timer_interval(&mut self, id: TimerId, interval: Duration) -> bool {
        self.events.set_timer_interval(id, interval)
    }

    #[must_use]
    pub fn has_timer(&self, id: TimerId) -> bool {
        self.events.has_timer(id)
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Whether the terminal reports key releases (and repeats) as separate
    /// events.
    ///
    /// Only known once [`run`](Self::run) has set up the terminal, i.e. from
    /// [`App::init`] on.
    #[must_use]
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    /// Runs the application.
    ///
    /// 1. Sets up the terminal, enabling key release reporting when supported
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the event loop until `app.should_exit()` returns true
    ///    - `TuiEvent::Timer`: calls `app.on_timer()`
    ///    - `TuiEvent::Render`: calls `app.draw()`
    ///    - `TuiEvent::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.key_release_events {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            app.init(&mut self);
            let result = (|| -> io::Result<()> {
                while !app.should_exit() {
                    match self.events.next()? {
                        TuiEvent::Timer(id) => {
                            app.on_timer(&mut self, id);
                        }
                        TuiEvent::Render => {
                            terminal.draw(|f| app.draw(f))?;
                        }
                        TuiEvent::Crossterm(event) => {
                            app.handle_event(&mut self, event);
                        }
                    }
                }
                Ok(())
            })();

            if self.key_release_events {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }
}
