use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use crate::{App, Runtime, TimerId};

/// Individual screen in the application.
///
/// # Lifecycle
///
/// 1. [`on_active`] when the screen reaches the top of the stack, either
///    at startup, when pushed, or when the screen above it pops
/// 2. Events, timers and draws while on top
/// 3. [`on_inactive`] when something is pushed over it or it is removed
/// 4. [`on_close`] only when it is removed (Pop/Exit)
///
/// # Timers
///
/// Timers belong to the [`Runtime`], not to a screen. A screen that starts
/// timers in [`on_active`] should cancel them in [`on_inactive`]; timer
/// events are only delivered to the top screen, and a screen must ignore
/// handles it does not own.
///
/// ```rust
/// use std::time::Duration;
///
/// use crossterm::event::Event;
/// use ratatui::Frame;
/// use ratatui_runtime::{RenderMode, Runtime, Screen, ScreenTransition, TimerId};
///
/// #[derive(Debug, Default)]
/// struct Blink {
///     timer: Option<TimerId>,
///     visible: bool,
/// }
///
/// impl Screen for Blink {
///     fn on_active(&mut self, runtime: &mut Runtime) {
///         runtime.set_render_mode(RenderMode::OnDirty);
///         self.timer = Some(runtime.start_timer(Duration::from_millis(500)));
///     }
///
///     fn on_inactive(&mut self, runtime: &mut Runtime) {
///         if let Some(timer) = self.timer.take() {
///             runtime.cancel_timer(timer);
///         }
///     }
///
///     fn on_close(&mut self, _runtime: &mut Runtime) {}
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> ScreenTransition {
///         ScreenTransition::Stay
///     }
///
///     fn on_timer(&mut self, _runtime: &mut Runtime, id: TimerId) {
///         if self.timer == Some(id) {
///             self.visible = !self.visible;
///         }
///     }
///
///     fn draw(&self, _frame: &mut Frame) {}
/// }
/// ```
///
/// [`on_active`]: Self::on_active
/// [`on_inactive`]: Self::on_inactive
/// [`on_close`]: Self::on_close
pub trait Screen: fmt::Debug {
    /// Called when this screen becomes the top of the stack.
    ///
    /// Configure the render mode and start this screen's timers here.
    fn on_active(&mut self, runtime: &mut Runtime);

    /// Called when this screen stops being the top of the stack.
    ///
    /// For Pop/Exit, [`on_close`](Self::on_close) follows.
    fn on_inactive(&mut self, runtime: &mut Runtime);

    /// Called when this screen is removed from the stack for good.
    ///
    /// Not called on Push: the screen stays in the stack, in the background.
    fn on_close(&mut self, runtime: &mut Runtime);

    /// Handles terminal events and returns transition.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called when the timer `id` fires while this screen is on top.
    fn on_timer(&mut self, runtime: &mut Runtime, id: TimerId);

    /// Renders the screen.
    fn draw(&self, frame: &mut Frame);
}

/// What the stack should do after a screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Put a screen on top; the current one goes to the background.
    Push(Box<dyn Screen>),
    /// Close the current screen and reactivate the one below it.
    Pop,
    /// Close every screen and stop the runtime.
    Exit,
}

/// Stack of screens, driven as one [`App`].
///
/// Only the top screen receives events, timers and draw calls.
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
    should_exit: bool,
}

impl<'a> ScreenStack<'a> {
    #[must_use]
    pub fn new(initial: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    fn close_top(&mut self, runtime: &mut Runtime) -> bool {
        let Some(mut screen) = self.screens.pop() else {
            return false;
        };
        screen.on_inactive(runtime);
        screen.on_close(runtime);
        true
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                if let Some(current) = self.screens.last_mut() {
                    current.on_inactive(runtime);
                }
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(runtime);
                if let Some(below) = self.screens.last_mut() {
                    below.on_active(runtime);
                }
            }
            ScreenTransition::Exit => {
                while self.close_top(runtime) {}
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(current) = self.screens.last() {
            current.draw(frame);
        }
    }

    fn on_timer(&mut self, runtime: &mut Runtime, id: TimerId) {
        if let Some(current) = self.screens.last_mut() {
            current.on_timer(runtime, id);
        }
    }
}
