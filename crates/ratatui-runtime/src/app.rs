use crossterm::event::Event;
use ratatui::Frame;

use crate::{Runtime, TimerId};

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`, once the terminal is set up.
    /// Use this to register timers and pick a render mode.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Called when the timer `id` fires.
    fn on_timer(&mut self, runtime: &mut Runtime, id: TimerId);
}
