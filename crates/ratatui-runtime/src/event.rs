use crossterm::event::Event as CrosstermEvent;

use crate::TimerId;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// A registered timer reached its deadline.
    Timer(TimerId),
    /// Screen render timing (see [`RenderMode`](crate::RenderMode)).
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}
