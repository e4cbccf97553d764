pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    screen::{Screen, ScreenStack, ScreenTransition},
    timer::TimerId,
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;
mod timer;
