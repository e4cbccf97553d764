use std::{
    collections::{HashMap, hash_map::Entry},
    time::Duration,
};

use crossterm::event::KeyCode;
use ratatui_runtime::{Runtime, TimerId};

/// Horizontal direction of a held movement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// Repeat timers of held movement keys, one per direction.
///
/// Pressing a held direction again does not schedule a second timer, and
/// releasing a direction that is not held does nothing.
#[derive(Debug, Default)]
pub(crate) struct AutoRepeat {
    timers: HashMap<Direction, TimerId>,
}

impl AutoRepeat {
    pub(crate) const INTERVAL: Duration = Duration::from_millis(150);

    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts repeating `direction`. Returns `false` if it already repeats.
    pub(crate) fn press(&mut self, runtime: &mut Runtime, direction: Direction) -> bool {
        match self.timers.entry(direction) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(runtime.start_timer(Self::INTERVAL));
                true
            }
        }
    }

    pub(crate) fn release(&mut self, runtime: &mut Runtime, direction: Direction) {
        if let Some(id) = self.timers.remove(&direction) {
            runtime.cancel_timer(id);
        }
    }

    pub(crate) fn release_all(&mut self, runtime: &mut Runtime) {
        for (_, id) in self.timers.drain() {
            runtime.cancel_timer(id);
        }
    }

    /// The direction repeated by timer `id`, if it is one of ours.
    pub(crate) fn direction_of(&self, id: TimerId) -> Option<Direction> {
        self.timers
            .iter()
            .find_map(|(direction, timer)| (*timer == id).then_some(*direction))
    }
}
