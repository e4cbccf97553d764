use std::{cell::RefCell, mem, path::PathBuf, rc::Rc, time::Duration};

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{RenderMode, Runtime, Screen, ScreenTransition, TimerId};
use tetrion_engine::{GameSession, SessionState};

use crate::{
    command::play::{
        auto_repeat::{AutoRepeat, Direction},
        screens::OptionsScreen,
    },
    model::save_file::SaveFile,
    ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay, Status, StatusLine},
    util,
};

const FPS: f64 = 60.0;

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑", "X"], "Rotate"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["P"], "Pause"),
    (&["O"], "Options"),
    (&["S"], "Save"),
    (&["L"], "Load"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[
    (&["P"], "Resume"),
    (&["O"], "Options"),
    (&["R"], "Restart"),
    (&["S"], "Save"),
    (&["L"], "Load"),
    (&["Q"], "Quit"),
];
const GAME_OVER_KEYS: &[KeyBinding] = &[
    (&["R"], "Restart"),
    (&["O"], "Options"),
    (&["L"], "Load"),
    (&["Q"], "Quit"),
];

/// The game itself: drives the session from the logic timer and the keyboard.
///
/// The session is shared with the [`OptionsScreen`] pushed on top of it.
#[derive(Debug)]
pub(crate) struct PlayScreen {
    session: Rc<RefCell<GameSession>>,
    save_file: PathBuf,
    logic_timer: Option<(TimerId, Duration)>,
    auto_repeat: AutoRepeat,
    resume_on_return: bool,
    status: Option<Status>,
}

impl PlayScreen {
    pub(crate) fn new(session: Rc<RefCell<GameSession>>, save_file: PathBuf) -> Self {
        Self {
            session,
            save_file,
            logic_timer: None,
            auto_repeat: AutoRepeat::new(),
            resume_on_return: false,
            status: None,
        }
    }

    /// Re-arms the logic timer if the session's fall interval changed.
    fn sync_logic_timer(&mut self, runtime: &mut Runtime) {
        let interval = self.session.borrow().tick_interval();
        if let Some((id, current)) = &mut self.logic_timer
            && *current != interval
        {
            runtime.set_timer_interval(*id, interval);
            *current = interval;
        }
    }

    fn move_piece(&self, direction: Direction) {
        let mut session = self.session.borrow_mut();
        _ = match direction {
            Direction::Left => session.try_move_left(),
            Direction::Right => session.try_move_right(),
        };
    }

    fn save_game(&mut self) {
        let save = SaveFile::new(self.session.borrow().save());
        self.status = Some(
            match util::write_json_file("save", &self.save_file, &save) {
                Ok(()) => Status::Info(format!("Saved to {}", self.save_file.display())),
                Err(e) => Status::Error(format!("Save failed: {e:#}")),
            },
        );
    }

    fn load_game(&mut self, runtime: &mut Runtime) {
        let result = util::read_json_file::<SaveFile, _>("save", &self.save_file).and_then(|save| {
            self.session
                .borrow_mut()
                .load(save.game)
                .with_context(|| format!("Invalid saved game: {}", self.save_file.display()))
        });
        self.status = Some(match result {
            Ok(()) => Status::Info(format!("Loaded {}", self.save_file.display())),
            Err(e) => Status::Error(format!("Load failed: {e:#}")),
        });
        self.auto_repeat.release_all(runtime);
    }

    fn open_options(&mut self) -> ScreenTransition {
        let mut session = self.session.borrow_mut();
        if session.session_state().is_playing() {
            session.toggle_pause();
            self.resume_on_return = true;
        }
        ScreenTransition::Push(Box::new(OptionsScreen::new(Rc::clone(&self.session))))
    }

    fn handle_direction(
        &mut self,
        runtime: &mut Runtime,
        direction: Direction,
        kind: KeyEventKind,
    ) {
        match kind {
            KeyEventKind::Press => {
                self.move_piece(direction);
                // Without release events a held key can't be tracked; the
                // terminal's own key repeat takes over.
                if runtime.key_release_events() {
                    self.auto_repeat.press(runtime, direction);
                }
            }
            KeyEventKind::Repeat if !runtime.key_release_events() => self.move_piece(direction),
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => self.auto_repeat.release(runtime, direction),
        }
    }
}

impl Screen for PlayScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::interval_from_rate(FPS));
        let interval = self.session.borrow().tick_interval();
        self.logic_timer = Some((runtime.start_timer(interval), interval));

        if mem::take(&mut self.resume_on_return) {
            let mut session = self.session.borrow_mut();
            if session.session_state().is_paused() {
                session.toggle_pause();
            }
        }
    }

    fn on_inactive(&mut self, runtime: &mut Runtime) {
        if let Some((id, _)) = self.logic_timer.take() {
            runtime.cancel_timer(id);
        }
        self.auto_repeat.release_all(runtime);
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };

        if let Some(direction) = Direction::from_key(key.code) {
            self.handle_direction(runtime, direction, key.kind);
            return ScreenTransition::Stay;
        }
        if key.kind == KeyEventKind::Release {
            return ScreenTransition::Stay;
        }

        let transition = match key.code {
            KeyCode::Up | KeyCode::Char('x' | 'X') => {
                _ = self.session.borrow_mut().try_rotate();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                _ = self.session.borrow_mut().try_soft_drop();
                ScreenTransition::Stay
            }
            KeyCode::Char(' ') => {
                _ = self.session.borrow_mut().hard_drop();
                ScreenTransition::Stay
            }
            KeyCode::Char('p' | 'P') => {
                self.session.borrow_mut().toggle_pause();
                self.auto_repeat.release_all(runtime);
                ScreenTransition::Stay
            }
            KeyCode::Char('r' | 'R') => {
                self.session.borrow_mut().restart();
                self.auto_repeat.release_all(runtime);
                self.status = None;
                ScreenTransition::Stay
            }
            KeyCode::Char('s' | 'S') => {
                self.save_game();
                ScreenTransition::Stay
            }
            KeyCode::Char('l' | 'L') => {
                self.load_game(runtime);
                ScreenTransition::Stay
            }
            KeyCode::Char('o' | 'O') => self.open_options(),
            KeyCode::Char('q' | 'Q') => ScreenTransition::Exit,
            _ => ScreenTransition::Stay,
        };
        self.sync_logic_timer(runtime);
        transition
    }

    fn on_timer(&mut self, runtime: &mut Runtime, id: TimerId) {
        if self.logic_timer.is_some_and(|(logic, _)| logic == id) {
            let outcome = self.session.borrow_mut().tick();
            if outcome.is_game_over() {
                self.auto_repeat.release_all(runtime);
            }
            self.sync_logic_timer(runtime);
        } else if let Some(direction) = self.auto_repeat.direction_of(id) {
            self.move_piece(direction);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session = self.session.borrow();
        let key_bindings = match session.session_state() {
            SessionState::Playing => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };

        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(SessionDisplay::height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(SessionDisplay::new(&session), main_area);
        frame.render_widget(StatusLine::new(self.status.as_ref()), status_area);
        frame.render_widget(KeyBindingDisplay::new(key_bindings), help_area);
    }
}
