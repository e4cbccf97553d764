use std::{cell::RefCell, rc::Rc};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::{Block, Clear, Padding},
};
use ratatui_runtime::{RenderMode, Runtime, Screen, ScreenTransition, TimerId};
use tetrion_engine::GameSession;

use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, on_off, style};

const KEYS: &[KeyBinding] = &[
    (&["↑", "↓"], "Select"),
    (&["←", "→"], "Change"),
    (&["Enter"], "Apply"),
    (&["Esc", "O"], "Back"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
enum OptionItem {
    #[display("Difficulty")]
    Difficulty,
    #[display("Colors")]
    Colors,
    #[display("Acceleration")]
    Accelerate,
    #[display("Restart")]
    Restart,
}

impl OptionItem {
    const ALL: [Self; 4] = [
        Self::Difficulty,
        Self::Colors,
        Self::Accelerate,
        Self::Restart,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Decrease,
    Increase,
    Apply,
}

/// Options menu pushed over the play screen.
///
/// Edits the shared session in place. Difficulty takes effect at the next
/// restart; colors and acceleration apply immediately.
#[derive(Debug)]
pub(crate) struct OptionsScreen {
    session: Rc<RefCell<GameSession>>,
    selected: usize,
}

impl OptionsScreen {
    pub(crate) fn new(session: Rc<RefCell<GameSession>>) -> Self {
        Self {
            session,
            selected: 0,
        }
    }

    fn selected_item(&self) -> OptionItem {
        OptionItem::ALL[self.selected]
    }

    fn value_label(&self, item: OptionItem) -> String {
        let session = self.session.borrow();
        let options = session.options();
        match item {
            OptionItem::Difficulty => format!("< {:>2} >", options.difficulty.rows()),
            OptionItem::Colors => on_off(options.colors_enabled),
            OptionItem::Accelerate => on_off(options.accelerate),
            OptionItem::Restart => String::new(),
        }
    }

    /// Applies `change` to the selected item. Returns `true` if the menu
    /// should close.
    fn change(&mut self, change: Change) -> bool {
        let mut session = self.session.borrow_mut();
        let options = *session.options();
        match self.selected_item() {
            OptionItem::Difficulty => {
                let difficulty = match change {
                    Change::Decrease => options.difficulty.cycled_down(),
                    Change::Increase | Change::Apply => options.difficulty.cycled_up(),
                };
                session.set_difficulty(i32::from(difficulty));
                false
            }
            OptionItem::Colors => {
                session.set_colors_enabled(!options.colors_enabled);
                false
            }
            OptionItem::Accelerate => {
                session.set_accelerate(!options.accelerate);
                false
            }
            OptionItem::Restart if change == Change::Apply => {
                session.restart();
                true
            }
            OptionItem::Restart => false,
        }
    }
}

impl Screen for OptionsScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        if key.kind == KeyEventKind::Release {
            return ScreenTransition::Stay;
        }

        let len = OptionItem::ALL.len();
        let change = match key.code {
            KeyCode::Up => {
                self.selected = (self.selected + len - 1) % len;
                None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % len;
                None
            }
            KeyCode::Left => Some(Change::Decrease),
            KeyCode::Right => Some(Change::Increase),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Change::Apply),
            KeyCode::Esc | KeyCode::Char('o' | 'O' | 'q' | 'Q') => return ScreenTransition::Pop,
            _ => None,
        };

        match change {
            Some(change) if self.change(change) => ScreenTransition::Pop,
            _ => ScreenTransition::Stay,
        }
    }

    fn on_timer(&mut self, _runtime: &mut Runtime, _id: TimerId) {}

    fn draw(&self, frame: &mut Frame) {
        let lines: Vec<Line> = OptionItem::ALL
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let text = format!("{:<14}{:>8}", item.to_string(), self.value_label(item));
                let style = if i == self.selected {
                    style::SELECTED
                } else {
                    style::DEFAULT
                };
                Line::styled(text, style)
            })
            .collect();
        let note = Line::styled("Difficulty applies on restart", style::EMPTY_DOT);

        let block = Block::bordered()
            .title(Line::from("OPTIONS").centered())
            .padding(Padding::symmetric(2, 1))
            .style(style::DEFAULT);
        let area = frame
            .area()
            .centered(Constraint::Length(30), Constraint::Length(10));
        let inner = block.inner(area);
        let [items_area, note_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Length(2)]).areas(inner);
        let [help_area] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::End)
            .areas(frame.area());

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        frame.render_widget(Text::from(lines), items_area);
        frame.render_widget(note.centered(), note_area);
        frame.render_widget(KeyBindingDisplay::new(KEYS), help_area);
    }
}
