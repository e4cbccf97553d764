use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tetrion_engine::{GameSession, SessionState};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// Stats, board and next-piece preview of a session, side by side.
///
/// The border color follows the session state, and a popup covers the
/// board while paused or after game over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Height needed to draw the whole display.
    pub fn height() -> u16 {
        BoardDisplay::new(&[]).block(Block::bordered()).height()
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let render_cells = self.session.render_cells();
        let preview_cells = self.session.preview_cells();

        let game_board = {
            let widget = BoardDisplay::new(&render_cells)
                .block(Block::bordered().border_style(border_style).style(style));
            if self.session.session_state().is_playing() {
                widget.ghost(self.session.simulate_drop_position())
            } else {
                widget
            }
        };
        let next_panel = PieceDisplay::new(&preview_cells).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );
        let session_stats = SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
