use std::{iter, time::Duration};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrion_engine::GameSession;

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap() + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

fn format_play_time(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.stats().score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|session| format_play_time(session.play_time())),
    Row::Empty,
    Row::LabelValue("LINES:", &|session| {
        session.stats().total_cleared_lines().to_string()
    }),
    Row::LabelValue("PIECES:", &|session| {
        session.stats().completed_pieces().to_string()
    }),
    Row::LabelValue("SPEED:", &|session| {
        format!("{}ms", session.tick_interval().as_millis())
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|session| {
        session.stats().line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|session| {
        session.stats().line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|session| {
        session.stats().line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("QUADS:", &|session| {
        session.stats().line_cleared_counter()[4].to_string()
    }),
    Row::Empty,
    Row::LabelValue("DIFFICULTY:", &|session| {
        session.options().difficulty.rows().to_string()
    }),
    Row::LabelValue("COLORS:", &|session| super::on_off(session.options().colors_enabled)),
    Row::LabelValue("ACCEL:", &|session| super::on_off(session.options().accelerate)),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
