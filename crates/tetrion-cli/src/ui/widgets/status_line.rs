use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};

use crate::ui::widgets::style;

/// One-line feedback shown under the board, e.g. after saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct StatusLine<'a> {
    status: Option<&'a Status>,
}

impl<'a> StatusLine<'a> {
    pub fn new(status: Option<&'a Status>) -> Self {
        Self { status }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.status {
            None => return,
            Some(Status::Info(text)) => Line::styled(text.as_str(), style::INFO),
            Some(Status::Error(text)) => Line::styled(text.as_str(), style::ERROR),
        };
        line.centered().render(area, buf);
    }
}
