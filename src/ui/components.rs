//! Small building blocks shared by the screens in `ui`.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::deck::{CardSink, Face};

/// Display sink that captures what the deck wants shown, for drawing later
/// in the frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CardFrame {
    pub face: Face,
    pub title: String,
    pub word: String,
    pub orientation: String,
}

impl CardSink for CardFrame {
    fn set_face(&mut self, face: Face) {
        self.face = face;
    }

    fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
    }

    fn set_word(&mut self, text: &str) {
        self.word = text.to_string();
    }

    fn set_orientation(&mut self, text: &str) {
        self.orientation = text.to_string();
    }
}

/// A bordered, clickable-looking button with its key hint
pub fn button<'a>(icon: &'a str, label: &'a str, key: &'a str, color: Color, hint: Color) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {} ", label), Style::default().fg(color)),
        Span::styled(format!("({})", key), Style::default().fg(hint)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
}
