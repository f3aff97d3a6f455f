mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{Action, App, Popup};
use crate::theme::Theme;

pub use components::CardFrame;

/// Widest the card and button row get on large terminals
const MAX_CARD_WIDTH: u16 = 64;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialised");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }

/// Screen regions, shared by drawing and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub info: Rect,
    pub orientation: Rect,
    pub card: Rect,
    pub unknown: Rect,
    pub switch: Rect,
    pub known: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Info line
            Constraint::Length(1),  // Orientation label
            Constraint::Min(5),     // Card
            Constraint::Length(3),  // Buttons
            Constraint::Length(1),  // Footer
        ])
        .split(area);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(centered_columns(chunks[3], MAX_CARD_WIDTH));

    Regions {
        info: chunks[0],
        orientation: chunks[1],
        card: centered_columns(chunks[2], MAX_CARD_WIDTH),
        unknown: buttons[0],
        switch: buttons[1],
        known: buttons[2],
        footer: chunks[4],
    }
}

/// Which action a click at (column, row) triggers
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<Action> {
    let regions = layout(area);
    let pos = Position::new(column, row);

    if regions.card.contains(pos) {
        Some(Action::Flip)
    } else if regions.unknown.contains(pos) {
        Some(Action::Unknown)
    } else if regions.switch.contains(pos) {
        Some(Action::Switch)
    } else if regions.known.contains(pos) {
        Some(Action::Known)
    } else {
        None
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let regions = layout(f.area());

    let mut card = CardFrame::default();
    app.deck.render(app.side, &mut card);

    draw_info_line(f, app, regions.info);
    draw_orientation(f, &card, regions.orientation);
    draw_card(f, app, &card, regions.card);
    draw_buttons(f, app, &regions);
    draw_footer(f, regions.footer);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > finished > counters
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(accent())))
    } else if app.is_finished() {
        Line::from(Span::styled(
            format!("Deck finished │ {} learned this session", app.learned),
            Style::default().fg(success()),
        ))
    } else {
        Line::from(vec![
            Span::styled(format!("{}", app.deck.len()), Style::default().fg(text()).add_modifier(Modifier::BOLD)),
            Span::styled(" to learn │ ", Style::default().fg(text_dim())),
            Span::styled(format!("{}", app.learned), Style::default().fg(success())),
            Span::styled(" learned │ ", Style::default().fg(text_dim())),
            Span::styled(format!("{}", app.reviewed), Style::default().fg(danger())),
            Span::styled(" to review", Style::default().fg(text_dim())),
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_orientation(f: &mut Frame, card: &CardFrame, area: Rect) {
    let label = Paragraph::new(Line::from(Span::styled(
        card.orientation.as_str(),
        Style::default().fg(accent()).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);

    f.render_widget(label, area);
}

fn draw_card(f: &mut Frame, app: &App, card: &CardFrame, area: Rect) {
    let (bg, fg) = theme().face(card.face);

    let remaining = format!(" {} left ", app.deck.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(inactive()).bg(bg))
        .title_bottom(Line::from(Span::styled(remaining, Style::default().fg(inactive()))).right_aligned())
        .style(Style::default().bg(bg).fg(fg));

    let inner = block.inner(area);

    // Title, gap, word: centre the three lines vertically
    let padding = inner.height.saturating_sub(3) / 2;
    let mut lines: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        card.title.as_str(),
        Style::default().fg(fg).add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        card.word.as_str(),
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    )));

    let content = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(content, area);
}

fn draw_buttons(f: &mut Frame, app: &App, regions: &Regions) {
    // Known/unknown do nothing useful once the deck is empty
    let (wrong, right) = if app.is_finished() {
        (inactive(), inactive())
    } else {
        (danger(), success())
    };

    f.render_widget(components::button("✘", "Unknown", "n", wrong, text_dim()), regions.unknown);
    f.render_widget(components::button("⇄", "Switch", "s", accent(), text_dim()), regions.switch);
    f.render_widget(components::button("✔", "Known", "y", right, text_dim()), regions.known);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints: Vec<(&str, &str)> = vec![
        ("Space", "Flip"),
        ("y", "Known"),
        ("n", "Unknown"),
        ("s", "Switch"),
        ("?", "Help"),
        ("q", "Quit"),
    ];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
    };
    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(accent())),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        section("═══ Cards ═══"),
        entry("  Space/Enter  ", "Flip the card (or click it)"),
        entry("  y / →        ", "I knew it: remove the card and save progress"),
        entry("  n / ←        ", "Not yet: keep the card and draw another"),
        entry("  s / Tab      ", "Switch which column is asked"),
        Line::from(""),
        section("═══ Progress ═══"),
        Line::from(Span::raw("  Learned cards are dropped from the progress file,")),
        Line::from(Span::raw("  so the next session resumes with what is left.")),
        entry("  flashdeck --reset   ", "Start over from the full word list"),
        entry("  flashdeck --status  ", "Print a JSON summary of the deck"),
        Line::from(""),
        section("═══ General ═══"),
        entry("  ?/h          ", "Toggle this help"),
        entry("  q/Esc        ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" flashdeck Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

/// Horizontally centre a strip no wider than `max_width`
fn centered_columns(r: Rect, max_width: u16) -> Rect {
    let width = r.width.min(max_width);
    Rect {
        x: r.x + (r.width - width) / 2,
        width,
        ..r
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
