use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

use crate::deck::{Deck, Side};

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything the user can ask for, whether by key or by click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Flip,
    Known,
    Unknown,
    Switch,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub deck: Deck,
    pub side: Side,
    pub popup: Popup,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Session counters
    pub learned: usize,
    pub reviewed: usize,

    pub should_quit: bool,
    notifications: bool,
}

impl App {
    pub fn new(deck: Deck, notifications: bool) -> Self {
        let mut app = Self {
            deck,
            side: Side::Blank,
            popup: Popup::None,
            status_message: None,
            status_message_time: None,
            learned: 0,
            reviewed: 0,
            should_quit: false,
            notifications,
        };
        app.deal();
        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Draw a fresh card and show its question side
    fn deal(&mut self) {
        self.deck.draw_random();
        self.side = Side::Question;
    }

    pub fn is_finished(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Help popup swallows keys until closed
        if self.popup == Popup::Help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match Self::action_for_key(key) {
            Some(action) => self.apply(action),
            None => Ok(()),
        }
    }

    pub fn action_for_key(key: KeyEvent) -> Option<Action> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('f') => Action::Flip,
            KeyCode::Char('y') | KeyCode::Right => Action::Known,
            KeyCode::Char('n') | KeyCode::Left => Action::Unknown,
            KeyCode::Char('s') | KeyCode::Tab => Action::Switch,
            KeyCode::Char('?') | KeyCode::Char('h') => Action::Help,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// Left clicks on the card or a button; `area` is the whole terminal.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) -> Result<()> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(());
        }
        if self.popup == Popup::Help {
            self.popup = Popup::None;
            return Ok(());
        }
        match crate::ui::hit_test(area, mouse.column, mouse.row) {
            Some(action) => self.apply(action),
            None => Ok(()),
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Flip => {
                self.side = self.side.flipped();
            }
            Action::Known => {
                let had_cards = !self.deck.is_empty();
                let saved = self.deck.mark_known();
                self.side = Side::Question;
                if had_cards {
                    self.learned += 1;
                    if self.deck.is_empty() {
                        self.finished();
                    }
                }
                saved?;
            }
            Action::Unknown => {
                if !self.deck.is_empty() {
                    self.reviewed += 1;
                }
                self.deck.mark_unknown();
                self.side = Side::Question;
            }
            Action::Switch => {
                self.deck.toggle_orientation();
                self.set_status(format!("Asking {}", self.deck.orientation_label()));
            }
            Action::Help => self.popup = Popup::Help,
            Action::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn finished(&mut self) {
        tracing::info!("Deck finished after learning {} cards", self.learned);
        self.set_status("All cards learned!");
        if self.notifications {
            if let Err(e) = crate::notify("flashdeck", "All cards learned!") {
                tracing::warn!("Could not send notification: {}", e);
            }
        }
    }

    /// Periodic housekeeping between events
    pub fn tick(&mut self) {
        if let Some(set_at) = self.status_message_time {
            if set_at.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Card;
    use crossterm::event::KeyEventState;

    fn app() -> App {
        let deck = Deck::from_pairs(["French", "English"], [("chat", "cat"), ("chien", "dog")]).seeded(11);
        App::new(deck, false)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_new_app_shows_question() {
        let app = app();
        assert_eq!(app.side, Side::Question);
        assert!(app.deck.current().is_some());
    }

    #[test]
    fn test_flip_toggles_side() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.side, Side::Answer);
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.side, Side::Question);
    }

    #[test]
    fn test_known_and_unknown_reset_side() {
        let mut app = app();
        app.apply(Action::Flip).unwrap();
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.side, Side::Question);
        assert_eq!(app.deck.len(), 2);
        assert_eq!(app.reviewed, 1);

        app.apply(Action::Flip).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.side, Side::Question);
        assert_eq!(app.deck.len(), 1);
        assert_eq!(app.learned, 1);
    }

    #[test]
    fn test_finishing_the_deck() {
        let mut app = app();
        app.apply(Action::Known).unwrap();
        app.apply(Action::Known).unwrap();
        assert!(app.is_finished());
        assert_eq!(app.learned, 2);
        assert_eq!(app.deck.current(), Some(&Card::sentinel()));
        assert_eq!(app.status_message.as_deref(), Some("All cards learned!"));

        // Nothing left to learn, counters stay put
        app.apply(Action::Known).unwrap();
        app.apply(Action::Unknown).unwrap();
        assert_eq!(app.learned, 2);
        assert_eq!(app.reviewed, 0);
        assert_eq!(app.deck.current(), Some(&Card::sentinel()));
    }

    #[test]
    fn test_switch_keeps_current_card() {
        let mut app = app();
        let card = app.deck.current().cloned();
        app.handle_key(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.deck.current().cloned(), card);
        assert_eq!(app.deck.labels(), ("English", "French"));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.popup, Popup::Help);

        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.deck.len(), 2);
        assert_eq!(app.popup, Popup::Help);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        app.handle_key(ctrl_c).unwrap();
        assert!(app.should_quit);

        assert_eq!(App::action_for_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(App::action_for_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_click_on_card_flips() {
        let mut app = app();
        let area = Rect::new(0, 0, 80, 24);
        let card = crate::ui::layout(area).card;
        app.handle_mouse(click(card.x + card.width / 2, card.y + card.height / 2), area)
            .unwrap();
        assert_eq!(app.side, Side::Answer);
    }

    #[test]
    fn test_click_on_known_button() {
        let mut app = app();
        let area = Rect::new(0, 0, 80, 24);
        let known = crate::ui::layout(area).known;
        app.handle_mouse(click(known.x + 1, known.y + 1), area).unwrap();
        assert_eq!(app.deck.len(), 1);
    }

    #[test]
    fn test_failed_save_is_reported_but_deck_moves_on() {
        let dir = tempfile::tempdir().unwrap();
        let deck = Deck::from_pairs(["French", "English"], [("chat", "cat"), ("chien", "dog")])
            .seeded(5)
            .with_progress(dir.path());
        let mut app = App::new(deck, false);

        assert!(app.apply(Action::Known).is_err());
        assert_eq!(app.deck.len(), 1);
        assert_eq!(app.learned, 1);
        assert_eq!(app.side, Side::Question);
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = app();
        app.set_status("hello");
        app.tick();
        assert!(app.status_message.is_some());

        app.status_message_time = Some(Instant::now() - STATUS_TIMEOUT);
        app.tick();
        assert!(app.status_message.is_none());
    }
}
