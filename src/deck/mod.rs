//! The card pool.
//!
//! A deck is loaded once from a two-column word list and only ever shrinks:
//! learned cards are dropped and the remaining pool is written back to the
//! progress file so the next session picks up where this one stopped.

mod error;
mod store;

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use error::DeckError;
pub use store::DeckFiles;

/// Text shown on both sides once every card has been learned.
pub const SENTINEL: &str = "THE END";

/// One word pair, keyed by the first column of the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub key: String,
    pub value: String,
}

impl Card {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn sentinel() -> Self {
        Self::new(SENTINEL, SENTINEL)
    }
}

/// Which column is asked and which is the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// First column is the question
    #[default]
    Forward,
    /// Second column is the question
    Reversed,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reversed,
            Orientation::Reversed => Orientation::Forward,
        }
    }
}

/// What the card is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Blank,
    Question,
    Answer,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Side::Blank | Side::Answer => Side::Question,
            Side::Question => Side::Answer,
        }
    }
}

/// Card background: front while asking, back while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    #[default]
    Front,
    Back,
}

/// Receiver for everything a deck wants displayed.
pub trait CardSink {
    fn set_face(&mut self, face: Face);
    fn set_title(&mut self, text: &str);
    fn set_word(&mut self, text: &str);
    fn set_orientation(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fail on a repeated first-column word instead of keeping the last one
    pub reject_duplicates: bool,
}

pub struct Deck {
    headers: [String; 2],
    cards: Vec<Card>,
    current: Option<Card>,
    orientation: Orientation,
    progress: Option<PathBuf>,
    rng: StdRng,
}

impl Deck {
    /// Build a deck from labels and in-memory pairs, numbered like the rows
    /// of a word list, with the same duplicate handling as `load`.
    #[cfg(test)]
    pub fn from_pairs<I, K, V>(headers: [&str; 2], pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (key, value))| (i as u64 + 2, Card::new(key, value)));
        let cards = store::collect(Path::new("<memory>"), rows, false).unwrap();
        Self::with_cards([headers[0].to_string(), headers[1].to_string()], cards)
    }

    /// Read a word list from disk.
    pub fn load(path: &Path, options: LoadOptions) -> Result<Self, DeckError> {
        let list = store::read(path, options.reject_duplicates)?;
        tracing::info!(
            "Loaded {} cards ({} / {}) from {}",
            list.cards.len(),
            list.headers[0],
            list.headers[1],
            path.display()
        );
        Ok(Self::with_cards(list.headers, list.cards))
    }

    fn with_cards(headers: [String; 2], cards: Vec<Card>) -> Self {
        Self {
            headers,
            cards,
            current: None,
            orientation: Orientation::Forward,
            progress: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Write the remaining pool to `path` after every learned card.
    pub fn with_progress(mut self, path: impl Into<PathBuf>) -> Self {
        self.progress = Some(path.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Deterministic draws
    #[cfg(test)]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Column labels in source order
    #[cfg(test)]
    pub fn headers(&self) -> &[String; 2] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.cards.iter().any(|c| c.key == key)
    }

    #[cfg(test)]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn progress_path(&self) -> Option<&Path> {
        self.progress.as_deref()
    }

    /// (question label, answer label) for the current orientation
    pub fn labels(&self) -> (&str, &str) {
        match self.orientation {
            Orientation::Forward => (self.headers[0].as_str(), self.headers[1].as_str()),
            Orientation::Reversed => (self.headers[1].as_str(), self.headers[0].as_str()),
        }
    }

    pub fn question<'a>(&self, card: &'a Card) -> &'a str {
        match self.orientation {
            Orientation::Forward => card.key.as_str(),
            Orientation::Reversed => card.value.as_str(),
        }
    }

    pub fn answer<'a>(&self, card: &'a Card) -> &'a str {
        match self.orientation {
            Orientation::Forward => card.value.as_str(),
            Orientation::Reversed => card.key.as_str(),
        }
    }

    /// `"{question label} <-> {answer label}"`
    pub fn orientation_label(&self) -> String {
        let (question, answer) = self.labels();
        format!("{} <-> {}", question, answer)
    }

    /// Pick a card uniformly at random and make it current. An empty pool
    /// yields the sentinel card and leaves the pool untouched.
    pub fn draw_random(&mut self) -> Card {
        let card = if self.cards.is_empty() {
            Card::sentinel()
        } else {
            let idx = self.rng.gen_range(0..self.cards.len());
            self.cards[idx].clone()
        };
        self.current = Some(card.clone());
        card
    }

    /// Drop the current card for good, save the remaining pool and draw the
    /// next card.
    ///
    /// A failed save still removes the card and draws; the error is returned
    /// so the caller can report it.
    pub fn mark_known(&mut self) -> Result<Card, DeckError> {
        let saved = if self.remove_current() {
            self.save()
        } else {
            Ok(())
        };
        let next = self.draw_random();
        saved.map(|()| next)
    }

    /// Keep the current card in the pool and draw again.
    pub fn mark_unknown(&mut self) -> Card {
        self.draw_random()
    }

    pub fn toggle_orientation(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Push the current card, seen from `side`, into `sink`.
    pub fn render(&self, side: Side, sink: &mut impl CardSink) {
        sink.set_orientation(&self.orientation_label());

        let (question_label, answer_label) = self.labels();
        match (side, self.current.as_ref()) {
            (Side::Question, Some(card)) => {
                sink.set_face(Face::Front);
                sink.set_title(question_label);
                sink.set_word(self.question(card));
            }
            (Side::Answer, Some(card)) => {
                sink.set_face(Face::Back);
                sink.set_title(answer_label);
                sink.set_word(self.answer(card));
            }
            _ => {
                sink.set_face(Face::Front);
                sink.set_title("");
                sink.set_word("");
            }
        }
    }

    fn remove_current(&mut self) -> bool {
        let Some(current) = self.current.as_ref() else {
            return false;
        };
        match self.cards.iter().position(|c| c.key == current.key) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Rewrite the progress file with the remaining pool
    pub fn save(&self) -> Result<(), DeckError> {
        let Some(path) = self.progress.as_deref() else {
            return Ok(());
        };
        store::write(path, &self.headers, &self.cards)?;
        tracing::debug!("Saved {} remaining cards to {}", self.cards.len(), path.display());
        Ok(())
    }
}
