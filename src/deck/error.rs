use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading a word list or writing progress back to disk.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("could not open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed word list {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is empty, expected a header row naming both sides", path.display())]
    MissingHeader { path: PathBuf },

    #[error("{}: header must name exactly two sides, found {found}", path.display())]
    BadHeader { path: PathBuf, found: usize },

    #[error("{}: duplicate word {key:?} on line {line}", path.display())]
    DuplicateKey {
        path: PathBuf,
        key: String,
        line: u64,
    },

    #[error("could not save progress to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
