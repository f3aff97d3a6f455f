//! On-disk word lists: the pristine source and the progress snapshot that
//! replaces it once cards start being learned.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use super::{Card, DeckError};

/// Where a deck lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckFiles {
    pub source: PathBuf,
    /// Progress snapshot, read at startup when present
    pub progress: Option<PathBuf>,
}

impl DeckFiles {
    pub fn new(source: impl Into<PathBuf>, progress: Option<PathBuf>) -> Self {
        Self {
            source: source.into(),
            progress,
        }
    }

    /// True when a previous session left a snapshot to resume from
    pub fn is_resuming(&self) -> bool {
        self.progress.as_deref().map(Path::exists).unwrap_or(false)
    }

    /// The file the next session should load: the snapshot if one exists,
    /// otherwise the source.
    pub fn resolve(&self) -> &Path {
        match self.progress.as_deref() {
            Some(progress) if progress.exists() => progress,
            _ => &self.source,
        }
    }

    /// Delete the progress snapshot. Returns whether there was one.
    pub fn reset(&self) -> io::Result<bool> {
        match self.progress.as_deref() {
            Some(progress) if progress.exists() => {
                fs::remove_file(progress)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Parsed contents of a word list: header labels plus unique cards in
/// source order.
pub(super) struct WordList {
    pub headers: [String; 2],
    pub cards: Vec<Card>,
}

pub(super) fn read(path: &Path, reject_duplicates: bool) -> Result<WordList, DeckError> {
    let file = File::open(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(file, path, reject_duplicates)
}

pub(super) fn parse<R: io::Read>(
    reader: R,
    path: &Path,
    reject_duplicates: bool,
) -> Result<WordList, DeckError> {
    let csv_err = |source| DeckError::Csv {
        path: path.to_path_buf(),
        source,
    };

    // The header is read as a plain record so that a short or long header is
    // reported as such instead of as a row length mismatch.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(csv_err)?,
        None => {
            return Err(DeckError::MissingHeader {
                path: path.to_path_buf(),
            })
        }
    };
    if header.len() != 2 {
        return Err(DeckError::BadHeader {
            path: path.to_path_buf(),
            found: header.len(),
        });
    }
    let headers = [header[0].to_string(), header[1].to_string()];

    let mut rows: Vec<(u64, Card)> = Vec::new();
    for record in records {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 2 {
            return Err(csv_err(csv::Error::from(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected 2 fields, found {}", line, record.len()),
            ))));
        }
        rows.push((line, Card::new(&record[0], &record[1])));
    }

    let cards = collect(path, rows, reject_duplicates)?;
    Ok(WordList { headers, cards })
}

/// Turn numbered rows into unique cards in first-seen order. A repeated key
/// either fails or overwrites the earlier translation.
pub(super) fn collect<I>(path: &Path, rows: I, reject_duplicates: bool) -> Result<Vec<Card>, DeckError>
where
    I: IntoIterator<Item = (u64, Card)>,
{
    let mut cards: Vec<Card> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, card) in rows {
        match index.get(&card.key) {
            Some(_) if reject_duplicates => {
                return Err(DeckError::DuplicateKey {
                    path: path.to_path_buf(),
                    key: card.key,
                    line,
                });
            }
            Some(&pos) => {
                tracing::warn!(
                    "{}: duplicate word {:?} on line {}, keeping the later translation",
                    path.display(),
                    card.key,
                    line
                );
                cards[pos].value = card.value;
            }
            None => {
                index.insert(card.key.clone(), cards.len());
                cards.push(card);
            }
        }
    }

    Ok(cards)
}

/// Rewrite `path` with the header and every remaining card.
pub(super) fn write(path: &Path, headers: &[String; 2], cards: &[Card]) -> Result<(), DeckError> {
    let persist_err = |source| DeckError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| persist_err(csv::Error::from(e)))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(persist_err)?;
    writer.write_record(headers).map_err(persist_err)?;
    for card in cards {
        writer
            .write_record([card.key.as_str(), card.value.as_str()])
            .map_err(persist_err)?;
    }
    writer.flush().map_err(|e| persist_err(csv::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str, reject_duplicates: bool) -> Result<WordList, DeckError> {
        parse(content.as_bytes(), Path::new("words.csv"), reject_duplicates)
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let list = parse_str("French,English\nchat,cat\nchien,dog\noiseau,bird\n", false).unwrap();
        assert_eq!(list.headers, ["French".to_string(), "English".to_string()]);
        let keys: Vec<&str> = list.cards.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["chat", "chien", "oiseau"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let list = parse_str("French,English\n\"bonjour, toi\",\"hello, you\"\n", false).unwrap();
        assert_eq!(list.cards[0], Card::new("bonjour, toi", "hello, you"));
    }

    #[test]
    fn test_duplicate_keeps_last_value_at_first_position() {
        let list = parse_str("French,English\nchat,cat\nchien,dog\nchat,kitty\n", false).unwrap();
        assert_eq!(list.cards.len(), 2);
        assert_eq!(list.cards[0], Card::new("chat", "kitty"));
    }

    #[test]
    fn test_duplicate_rejected_when_asked() {
        let err = parse_str("French,English\nchat,cat\nchat,kitty\n", true).err().unwrap();
        match err {
            DeckError::DuplicateKey { key, line, .. } => {
                assert_eq!(key, "chat");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_has_no_header() {
        assert!(matches!(parse_str("", false), Err(DeckError::MissingHeader { .. })));
    }

    #[test]
    fn test_header_must_have_two_sides() {
        assert!(matches!(
            parse_str("French,English,German\nchat,cat,Katze\n", false),
            Err(DeckError::BadHeader { found: 3, .. })
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        assert!(matches!(
            parse_str("French,English\nchat\n", false),
            Err(DeckError::Csv { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read(&dir.path().join("nope.csv"), false);
        assert!(matches!(result, Err(DeckError::Io { .. })));
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("to_learn.csv");
        let headers = ["French".to_string(), "English".to_string()];
        write(&path, &headers, &[Card::new("chien", "dog")]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "French,English\nchien,dog\n");
        let list = read(&path, false).unwrap();
        assert_eq!(list.cards, vec![Card::new("chien", "dog")]);
    }

    #[test]
    fn test_resolve_prefers_progress() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.csv");
        let progress = dir.path().join("to_learn.csv");
        let files = DeckFiles::new(&source, Some(progress.clone()));

        assert_eq!(files.resolve(), source.as_path());
        assert!(!files.is_resuming());

        fs::write(&progress, "French,English\n").unwrap();
        assert_eq!(files.resolve(), progress.as_path());
        assert!(files.is_resuming());

        assert!(files.reset().unwrap());
        assert!(!progress.exists());
        assert!(!files.reset().unwrap());
    }

    #[test]
    fn test_resolve_without_progress_uses_source() {
        let files = DeckFiles::new("data/source.csv", None);
        assert_eq!(files.resolve(), Path::new("data/source.csv"));
        assert!(!files.reset().unwrap());
    }
}
