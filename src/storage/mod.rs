//! Persistence layer.
//!
//! The engine itself never touches storage. This module is the seam the
//! operator desk loads rounds and wagers through: a `RoundStore` trait and
//! a JSON "book" file holding every round and wager.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{MatkaError, Round, Wager};

/// Default book file path.
pub const DEFAULT_BOOK_FILE: &str = "matka_book.json";

/// Where rounds and wagers come from.
#[cfg_attr(test, mockall::automock)]
pub trait RoundStore {
    /// Fetch a round, or `RoundNotFound`.
    fn load_round(&self, round_id: &str) -> Result<Round, MatkaError>;

    /// Persist a (mutated) round. The round must already exist.
    fn save_round(&mut self, round: &Round) -> Result<(), MatkaError>;

    /// All wagers recorded against a round, in placement order.
    fn wagers_for(&self, round_id: &str) -> Result<Vec<Wager>, MatkaError>;
}

// ---------------------------------------------------------------------------
// Book file
// ---------------------------------------------------------------------------

/// Everything the desk knows, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub rounds: Vec<Round>,
    pub wagers: Vec<Wager>,
}

/// Save a book to a JSON file.
pub fn save_book(book: &Book, path: &Path) -> Result<(), MatkaError> {
    let json = serde_json::to_string_pretty(book)
        .map_err(|e| MatkaError::Storage(format!("Failed to serialise book: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        MatkaError::Storage(format!("Failed to write book to {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), rounds = book.rounds.len(), "Book saved");
    Ok(())
}

/// Load a book from a JSON file. Returns `None` if the file doesn't exist.
pub fn load_book(path: &Path) -> Result<Option<Book>, MatkaError> {
    if !path.exists() {
        info!(path = %path.display(), "No book file found, starting empty");
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).map_err(|e| {
        MatkaError::Storage(format!("Failed to read book from {}: {e}", path.display()))
    })?;
    let book: Book = serde_json::from_str(&json).map_err(|e| {
        MatkaError::Storage(format!("Failed to parse book from {}: {e}", path.display()))
    })?;
    info!(
        path = %path.display(),
        rounds = book.rounds.len(),
        wagers = book.wagers.len(),
        "Book loaded from disk"
    );
    Ok(Some(book))
}

/// Delete the book file (for testing or reset).
pub fn delete_book(path: &Path) -> Result<(), MatkaError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| {
            MatkaError::Storage(format!("Failed to delete book {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON store
// ---------------------------------------------------------------------------

/// File-backed store. Every `save_round` rewrites the whole file.
pub struct JsonBookStore {
    path: PathBuf,
    book: Book,
}

impl JsonBookStore {
    /// Open (or start) the book at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MatkaError> {
        let path = path.into();
        let book = load_book(&path)?.unwrap_or_default();
        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Register a new round and write the file. An existing id is
    /// `RoundExists` and leaves the book untouched; declared rounds only
    /// change through [`RoundStore::save_round`].
    pub fn insert_round(&mut self, round: Round) -> Result<(), MatkaError> {
        if self.book.rounds.iter().any(|r| r.id == round.id) {
            return Err(MatkaError::RoundExists(round.id));
        }
        self.book.rounds.push(round);
        self.flush()
    }

    /// Append wagers and write the file.
    pub fn add_wagers(&mut self, wagers: impl IntoIterator<Item = Wager>) -> Result<(), MatkaError> {
        self.book.wagers.extend(wagers);
        self.flush()
    }

    pub fn flush(&self) -> Result<(), MatkaError> {
        save_book(&self.book, &self.path)
    }
}

impl RoundStore for JsonBookStore {
    fn load_round(&self, round_id: &str) -> Result<Round, MatkaError> {
        self.book
            .rounds
            .iter()
            .find(|r| r.id == round_id)
            .cloned()
            .ok_or_else(|| MatkaError::RoundNotFound(round_id.to_string()))
    }

    fn save_round(&mut self, round: &Round) -> Result<(), MatkaError> {
        let slot = self
            .book
            .rounds
            .iter_mut()
            .find(|r| r.id == round.id)
            .ok_or_else(|| MatkaError::RoundNotFound(round.id.clone()))?;
        *slot = round.clone();
        self.flush()
    }

    fn wagers_for(&self, round_id: &str) -> Result<Vec<Wager>, MatkaError> {
        self.load_round(round_id)?;
        Ok(self
            .book
            .wagers
            .iter()
            .filter(|w| w.round_id == round_id)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
