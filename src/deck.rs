// 🃏 Deck Store - bounded ordered set of collected names
// Check-and-append runs under a single lock, so concurrent adds cannot
// overfill the deck or admit a duplicate

use crate::error::ServiceError;
use std::sync::Mutex;
use thiserror::Error;

/// Maximum entries a deck may hold
pub const DECK_CAPACITY: usize = 6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeckError {
    /// `name` keeps the caller's spelling for the message
    #[error("'{name}' is already in the deck")]
    AlreadyPresent { name: String },

    #[error("deck is full ({capacity} entries)")]
    Full { capacity: usize },
}

impl From<DeckError> for ServiceError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::AlreadyPresent { name } => ServiceError::DeckDuplicate { name },
            DeckError::Full { capacity } => ServiceError::DeckFull { capacity },
        }
    }
}

// ============================================================================
// DECK STORE
// ============================================================================

pub struct DeckStore {
    entries: Mutex<Vec<String>>,
    capacity: usize,
}

impl DeckStore {
    /// Create an empty deck with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DECK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        DeckStore {
            entries: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Current deck in insertion order
    pub fn list(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Append `name` (lowercased) if it is new and there is room.
    ///
    /// Duplicates are reported before fullness. Returns the updated deck.
    pub fn append(&self, name: &str) -> Result<Vec<String>, DeckError> {
        let normalized = name.trim().to_lowercase();
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());

        if entries.contains(&normalized) {
            return Err(DeckError::AlreadyPresent {
                name: name.to_string(),
            });
        }

        if entries.len() >= self.capacity {
            return Err(DeckError::Full {
                capacity: self.capacity,
            });
        }

        tracing::debug!(name = %normalized, size = entries.len() + 1, "deck append");
        entries.push(normalized);
        Ok(entries.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DeckStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
