//! Error types for the card collection
//!
//! Schema violations, store failures and collection operation outcomes each
//! get their own enum so callers can match on exactly the layer they care about.

use std::path::PathBuf;

use thiserror::Error;

/// A card or username violates the record schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardError {
    #[error("Card name must not be empty")]
    EmptyName,

    #[error("Invalid market value: {value} (must be a finite, non-negative number)")]
    InvalidMarketValue { value: f64 },

    #[error("Invalid username '{username}': use letters, digits, '-', '_' or '.'")]
    InvalidUsername { username: String },

    #[error("Unknown color: {color}")]
    UnknownColor { color: String },
}

/// Persistence failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read collection file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Collection file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Collection file {} stores card {id} under key {key}", path.display())]
    MismatchedId { path: PathBuf, key: u32, id: u32 },

    #[error("Cannot write collection file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a collection operation that did not succeed
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Card {id} already exists in collection")]
    DuplicateId { id: u32 },

    #[error("Card {id} not found in collection")]
    NotFound { id: u32 },

    #[error("Collection of {user} is empty")]
    EmptyCollection { user: String },

    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CollectionError {
    /// True for outcomes the user caused and can act on, as opposed to I/O failures
    pub fn is_domain(&self) -> bool {
        !matches!(self, CollectionError::Store(_))
    }
}
