//! Per-user persistence of card collections
//!
//! A collection is always read and written as one unit. Reading never fails:
//! a missing or corrupt file is treated as an empty collection.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

use super::card::{Card, Username};
use super::error::StoreError;

/// All cards of one user, keyed by card id
pub type Collection = BTreeMap<u32, Card>;

/// Persistence boundary between a username and its collection
pub trait Store {
    /// Load the collection of `user`, or an empty one if nothing usable is stored
    fn load(&self, user: &Username) -> Collection;

    /// Replace the stored collection of `user` with `collection`
    fn save(&self, user: &Username, collection: &Collection) -> Result<(), StoreError>;
}

/// Stores each collection as pretty-printed JSON in `<root>/<username>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the file holding `user`'s collection
    pub fn path_for(&self, user: &Username) -> PathBuf {
        self.root.join(format!("{}.json", user))
    }

    /// Load without the empty-collection fallback
    ///
    /// Every card must be stored under its own id.
    pub fn try_load(&self, user: &Username) -> Result<Collection, StoreError> {
        let path = self.path_for(user);
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let collection: Collection = serde_json::from_str(&content).map_err(|source| {
            StoreError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;

        if let Some((&key, card)) = collection.iter().find(|(key, card)| **key != card.id) {
            return Err(StoreError::MismatchedId {
                path,
                key,
                id: card.id,
            });
        }
        Ok(collection)
    }
}

impl Store for JsonFileStore {
    fn load(&self, user: &Username) -> Collection {
        match self.try_load(user) {
            Ok(collection) => {
                debug!(user = %user, cards = collection.len(), "Loaded collection");
                collection
            }
            Err(StoreError::Unreadable { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(user = %user, "No stored collection, starting empty");
                Collection::new()
            }
            Err(e) => {
                warn!(user = %user, error = %e, "Ignoring unusable collection file");
                Collection::new()
            }
        }
    }

    fn save(&self, user: &Username, collection: &Collection) -> Result<(), StoreError> {
        let path = self.path_for(user);
        let json = serde_json::to_string_pretty(collection)?;

        let write_error = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_error)?;

        // Write next to the target so the rename stays on one filesystem
        let mut file = NamedTempFile::new_in(&self.root).map_err(write_error)?;
        file.write_all(json.as_bytes()).map_err(write_error)?;
        file.persist(&path).map_err(|e| write_error(e.error))?;

        trace!(path = %path.display(), bytes = json.len(), "Wrote collection file");
        debug!(user = %user, cards = collection.len(), "Saved collection");
        Ok(())
    }
}
