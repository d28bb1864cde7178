//! Collection operations
//!
//! Each operation loads the user's collection, works on it in memory and,
//! if it changed anything, saves the whole collection back.

use tracing::{debug, info, span, Level};

use super::card::{Card, CardPatch, MergePolicy, Username};
use super::error::CollectionError;
use super::store::{Collection, Store};

pub type Result<T> = std::result::Result<T, CollectionError>;

/// CRUD operations over a [`Store`]
#[derive(Debug, Clone)]
pub struct Inventory<S: Store> {
    store: S,
    merge_policy: MergePolicy,
}

impl<S: Store> Inventory<S> {
    /// Create an inventory using the default explicit merge policy
    pub fn new(store: S) -> Self {
        Self::with_merge_policy(store, MergePolicy::default())
    }

    pub fn with_merge_policy(store: S, merge_policy: MergePolicy) -> Self {
        Self {
            store,
            merge_policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Add `card`, refusing to overwrite an existing id
    pub fn add(&self, user: &Username, card: Card) -> Result<()> {
        let add_span = span!(Level::INFO, "add", user = %user, id = card.id);
        let _enter = add_span.enter();

        card.validate()?;

        let mut collection = self.store.load(user);
        if collection.contains_key(&card.id) {
            debug!("Id already taken");
            return Err(CollectionError::DuplicateId { id: card.id });
        }

        collection.insert(card.id, card);
        self.store.save(user, &collection)?;

        info!("Card added");
        Ok(())
    }

    /// All cards of `user` in ascending id order
    pub fn list(&self, user: &Username) -> Result<Vec<Card>> {
        let list_span = span!(Level::INFO, "list", user = %user);
        let _enter = list_span.enter();

        let collection = self.store.load(user);
        if collection.is_empty() {
            return Err(CollectionError::EmptyCollection {
                user: user.to_string(),
            });
        }

        debug!(cards = collection.len(), "Listing collection");
        Ok(collection.into_values().collect())
    }

    pub fn read(&self, user: &Username, id: u32) -> Result<Card> {
        let read_span = span!(Level::INFO, "read", user = %user, id);
        let _enter = read_span.enter();

        self.store
            .load(user)
            .remove(&id)
            .ok_or(CollectionError::NotFound { id })
    }

    /// Merge `patch` into card `id` and return the stored result
    pub fn update(&self, user: &Username, id: u32, patch: &CardPatch) -> Result<Card> {
        let update_span = span!(
            Level::INFO,
            "update",
            user = %user,
            id,
            policy = %self.merge_policy
        );
        let _enter = update_span.enter();

        let mut collection = self.store.load(user);
        let current = collection
            .get(&id)
            .ok_or(CollectionError::NotFound { id })?;

        let updated = patch.apply(current, self.merge_policy);
        updated.validate()?;

        collection.insert(id, updated.clone());
        self.store.save(user, &collection)?;

        info!("Card updated");
        Ok(updated)
    }

    /// Delete card `id` and return it
    pub fn remove(&self, user: &Username, id: u32) -> Result<Card> {
        let remove_span = span!(Level::INFO, "remove", user = %user, id);
        let _enter = remove_span.enter();

        let mut collection: Collection = self.store.load(user);
        let removed = collection
            .remove(&id)
            .ok_or(CollectionError::NotFound { id })?;
        self.store.save(user, &collection)?;

        info!(remaining = collection.len(), "Card removed");
        Ok(removed)
    }
}
