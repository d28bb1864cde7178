//! Cardkeep - a per-user trading card collection
//!
//! Cards are stored per user as one JSON file and managed through add, list,
//! read, update and remove operations.
//!
//! # Quick Start
//!
//! ```rust
//! use cardkeep::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let inventory = cardkeep::open(&Config::new(dir.path(), MergePolicy::Explicit));
//! let alice = Username::parse("alice").unwrap();
//!
//! let dragon = Card::new(2, "Shivan Dragon", 6, Color::Red, "Creature", "Rare", "Flying");
//! inventory.add(&alice, dragon.clone()).unwrap();
//! assert_eq!(inventory.read(&alice, 2).unwrap(), dragon);
//! ```
//!
//! # Rendering
//!
//! ```rust
//! use cardkeep::prelude::*;
//!
//! let card = Card::new(1, "Serra Angel", 5, Color::White, "Creature", "Uncommon", "Flying");
//! let text = CardRenderer::plain().render_card(&card, &mut rand::thread_rng());
//! assert!(text.starts_with("ID: 1\nName: Serra Angel"));
//! ```

pub mod core;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Card, CardError, CardPatch, CardRenderer, Collection, CollectionError, Color, Config,
        Inventory, JsonFileStore, MergePolicy, Store, StoreError, Username,
    };
}

/// Open the file-backed inventory described by `config`
pub fn open(config: &Config) -> Inventory<JsonFileStore> {
    Inventory::with_merge_policy(JsonFileStore::new(&config.data_dir), config.merge_policy)
}
