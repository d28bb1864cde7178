//! Core building blocks of a card collection
//!
//! Record schema, persistence, operations and presentation, from the leaves up.

mod card;
mod config;
mod error;
mod inventory;
pub mod logging;
mod render;
mod store;

pub use card::*;
pub use config::*;
pub use error::*;
pub use inventory::*;
pub use logging::*;
pub use render::*;
pub use store::*;
