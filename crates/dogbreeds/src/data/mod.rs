//! Data persistence
//!
//! Handles the key-value store, favorites, and shared domain types.

pub mod favorites;
pub mod storage;
pub mod types;

// Re-export common types
pub use favorites::{FavoritesLookup, FavoritesStore};
pub use storage::{config_dir, FileStore, KeyValueStore, MemoryStore};
pub use types::{capitalize, BreedImage, BreedListEntry, BreedName, Searchable, Selectable};
