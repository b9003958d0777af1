//! Favorites management
//!
//! Write-through store of favorite breed images.
//!
//! Every operation decodes the blob from the key-value store and every
//! mutation re-encodes and rewrites it in full. Nothing is cached between
//! calls, so another holder of the same store always sees the latest set.
//! Corrupt or missing data reads as "no favorites".

use crate::config::storage::FAVORITES_KEY;
use crate::data::storage::KeyValueStore;
use crate::data::types::BreedImage;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only membership check used when projecting image lists
pub trait FavoritesLookup {
    fn contains(&self, image: &BreedImage) -> bool;
}

/// Persisted record layout
///
/// Kept compatible with blobs written by earlier clients, which stored the
/// identity mode next to each item.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteRecord {
    text: String,
    url: String,
    #[serde(default)]
    selected: bool,
    #[serde(default = "default_identity_includes_url")]
    identity_includes_url: bool,
}

fn default_identity_includes_url() -> bool {
    true
}

impl From<&BreedImage> for FavoriteRecord {
    fn from(image: &BreedImage) -> Self {
        Self {
            text: image.breed.clone(),
            url: image.url.clone(),
            selected: image.selected,
            identity_includes_url: true,
        }
    }
}

impl From<FavoriteRecord> for BreedImage {
    fn from(record: FavoriteRecord) -> Self {
        BreedImage::new(record.text, record.url).with_selected(record.selected)
    }
}

/// Favorites backed by a shared key-value store
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl FavoritesStore {
    /// Favorites under the default storage key
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, FAVORITES_KEY)
    }

    /// Favorites under a custom storage key
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Current favorites, in insertion order
    pub fn favorite_breeds(&self) -> Vec<BreedImage> {
        self.load()
    }

    /// Whether an image with the same `(breed, url)` is a favorite
    pub fn contains(&self, image: &BreedImage) -> bool {
        self.load().contains(image)
    }

    /// Add the image if absent, remove it if present
    ///
    /// Returns `true` if the image is a favorite afterwards. A failed store
    /// read is returned as an error and nothing is written.
    pub fn toggle(&self, image: &BreedImage) -> Result<bool> {
        let mut favorites = self.read()?;
        let now_favorite = match favorites.iter().position(|f| f == image) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(image.clone());
                true
            }
        };
        self.save(&favorites)?;
        debug!(breed = %image.breed, url = %image.url, now_favorite, "toggled favorite");
        Ok(now_favorite)
    }

    /// Remove the image if present; returns whether anything was removed
    pub fn remove(&self, image: &BreedImage) -> Result<bool> {
        let mut favorites = self.read()?;
        let Some(index) = favorites.iter().position(|f| f == image) else {
            return Ok(false);
        };
        favorites.remove(index);
        self.save(&favorites)?;
        Ok(true)
    }

    /// Drop all favorites
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }

    /// Current favorites as a set, for bulk membership checks
    pub fn snapshot(&self) -> HashSet<BreedImage> {
        self.load().into_iter().collect()
    }

    /// Number of favorites
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Favorites for read-only callers; any failure reads as empty
    fn load(&self) -> Vec<BreedImage> {
        self.read().unwrap_or_else(|e| {
            warn!("Failed to read favorites: {e}");
            Vec::new()
        })
    }

    /// Decode the stored blob. Only store errors propagate; corrupt data
    /// decodes as empty.
    fn read(&self) -> Result<Vec<BreedImage>> {
        let Some(bytes) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<Vec<FavoriteRecord>>(&bytes) {
            Ok(records) => Ok(records.into_iter().map(BreedImage::from).collect()),
            Err(e) => {
                warn!("Discarding unreadable favorites: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, favorites: &[BreedImage]) -> Result<()> {
        let records: Vec<FavoriteRecord> = favorites.iter().map(FavoriteRecord::from).collect();
        let bytes = match serde_json::to_vec(&records) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode favorites: {e}");
                return Ok(());
            }
        };
        self.store.set(&self.key, &bytes)
    }
}

impl FavoritesLookup for FavoritesStore {
    fn contains(&self, image: &BreedImage) -> bool {
        FavoritesStore::contains(self, image)
    }
}

/// Snapshot lookup, for tagging a whole list with a single store read
impl FavoritesLookup for HashSet<BreedImage> {
    fn contains(&self, image: &BreedImage) -> bool {
        HashSet::contains(self, image)
    }
}
