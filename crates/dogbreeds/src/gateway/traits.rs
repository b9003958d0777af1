//! Breed gateway trait
//!
//! Defines the interface every breed directory backend implements.

use crate::data::types::BreedListEntry;
use crate::error::Result;

/// A remote source of the breed taxonomy and breed images
///
/// Calls block until the response is mapped; run them off the consumer
/// thread and deliver the result back to it.
pub trait BreedGateway: Send + Sync {
    /// Display name for the backend (e.g., "Dog CEO")
    fn name(&self) -> &'static str;

    /// All top-level breeds with their sub-breeds, in no particular order
    ///
    /// A response whose status is not "success" yields an empty list.
    fn list_breeds(&self) -> Result<Vec<BreedListEntry>>;

    /// Image URLs for one breed, in no particular order
    ///
    /// A response whose status is not "success" yields an empty list.
    fn list_images(&self, breed: &str) -> Result<Vec<String>>;
}
