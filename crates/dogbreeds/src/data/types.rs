//! Common data types
//!
//! Domain values shared by the store, the gateway and the reconciler.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

// =============================================================================
// Searchable / Selectable - Traits used by the reconciler
// =============================================================================

/// Types that can be matched against a text query
pub trait Searchable {
    /// Text the query is matched against
    fn search_text(&self) -> &str;
}

/// Types that carry a view-level selection flag
pub trait Selectable {
    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);
}

// =============================================================================
// Helper functions
// =============================================================================

/// Uppercase the first letter of every word ("german shepherd" -> "German Shepherd")
pub fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// BreedListEntry - One row of the breed taxonomy
// =============================================================================

/// A top-level breed and its sub-breeds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedListEntry {
    /// Lowercase canonical breed name
    pub name: String,
    /// Sub-breed names, in server order
    #[serde(default)]
    pub subtypes: Vec<String>,
}

impl BreedListEntry {
    pub fn new(name: impl Into<String>, subtypes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            subtypes,
        }
    }
}

impl PartialEq for BreedListEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BreedListEntry {}

impl Hash for BreedListEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Searchable for BreedListEntry {
    fn search_text(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// BreedImage - One image of a breed
// =============================================================================

/// A single image of a breed
///
/// Identity is `(breed, url)`. `selected` is view state (for example "shown
/// as liked") and never takes part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedImage {
    /// Lowercase canonical breed name
    pub breed: String,
    /// Image URL
    pub url: String,
    #[serde(default)]
    pub selected: bool,
}

impl BreedImage {
    pub fn new(breed: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            breed: breed.into(),
            url: url.into(),
            selected: false,
        }
    }

    /// Builder-style selection flag
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Breed name without its identity, for filter lists
    pub fn to_breed_name(&self) -> BreedName {
        BreedName::new(self.breed.clone())
    }
}

impl PartialEq for BreedImage {
    fn eq(&self, other: &Self) -> bool {
        self.breed == other.breed && self.url == other.url
    }
}

impl Eq for BreedImage {}

impl Hash for BreedImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.breed.hash(state);
        self.url.hash(state);
    }
}

impl Searchable for BreedImage {
    fn search_text(&self) -> &str {
        &self.breed
    }
}

impl Selectable for BreedImage {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

// =============================================================================
// BreedName - A breed identified by name alone
// =============================================================================

/// A deduplicated breed name, as offered in the breed filter
///
/// Identity is the name only, so many images of one breed collapse into a
/// single `BreedName`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedName {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

impl BreedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: false,
        }
    }

    /// Capitalized name for display
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// Whether an image belongs to this breed (case-insensitive)
    pub fn matches(&self, image: &BreedImage) -> bool {
        self.name.eq_ignore_ascii_case(&image.breed)
    }
}

impl PartialEq for BreedName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BreedName {}

impl Hash for BreedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Searchable for BreedName {
    fn search_text(&self) -> &str {
        &self.name
    }
}

impl Selectable for BreedName {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
