//! List reconciliation
//!
//! Combines freshly fetched lists with local selection state into the
//! sequences a screen renders. Reads favorites through [`FavoritesLookup`]
//! and never mutates them.

use crate::data::favorites::FavoritesLookup;
use crate::data::types::{capitalize, BreedImage, BreedListEntry, BreedName, Searchable, Selectable};
use std::collections::HashSet;

/// Sort breed entries by name, keeping server order among equal names
pub fn project_breeds(mut entries: Vec<BreedListEntry>) -> Vec<BreedListEntry> {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Sort image URLs and tag each image with its favorite state
pub fn project_images<F>(mut urls: Vec<String>, breed: &str, favorites: &F) -> Vec<BreedImage>
where
    F: FavoritesLookup + ?Sized,
{
    urls.sort();
    urls.into_iter()
        .map(|url| {
            let image = BreedImage::new(breed, url);
            let selected = favorites.contains(&image);
            image.with_selected(selected)
        })
        .collect()
}

/// Case-insensitive substring match against the trimmed query
///
/// A blank query keeps every item. Filtering twice with the same query
/// gives the same result as filtering once.
pub fn filter<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.search_text().to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Distinct breeds among `images`, capitalized and sorted, none selected
pub fn unique_breed_names(images: &[BreedImage]) -> Vec<BreedName> {
    let mut seen = HashSet::new();
    let mut names: Vec<BreedName> = images
        .iter()
        .map(|image| BreedName::new(capitalize(&image.breed)))
        .filter(|name| seen.insert(name.name.clone()))
        .collect();
    names.sort_by(|a, b| a.name.cmp(&b.name));
    names
}

/// Select `index` and deselect everything else
///
/// Selecting the already-selected item keeps it selected. Returns false and
/// leaves `items` untouched when `index` is out of range.
pub fn toggle_single_selection<T: Selectable>(items: &mut [T], index: usize) -> bool {
    if index >= items.len() {
        return false;
    }
    for (i, item) in items.iter_mut().enumerate() {
        item.set_selected(i == index);
    }
    true
}

/// Index of the first selected item
pub fn selected_index<T: Selectable>(items: &[T]) -> Option<usize> {
    items.iter().position(|item| item.is_selected())
}

/// Images of one breed, or all images when no breed is chosen
pub fn filter_by_breed(images: &[BreedImage], breed: Option<&BreedName>) -> Vec<BreedImage> {
    match breed {
        Some(name) => images.iter().filter(|i| name.matches(i)).cloned().collect(),
        None => images.to_vec(),
    }
}

/// Images still marked selected
pub fn selected_images(images: &[BreedImage]) -> Vec<BreedImage> {
    images.iter().filter(|i| i.selected).cloned().collect()
}
