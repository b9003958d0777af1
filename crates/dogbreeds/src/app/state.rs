//! Shared application state, commands and events
//!
//! `AppCommand` is the command type sent by any frontend to the controller.
//! `AppSnapshot` is the shared state frontends read. `AppEvent` notifies
//! frontends that something changed or needs attention.

use crate::config::ui::FAVORITES_TITLE;
use crate::data::types::{capitalize, BreedImage, BreedListEntry, BreedName};
use crate::sync::PendingOperation;

/// Which screen the controller is driving
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    /// Breed taxonomy list
    #[default]
    Breeds,
    /// Images of one breed
    Images { breed: String },
    /// Locally stored favorite images
    Favorites,
}

impl Screen {
    /// Title shown for the screen
    pub fn title(&self) -> String {
        match self {
            Screen::Breeds => "Breeds".to_string(),
            Screen::Images { breed } => capitalize(breed),
            Screen::Favorites => FAVORITES_TITLE.to_string(),
        }
    }

    /// Whether a queued retry belongs to this screen
    pub fn owns(&self, op: &PendingOperation) -> bool {
        match (self, op) {
            (Screen::Breeds, PendingOperation::ListBreeds) => true,
            (Screen::Images { breed }, PendingOperation::ListImages { breed: op_breed }) => {
                breed == op_breed
            }
            _ => false,
        }
    }
}

/// What the current screen should render
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Error(String),
    Breeds(Vec<BreedListEntry>),
    Images(Vec<BreedImage>),
}

/// Commands sent by any frontend
#[derive(Debug)]
pub enum AppCommand {
    // Navigation
    LoadBreeds,
    OpenBreed(String),
    OpenFavorites,
    Dismiss,

    // List interaction
    Search(String),
    ToggleFavorite(usize),
    ShowBreedFilter,
    SelectBreedFilter(usize),
    ClearBreedFilter,

    // Re-issue the oldest failed fetch
    Retry,

    // Shutdown the controller
    Shutdown,

    // Internal: fetch finished on a worker thread (not sent by frontends)
    InternalBreedsLoaded {
        generation: u64,
        result: Result<Vec<BreedListEntry>, String>,
    },
    InternalImagesLoaded {
        generation: u64,
        breed: String,
        result: Result<Vec<String>, String>,
    },
}

/// Notifications for frontends
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    /// The snapshot changed; re-read it
    ViewUpdated,
    TitleChanged(String),
    /// A fetch failed; a retry is queued
    ShowError(String),
    /// An image screen was closed with these images still selected
    Dismissed { selected: Vec<BreedImage> },
}

/// Snapshot of app state, shared between the controller and frontends
#[derive(Clone, Debug, Default)]
pub struct AppSnapshot {
    pub screen: Screen,
    pub view: ViewState,
    /// Applied (debounced) search query
    pub query: String,
    /// Breed filter choices for the current image list
    pub breed_filter: Vec<BreedName>,
    /// Failed fetches waiting for a retry, oldest first
    pub pending_retries: Vec<PendingOperation>,
    pub last_error: Option<String>,
}

impl AppSnapshot {
    pub fn title(&self) -> String {
        self.screen.title()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    pub fn can_retry(&self) -> bool {
        !self.pending_retries.is_empty()
    }
}
