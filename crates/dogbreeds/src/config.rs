//! Configuration constants for dogbreeds

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "dogbreeds";
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("dogbreeds/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// Gateway-related configuration
pub mod gateway {
    /// Default dog.ceo API root
    pub const DOG_CEO_DEFAULT_SERVER: &str = "https://dog.ceo/api";

    /// Status value that marks a usable response envelope
    pub const STATUS_SUCCESS: &str = "success";
}

/// Local persistence configuration
pub mod storage {
    /// Key under which the favorites blob is stored
    pub const FAVORITES_KEY: &str = "favoriteBreeds";

    /// Extension appended to keys by the file-backed store
    pub const FILE_EXTENSION: &str = "json";
}

/// UI-related configuration
pub mod ui {
    /// Window in which successive search queries collapse to the last one
    pub const SEARCH_DEBOUNCE_MS: u64 = 1000;

    /// Controller poll interval while waiting for commands
    pub const POLL_INTERVAL_MS: u64 = 50;

    /// Title of the favorites screen
    pub const FAVORITES_TITLE: &str = "Favorite";
}
