//! Screen controller
//!
//! Single consumer thread driving the breed, image and favorites screens.

pub mod controller;
pub mod state;

pub use controller::AppController;
pub use state::{AppCommand, AppEvent, AppSnapshot, Screen, ViewState};
