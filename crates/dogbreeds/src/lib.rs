//! dogbreeds: breed catalogue, favorites and retry core
//!
//! Fetches the dog.ceo breed taxonomy and breed images, keeps a persisted
//! set of favorite images, reconciles fetched lists with that set, and
//! retries failed fetches on demand.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod gateway;
pub mod network;
pub mod sync;
