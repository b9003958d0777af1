//! Breed gateways
//!
//! Remote sources of the breed taxonomy and breed images.

pub mod dog_ceo;
pub mod mapper;
pub mod traits;

// Re-exports
pub use dog_ceo::DogCeoGateway;
pub use traits::BreedGateway;
