//! Persistence boundary for `Product` aggregates.
//!
//! The kernel never calls this; the orchestration layer loads a snapshot, lets the
//! aggregate mutate it, and saves it back with the version it loaded.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProductRepository;
pub use r#trait::{ProductRepository, RepositoryError};
