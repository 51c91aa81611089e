//! Infrastructure layer: the collaborators around the allocation kernel.
//!
//! - `repository`: load/add/compare-and-swap save of `Product` aggregates
//! - `services`: orchestration (SKU validation, retries, event publication)
//! - `notifications`: handlers reacting to published allocation events
//! - `config`: runtime settings

pub mod config;
pub mod notifications;
pub mod repository;
pub mod services;

mod integration_tests;

pub use config::AllocationConfig;
pub use notifications::{LoggingNotifier, Notifier, OutOfStockNotification};
pub use repository::{InMemoryProductRepository, ProductRepository, RepositoryError};
pub use services::{AllocationService, ServiceError};
