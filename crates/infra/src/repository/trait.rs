use std::sync::Arc;

use thiserror::Error;

use stockroom_allocation::Product;
use stockroom_core::{ExpectedVersion, Sku};

/// Repository operation error.
///
/// These are **infrastructure errors** as opposed to domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored version moved on since the snapshot was loaded.
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("product {0} already exists")]
    AlreadyExists(Sku),

    #[error("product {0} not found")]
    NotFound(Sku),

    #[error("repository lock poisoned")]
    Poisoned,
}

/// Storage of `Product` aggregates, keyed by SKU.
///
/// Aggregates are the only objects with a repository; batches are stored as part
/// of their product.
///
/// ## Save semantics
///
/// `save()` is a compare-and-swap: the stored product is replaced only if its version
/// still equals `expected_version`, otherwise `RepositoryError::Conflict` is returned
/// and nothing changes. The caller retries against a fresh snapshot.
///
/// Implementations never hand out or store pending domain events; those belong to
/// the in-flight snapshot that recorded them.
pub trait ProductRepository: Send + Sync {
    /// Owned snapshot of the product, or `None` if the SKU is unknown.
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product that does not exist yet.
    fn add(&self, product: Product) -> Result<(), RepositoryError>;

    /// Replace the stored product if it is still at `expected_version`.
    ///
    /// Returns the version now stored.
    fn save(
        &self,
        product: &Product,
        expected_version: ExpectedVersion,
    ) -> Result<u64, RepositoryError>;
}

impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError> {
        (**self).get(sku)
    }

    fn add(&self, product: Product) -> Result<(), RepositoryError> {
        (**self).add(product)
    }

    fn save(
        &self,
        product: &Product,
        expected_version: ExpectedVersion,
    ) -> Result<u64, RepositoryError> {
        (**self).save(product, expected_version)
    }
}
