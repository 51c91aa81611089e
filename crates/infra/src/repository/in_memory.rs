use std::collections::HashMap;
use std::sync::RwLock;

use stockroom_allocation::Product;
use stockroom_core::{AggregateRoot, DomainError, ExpectedVersion, Sku};

use super::r#trait::{ProductRepository, RepositoryError};

/// In-memory product repository.
///
/// Intended for tests/dev. The write lock makes each `save` an atomic
/// compare-and-swap across threads.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<Sku, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stored_copy(product: &Product) -> Product {
        let mut copy = product.clone();
        copy.take_events();
        copy
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(products.get(sku).cloned())
    }

    fn add(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().map_err(|_| RepositoryError::Poisoned)?;

        if products.contains_key(product.sku()) {
            return Err(RepositoryError::AlreadyExists(product.sku().clone()));
        }

        let stored = Self::stored_copy(&product);
        products.insert(stored.sku().clone(), stored);
        Ok(())
    }

    fn save(
        &self,
        product: &Product,
        expected_version: ExpectedVersion,
    ) -> Result<u64, RepositoryError> {
        let mut products = self.products.write().map_err(|_| RepositoryError::Poisoned)?;

        let current = products
            .get(product.sku())
            .map(|stored| stored.version())
            .ok_or_else(|| RepositoryError::NotFound(product.sku().clone()))?;

        expected_version
            .check(current)
            .map_err(|err| match err {
                DomainError::Conflict(detail) => {
                    RepositoryError::Conflict(format!("product {}: {detail}", product.sku()))
                }
                other => RepositoryError::Conflict(other.to_string()),
            })?;

        let stored = Self::stored_copy(product);
        let version = stored.version();
        products.insert(stored.sku().clone(), stored);
        Ok(version)
    }
}
