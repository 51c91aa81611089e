//! Allocation orchestration (application-level service layer).
//!
//! ```text
//! allocate(order_id, sku, qty)
//!   ↓
//! 1. Parse inputs into an OrderLine
//!   ↓
//! 2. Load the Product snapshot (unknown SKU → InvalidSku)
//!   ↓
//! 3. Product::allocate (pure domain decision + mutation of the snapshot)
//!   ↓
//! 4. Save with ExpectedVersion::Exact(loaded version); on conflict reload and retry
//!   ↓
//! 5. Publish the events the aggregate recorded
//! ```
//!
//! Events are published only after the save succeeded. A domain failure (out of
//! stock) saves nothing but still publishes what the aggregate recorded, so handlers
//! can notify someone.

use chrono::NaiveDate;
use thiserror::Error;

use stockroom_allocation::{AllocationError, AllocationEvent, Batch, OrderLine, Product};
use stockroom_core::{AggregateRoot, BatchRef, DomainError, ExpectedVersion, OrderId, Sku};
use stockroom_events::{EventBus, EventEnvelope};

use crate::config::AllocationConfig;
use crate::repository::{ProductRepository, RepositoryError};

/// Aggregate type stamped on every published envelope.
pub const PRODUCT_AGGREGATE_TYPE: &str = "allocation.product";

/// Outcome of an orchestrated operation that did not succeed.
///
/// `InvalidSku` and `OutOfStock` are expected business outcomes; the rest are
/// failures of the input or of the infrastructure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid sku {0}")]
    InvalidSku(Sku),

    #[error("Out of stock for sku {0}")]
    OutOfStock(Sku),

    /// Concurrent writers kept winning until the retry budget ran out.
    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(RepositoryError),

    /// Publication failed after a successful save (at-least-once; retry may duplicate).
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl From<AllocationError> for ServiceError {
    fn from(value: AllocationError) -> Self {
        match value {
            AllocationError::OutOfStock { sku } => ServiceError::OutOfStock(sku),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repository(other),
        }
    }
}

/// Entry point for allocation use cases.
///
/// - `R`: product repository (compare-and-swap save)
/// - `B`: bus the recorded `AllocationEvent`s are published on
#[derive(Debug)]
pub struct AllocationService<R, B> {
    repository: R,
    bus: B,
    config: AllocationConfig,
}

impl<R, B> AllocationService<R, B> {
    pub fn new(repository: R, bus: B, config: AllocationConfig) -> Self {
        Self {
            repository,
            bus,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<R, B> AllocationService<R, B>
where
    R: ProductRepository,
    B: EventBus<EventEnvelope<AllocationEvent>>,
{
    /// Register a new batch, creating the product on first use of its SKU.
    pub fn add_batch(
        &self,
        reference: &str,
        sku: &str,
        qty: u32,
        eta: Option<NaiveDate>,
    ) -> Result<(), ServiceError> {
        let reference: BatchRef = reference.parse()?;
        let sku: Sku = sku.parse()?;
        let batch = Batch::new(reference, sku.clone(), qty, eta);

        if self.repository.get(&sku)?.is_none() {
            let mut product = Product::empty(sku.clone());
            product.add_batch(batch.clone())?;
            match self.repository.add(product) {
                Ok(()) => {
                    tracing::info!(sku = %sku, batch_ref = %batch.reference(), "product created");
                    return Ok(());
                }
                // Someone else created it meanwhile; append to theirs.
                Err(RepositoryError::AlreadyExists(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        self.with_product(&sku, |product| Ok(product.add_batch(batch.clone())?))?;
        tracing::info!(sku = %sku, batch_ref = %batch.reference(), "batch added");
        Ok(())
    }

    /// Allocate an order line and return the reference of the batch it went to.
    pub fn allocate(&self, order_id: &str, sku: &str, qty: u32) -> Result<BatchRef, ServiceError> {
        let line = parse_line(order_id, sku, qty)?;

        let result = self.with_product(line.sku(), |product| Ok(product.allocate(&line)?));
        match &result {
            Ok(batch_ref) => tracing::info!(
                order_id = %line.order_id(),
                sku = %line.sku(),
                qty = line.qty(),
                batch_ref = %batch_ref,
                "order line allocated"
            ),
            Err(ServiceError::OutOfStock(sku)) => {
                tracing::warn!(order_id = %line.order_id(), sku = %sku, qty = line.qty(), "out of stock")
            }
            Err(_) => {}
        }
        result
    }

    /// Release a previously allocated line; `None` if it was not allocated.
    pub fn deallocate(
        &self,
        order_id: &str,
        sku: &str,
        qty: u32,
    ) -> Result<Option<BatchRef>, ServiceError> {
        let line = parse_line(order_id, sku, qty)?;
        let released = self.with_product(line.sku(), |product| Ok(product.deallocate(&line)))?;
        if let Some(batch_ref) = &released {
            tracing::info!(order_id = %line.order_id(), batch_ref = %batch_ref, "order line deallocated");
        }
        Ok(released)
    }

    /// Total free quantity for a SKU.
    pub fn available_quantity(&self, sku: &str) -> Result<u64, ServiceError> {
        let sku: Sku = sku.parse()?;
        let product = self
            .repository
            .get(&sku)?
            .ok_or(ServiceError::InvalidSku(sku))?;
        Ok(product.available_quantity())
    }

    /// Load → mutate → compare-and-swap save → publish, retrying on lost races.
    fn with_product<T>(
        &self,
        sku: &Sku,
        mut op: impl FnMut(&mut Product) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut attempt = 0u32;
        loop {
            let mut product = self
                .repository
                .get(sku)?
                .ok_or_else(|| ServiceError::InvalidSku(sku.clone()))?;
            let loaded_version = product.version();

            let value = match op(&mut product) {
                Ok(value) => value,
                Err(err) => {
                    // Nothing to save, but failures can still be facts worth publishing.
                    // The domain outcome wins over a publication failure.
                    if let Err(publish_err) = self.publish(&mut product) {
                        tracing::error!(sku = %sku, error = %publish_err, "failed to publish events");
                    }
                    return Err(err);
                }
            };

            if product.version() == loaded_version {
                return Ok(value);
            }

            match self
                .repository
                .save(&product, ExpectedVersion::Exact(loaded_version))
            {
                Ok(version) => {
                    tracing::debug!(sku = %sku, version, "product saved");
                    self.publish(&mut product)?;
                    return Ok(value);
                }
                Err(RepositoryError::Conflict(msg)) if attempt < self.config.max_conflict_retries => {
                    attempt += 1;
                    tracing::warn!(sku = %sku, attempt, "concurrent modification, retrying: {msg}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn publish(&self, product: &mut Product) -> Result<(), ServiceError> {
        let version = product.version();
        let sku = product.sku().clone();

        for event in product.take_events() {
            let envelope = EventEnvelope::wrap(PRODUCT_AGGREGATE_TYPE, sku.as_str(), version, event);
            self.bus
                .publish(envelope)
                .map_err(|e| ServiceError::Publish(format!("{e:?}")))?;
        }

        Ok(())
    }
}

fn parse_line(order_id: &str, sku: &str, qty: u32) -> Result<OrderLine, ServiceError> {
    let order_id: OrderId = order_id.parse()?;
    let sku: Sku = sku.parse()?;
    Ok(OrderLine::new(order_id, sku, qty)?)
}
