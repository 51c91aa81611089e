use stockroom_core::{AggregateRoot, BatchRef, DomainError, DomainResult, Sku};

use crate::allocate::allocate;
use crate::batch::Batch;
use crate::error::AllocationError;
use crate::events::{Allocated, AllocationEvent, Deallocated, OutOfStock};
use crate::order_line::OrderLine;

/// Aggregate root: Product.
///
/// Owns every batch of one SKU. Batches are only reachable read-only from outside;
/// all allocation goes through [`Product::allocate`].
#[derive(Debug, Clone)]
pub struct Product {
    sku: Sku,
    batches: Vec<Batch>,
    version_number: u64,
    events: Vec<AllocationEvent>,
}

impl Product {
    /// Product with no batches yet, at version 0.
    pub fn empty(sku: impl Into<Sku>) -> Self {
        Self {
            sku: sku.into(),
            batches: Vec::new(),
            version_number: 0,
            events: Vec::new(),
        }
    }

    /// Wrap existing batches. Every batch must carry this SKU and a unique reference.
    pub fn new(sku: impl Into<Sku>, batches: Vec<Batch>) -> DomainResult<Self> {
        let mut product = Self::empty(sku);
        for batch in batches {
            product.ensure_can_own(&batch)?;
            product.batches.push(batch);
        }
        Ok(product)
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn version_number(&self) -> u64 {
        self.version_number
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, reference: &BatchRef) -> Option<&Batch> {
        self.batches.iter().find(|b| b.reference() == reference)
    }

    /// Total quantity still free across all batches.
    pub fn available_quantity(&self) -> u64 {
        self.batches
            .iter()
            .map(|b| u64::from(b.available_quantity()))
            .sum()
    }

    /// Events recorded since the last [`Product::take_events`].
    pub fn pending_events(&self) -> &[AllocationEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<AllocationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn add_batch(&mut self, batch: Batch) -> DomainResult<()> {
        self.ensure_can_own(&batch)?;
        self.batches.push(batch);
        self.version_number += 1;
        Ok(())
    }

    /// Allocate `line` to the best batch of this product.
    ///
    /// A line that is already allocated here returns its current batch without any
    /// change. On success the version is bumped and `Allocated` recorded; when nothing
    /// fits `OutOfStock` is recorded, no batch changes and the version stays put.
    pub fn allocate(&mut self, line: &OrderLine) -> Result<BatchRef, AllocationError> {
        if let Some(holder) = self.batches.iter().find(|b| b.is_allocated(line)) {
            return Ok(holder.reference().clone());
        }

        match allocate(line, &mut self.batches) {
            Ok(batch_ref) => {
                self.version_number += 1;
                self.events.push(AllocationEvent::Allocated(Allocated {
                    order_id: line.order_id().clone(),
                    sku: line.sku().clone(),
                    qty: line.qty(),
                    batch_ref: batch_ref.clone(),
                }));
                Ok(batch_ref)
            }
            Err(err) => {
                self.events.push(AllocationEvent::OutOfStock(OutOfStock {
                    sku: line.sku().clone(),
                }));
                Err(err)
            }
        }
    }

    /// Release `line` from whichever batch holds it, returning that batch's reference.
    pub fn deallocate(&mut self, line: &OrderLine) -> Option<BatchRef> {
        let batch = self.batches.iter_mut().find(|b| b.is_allocated(line))?;
        batch.deallocate(line);
        let batch_ref = batch.reference().clone();

        self.version_number += 1;
        self.events.push(AllocationEvent::Deallocated(Deallocated {
            order_id: line.order_id().clone(),
            sku: line.sku().clone(),
            qty: line.qty(),
            batch_ref: batch_ref.clone(),
        }));
        Some(batch_ref)
    }

    fn ensure_can_own(&self, batch: &Batch) -> DomainResult<()> {
        if *batch.sku() != self.sku {
            return Err(DomainError::invariant(format!(
                "batch {} has sku {}, product is {}",
                batch.reference(),
                batch.sku(),
                self.sku
            )));
        }
        if self.batch(batch.reference()).is_some() {
            return Err(DomainError::conflict(format!(
                "batch {} already exists",
                batch.reference()
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }

    fn version(&self) -> u64 {
        self.version_number
    }
}
