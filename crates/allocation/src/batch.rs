use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;

use stockroom_core::{BatchRef, Entity, Sku};

use crate::order_line::OrderLine;

/// Sort key deciding which batch an order line is taken from first.
///
/// Variant order is the ranking: stock already in the warehouse beats any shipment,
/// and shipments rank by arrival date, earliest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AllocationPriority {
    InStock,
    Shipment(NaiveDate),
}

impl From<Option<NaiveDate>> for AllocationPriority {
    fn from(eta: Option<NaiveDate>) -> Self {
        match eta {
            None => AllocationPriority::InStock,
            Some(date) => AllocationPriority::Shipment(date),
        }
    }
}

/// A purchased lot of stock for one SKU.
///
/// Entity: two batches are the same batch iff their references match, whatever
/// their allocations look like.
#[derive(Debug, Clone)]
pub struct Batch {
    reference: BatchRef,
    sku: Sku,
    eta: Option<NaiveDate>,
    purchased_quantity: u32,
    allocations: HashSet<OrderLine>,
}

impl Batch {
    /// `eta = None` means the stock is on hand now.
    pub fn new(
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        purchased_quantity: u32,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity,
            allocations: HashSet::new(),
        }
    }

    pub fn reference(&self) -> &BatchRef {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> u32 {
        self.purchased_quantity
    }

    pub fn allocated_quantity(&self) -> u32 {
        self.allocations.iter().map(OrderLine::qty).sum()
    }

    pub fn available_quantity(&self) -> u32 {
        // allocate() never lets allocations exceed the purchased quantity.
        self.purchased_quantity - self.allocated_quantity()
    }

    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> {
        self.allocations.iter()
    }

    pub fn is_allocated(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == *line.sku() && line.qty() <= self.available_quantity()
    }

    /// Allocate `line` if it fits; otherwise do nothing.
    ///
    /// Returns whether the allocation set changed. Allocating a line that is already
    /// held is a no-op.
    pub fn allocate(&mut self, line: &OrderLine) -> bool {
        if !self.can_allocate(line) {
            return false;
        }
        self.allocations.insert(line.clone())
    }

    /// Release `line` if this batch holds it. Returns whether anything was removed.
    pub fn deallocate(&mut self, line: &OrderLine) -> bool {
        self.allocations.remove(line)
    }

    pub fn priority(&self) -> AllocationPriority {
        AllocationPriority::from(self.eta)
    }

    /// `Less` means `self` should be allocated from before `other`.
    pub fn cmp_priority(&self, other: &Batch) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}

impl core::hash::Hash for Batch {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl Entity for Batch {
    type Id = BatchRef;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}
