use serde::{Deserialize, Serialize};

use stockroom_core::{BatchRef, OrderId, Sku};
use stockroom_events::Event;

/// Event: Allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocated {
    pub order_id: OrderId,
    pub sku: Sku,
    pub qty: u32,
    pub batch_ref: BatchRef,
}

/// Event: Deallocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deallocated {
    pub order_id: OrderId,
    pub sku: Sku,
    pub qty: u32,
    pub batch_ref: BatchRef,
}

/// Event: OutOfStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfStock {
    pub sku: Sku,
}

/// Facts recorded by the `Product` aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllocationEvent {
    Allocated(Allocated),
    Deallocated(Deallocated),
    OutOfStock(OutOfStock),
}

impl AllocationEvent {
    pub const ALLOCATED: &'static str = "allocation.allocated";
    pub const DEALLOCATED: &'static str = "allocation.deallocated";
    pub const OUT_OF_STOCK: &'static str = "allocation.out_of_stock";

    pub fn sku(&self) -> &Sku {
        match self {
            AllocationEvent::Allocated(e) => &e.sku,
            AllocationEvent::Deallocated(e) => &e.sku,
            AllocationEvent::OutOfStock(e) => &e.sku,
        }
    }
}

impl Event for AllocationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AllocationEvent::Allocated(_) => Self::ALLOCATED,
            AllocationEvent::Deallocated(_) => Self::DEALLOCATED,
            AllocationEvent::OutOfStock(_) => Self::OUT_OF_STOCK,
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
