use thiserror::Error;

use stockroom_core::Sku;

/// Expected business outcome of an allocation attempt, not a defect.
///
/// Callers decide what it means for the customer (backorder, notification, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// No candidate batch could satisfy the line.
    #[error("Out of stock for sku {sku}")]
    OutOfStock { sku: Sku },
}

impl AllocationError {
    pub fn out_of_stock(sku: Sku) -> Self {
        Self::OutOfStock { sku }
    }

    pub fn sku(&self) -> &Sku {
        match self {
            AllocationError::OutOfStock { sku } => sku,
        }
    }
}
