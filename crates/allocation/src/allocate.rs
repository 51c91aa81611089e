//! The allocation policy: take stock that is already on hand before any shipment,
//! and among shipments take the earliest arrival.

use stockroom_core::BatchRef;

use crate::batch::Batch;
use crate::error::AllocationError;
use crate::order_line::OrderLine;

/// Allocate `line` to the best-ranked batch that can hold it and return that batch's
/// reference.
///
/// Candidates are not pre-filtered by SKU; `Batch::can_allocate` rejects mismatches.
/// Equally ranked batches are tried in slice order, and the slice itself is not
/// reordered. Fails with [`AllocationError::OutOfStock`] (mutating nothing) when no
/// candidate fits, including when `batches` is empty.
pub fn allocate(line: &OrderLine, batches: &mut [Batch]) -> Result<BatchRef, AllocationError> {
    // min_by_key keeps the first of equal minima, which makes ties stable.
    let batch = batches
        .iter_mut()
        .filter(|b| b.can_allocate(line))
        .min_by_key(|b| b.priority())
        .ok_or_else(|| AllocationError::out_of_stock(line.sku().clone()))?;

    batch.allocate(line);
    Ok(batch.reference().clone())
}
