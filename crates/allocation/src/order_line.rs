use serde::Serialize;

use stockroom_core::{DomainError, DomainResult, OrderId, Sku, ValueObject};

/// An order's request for a quantity of one SKU.
///
/// Value object: equal iff order id, SKU and quantity are all equal, immutable after
/// construction, and hashable so batches can hold their allocations in a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderLine {
    order_id: OrderId,
    sku: Sku,
    qty: u32,
}

impl OrderLine {
    /// Build a line. A zero quantity is rejected; `u32` already rules out negatives.
    pub fn new(order_id: impl Into<OrderId>, sku: impl Into<Sku>, qty: u32) -> DomainResult<Self> {
        if qty == 0 {
            return Err(DomainError::validation("order line quantity must be positive"));
        }
        Ok(Self {
            order_id: order_id.into(),
            sku: sku.into(),
            qty,
        })
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }
}

impl ValueObject for OrderLine {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equal_by_value() {
        let a = OrderLine::new("o1", "SMALL-TABLE", 2).unwrap();
        let b = OrderLine::new("o1", "SMALL-TABLE", 2).unwrap();
        let c = OrderLine::new("o1", "SMALL-TABLE", 3).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn duplicates_collapse_in_a_set() {
        let mut set = HashSet::new();
        set.insert(OrderLine::new("o1", "LAMP", 1).unwrap());
        set.insert(OrderLine::new("o1", "LAMP", 1).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = OrderLine::new("o1", "LAMP", 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
