//! Stock allocation domain module.
//!
//! This crate contains the business rules for allocating order lines to batches of
//! stock, implemented purely as deterministic domain logic (no IO, no storage).

pub mod allocate;
pub mod batch;
pub mod error;
pub mod events;
pub mod order_line;
pub mod product;

pub use allocate::allocate;
pub use batch::{AllocationPriority, Batch};
pub use error::AllocationError;
pub use events::{Allocated, AllocationEvent, Deallocated, OutOfStock};
pub use order_line::OrderLine;
pub use product::Product;
