//! `stockroom-events`: message mechanics (no business rules).
//!
//! Domain modules define their event types and implement [`Event`]; this crate
//! provides the envelope they travel in, a pub/sub bus, and a registry that routes
//! envelopes to handlers by event type.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::{EventHandler, HandlerError, HandlerRegistry};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
