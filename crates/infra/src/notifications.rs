//! Side effects triggered by published allocation events.
//!
//! The aggregate only records that stock ran out; telling a human about it is a
//! handler subscribed on the message bus.

use std::sync::Arc;

use stockroom_allocation::AllocationEvent;
use stockroom_events::{EventEnvelope, EventHandler, HandlerRegistry};

use crate::config::AllocationConfig;

/// Outbound notification channel (mail, chat, pager, ...).
pub trait Notifier: Send + Sync {
    fn send(&self, recipient: &str, message: &str) -> anyhow::Result<()>;
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn send(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
        (**self).send(recipient, message)
    }
}

/// Notifier that only writes the notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn send(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
        tracing::info!(recipient, message, "notification sent");
        Ok(())
    }
}

/// Handler: tell the stock team a SKU ran out.
#[derive(Debug, Clone)]
pub struct OutOfStockNotification<N> {
    notifier: N,
    recipient: String,
}

impl<N> OutOfStockNotification<N> {
    pub fn new(notifier: N, recipient: impl Into<String>) -> Self {
        Self {
            notifier,
            recipient: recipient.into(),
        }
    }
}

impl<N: Notifier> EventHandler<AllocationEvent> for OutOfStockNotification<N> {
    fn handle(&self, envelope: &EventEnvelope<AllocationEvent>) -> anyhow::Result<()> {
        let AllocationEvent::OutOfStock(event) = envelope.payload() else {
            return Ok(());
        };
        self.notifier
            .send(&self.recipient, &format!("Out of stock for {}", event.sku))
    }
}

/// Registry with the standard handlers for allocation events.
pub fn default_handlers<N>(notifier: N, config: &AllocationConfig) -> HandlerRegistry<AllocationEvent>
where
    N: Notifier + 'static,
{
    let mut registry = HandlerRegistry::new();
    registry.subscribe(
        AllocationEvent::OUT_OF_STOCK,
        OutOfStockNotification::new(notifier, config.notification_recipient.clone()),
    );
    registry
}
