//! Routing of published envelopes to the handlers subscribed to their event type.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::{Event, EventEnvelope, Subscription};

/// Reacts to one published event (side effects live here, never in aggregates).
///
/// Handler failures are heterogeneous (mail relay down, template missing, ...), so
/// they are reported as `anyhow::Error`.
pub trait EventHandler<E>: Send + Sync {
    fn handle(&self, envelope: &EventEnvelope<E>) -> anyhow::Result<()>;
}

impl<E, F> EventHandler<E> for F
where
    F: Fn(&EventEnvelope<E>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, envelope: &EventEnvelope<E>) -> anyhow::Result<()> {
        self(envelope)
    }
}

/// One or more handlers failed for an envelope.
///
/// The remaining handlers for the same envelope still ran. `message_id` identifies the
/// envelope so it can be looked up or republished.
#[derive(Debug, Error)]
#[error("{} handler(s) failed for {event_type} ({message_id})", .failures.len())]
pub struct HandlerError {
    pub event_type: &'static str,
    pub message_id: Uuid,
    pub failures: Vec<anyhow::Error>,
}

/// Event type → handlers map.
pub struct HandlerRegistry<E> {
    handlers: HashMap<&'static str, Vec<Box<dyn EventHandler<E>>>>,
}

impl<E> Default for HandlerRegistry<E> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<E> core::fmt::Debug for HandlerRegistry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut counts: Vec<(&str, usize)> =
            self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_unstable();
        f.debug_struct("HandlerRegistry").field("handlers", &counts).finish()
    }
}

impl<E: Event> HandlerRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every envelope whose payload has `event_type`.
    pub fn subscribe(
        &mut self,
        event_type: &'static str,
        handler: impl EventHandler<E> + 'static,
    ) -> &mut Self {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Run every handler registered for the envelope's event type, in registration order.
    ///
    /// Returns how many handlers ran. Event types nobody subscribed to are not an error.
    pub fn handle(&self, envelope: &EventEnvelope<E>) -> Result<usize, HandlerError> {
        let event_type = envelope.event_type();
        let Some(handlers) = self.handlers.get(event_type) else {
            tracing::debug!(event_type, "no handlers registered");
            return Ok(0);
        };

        let mut failures = Vec::new();
        for handler in handlers {
            if let Err(err) = handler.handle(envelope) {
                tracing::warn!(
                    event_type,
                    message_id = %envelope.message_id(),
                    published_at = %envelope.published_at(),
                    error = %err,
                    "event handler failed"
                );
                failures.push(err);
            }
        }

        if failures.is_empty() {
            Ok(handlers.len())
        } else {
            Err(HandlerError {
                event_type,
                message_id: envelope.message_id(),
                failures,
            })
        }
    }

    /// Handle every envelope currently queued on `subscription` without blocking.
    ///
    /// Stops at the first envelope with a failing handler. That envelope has already been
    /// taken off the subscription and is not redelivered; the error carries its
    /// `message_id`. Later envelopes stay queued.
    pub fn drain(&self, subscription: &Subscription<EventEnvelope<E>>) -> Result<usize, HandlerError> {
        let mut handled = 0;
        while let Ok(envelope) = subscription.try_recv() {
            self.handle(&envelope)?;
            handled += 1;
        }
        Ok(handled)
    }
}
