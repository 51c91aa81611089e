//! Integration tests for the full allocation pipeline.
//!
//! Tests: AllocationService → ProductRepository → EventBus → HandlerRegistry → Notifier
//!
//! Verifies:
//! - Allocations and out-of-stock outcomes reach subscribed handlers
//! - Unknown SKUs are rejected before anything is published
//! - Concurrent allocations never over-allocate a product

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use chrono::NaiveDate;

    use stockroom_allocation::AllocationEvent;
    use stockroom_core::Sku;
    use stockroom_events::{EventBus, EventEnvelope, InMemoryEventBus};

    use crate::config::AllocationConfig;
    use crate::notifications::{Notifier, default_handlers};
    use crate::repository::{InMemoryProductRepository, ProductRepository};
    use crate::services::{AllocationService, ServiceError};

    type Bus = Arc<InMemoryEventBus<EventEnvelope<AllocationEvent>>>;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, recipient: &str, message: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn service(config: AllocationConfig) -> AllocationService<InMemoryProductRepository, Bus> {
        stockroom_observability::init();
        AllocationService::new(InMemoryProductRepository::new(), Arc::new(InMemoryEventBus::new()), config)
    }

    #[test]
    fn out_of_stock_reaches_the_notifier() {
        let config = AllocationConfig::default();
        let service = service(config.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let registry = default_handlers(notifier.clone(), &config);

        // Subscribe BEFORE anything is published.
        let subscription = service.bus().subscribe();

        service.add_batch("b1", "POPULAR-CURTAINS", 9, None).unwrap();
        let err = service.allocate("o1", "POPULAR-CURTAINS", 10).unwrap_err();
        assert!(matches!(err, ServiceError::OutOfStock(_)));

        assert_eq!(registry.drain(&subscription).unwrap(), 1);
        assert_eq!(notifier.messages(), vec!["Out of stock for POPULAR-CURTAINS".to_string()]);
        assert_eq!(
            notifier.sent.lock().unwrap()[0].0,
            config.notification_recipient
        );
    }

    #[test]
    fn worker_thread_handles_published_events() {
        let config = AllocationConfig::default();
        let service = service(config.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let registry = default_handlers(notifier.clone(), &config);
        let subscription = service.bus().subscribe();

        let worker = thread::spawn(move || {
            let mut seen = Vec::new();
            while let Ok(envelope) = subscription.recv_timeout(Duration::from_secs(1)) {
                registry.handle(&envelope).unwrap();
                seen.push(envelope.event_type());
                if seen.len() == 3 {
                    break;
                }
            }
            seen
        });

        let eta = NaiveDate::from_ymd_opt(2026, 3, 15);
        service.add_batch("in-stock", "RETRO-CLOCK", 10, None).unwrap();
        service.add_batch("shipment", "RETRO-CLOCK", 10, eta).unwrap();

        assert_eq!(service.allocate("o1", "RETRO-CLOCK", 8).unwrap().as_str(), "in-stock");
        assert_eq!(service.allocate("o2", "RETRO-CLOCK", 8).unwrap().as_str(), "shipment");
        assert!(service.allocate("o3", "RETRO-CLOCK", 8).is_err());

        let seen = worker.join().unwrap();
        assert_eq!(
            seen,
            vec![
                AllocationEvent::ALLOCATED,
                AllocationEvent::ALLOCATED,
                AllocationEvent::OUT_OF_STOCK
            ]
        );
        assert_eq!(notifier.messages(), vec!["Out of stock for RETRO-CLOCK".to_string()]);
    }

    #[test]
    fn unknown_sku_is_rejected_without_side_effects() {
        let service = service(AllocationConfig::default());
        let subscription = service.bus().subscribe();
        service.add_batch("b1", "AREALSKU", 100, None).unwrap();
        while subscription.try_recv().is_ok() {}

        let err = service.allocate("o1", "NONEXISTENTSKU", 10).unwrap_err();

        assert_eq!(err.to_string(), "Invalid sku NONEXISTENTSKU");
        assert!(subscription.try_recv().is_err());
        assert!(service.repository().get(&Sku::new("NONEXISTENTSKU")).unwrap().is_none());
    }

    #[test]
    fn concurrent_allocations_never_over_allocate() {
        let config = AllocationConfig {
            max_conflict_retries: 10_000,
            ..AllocationConfig::default()
        };
        let service = service(config);
        service.add_batch("b1", "LAMP", 30, None).unwrap();
        service.add_batch("b2", "LAMP", 20, None).unwrap();

        let outcomes: Vec<Result<_, ServiceError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|worker| {
                    let service = &service;
                    scope.spawn(move || {
                        (0..10)
                            .map(|n| service.allocate(&format!("order-{worker}-{n}"), "LAMP", 1))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        let allocated = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        let out_of_stock = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Err(ServiceError::OutOfStock(_))))
            .count();
        assert_eq!(allocated, 50);
        assert_eq!(out_of_stock, 30);

        let product = service.repository().get(&Sku::new("LAMP")).unwrap().unwrap();
        assert_eq!(product.available_quantity(), 0);
        assert!(product.batches().iter().all(|b| b.allocated_quantity() <= b.purchased_quantity()));
    }
}
