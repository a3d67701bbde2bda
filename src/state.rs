use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::engine::registry::AssetRegistry;
use crate::models::asset::{Remooc, Vehicle};
use crate::models::driver::{Carrier, Driver};
use crate::models::event::OrderEvent;
use crate::models::order::{Order, OrderStatus};
use crate::observability::metrics::Metrics;
use crate::seed::SeedData;

pub struct AppState {
    pub carrier: Carrier,
    pub drivers: DashMap<String, Driver>,
    pub orders: DashMap<String, Order>,
    pub vehicles: AssetRegistry<Vehicle>,
    pub remoocs: AssetRegistry<Remooc>,
    pub default_driver_id: String,
    pub order_events_tx: broadcast::Sender<OrderEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(seed: SeedData, default_driver_id: String, event_buffer_size: usize) -> Self {
        let (order_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);
        let metrics = Metrics::new();

        for status in OrderStatus::ALL {
            let count = seed
                .orders
                .iter()
                .filter(|order| order.status == status)
                .count();
            metrics
                .orders_by_status
                .with_label_values(&[status.as_str()])
                .set(count as i64);
        }

        Self {
            carrier: seed.carrier,
            drivers: seed
                .drivers
                .into_iter()
                .map(|driver| (driver.id.clone(), driver))
                .collect(),
            orders: seed
                .orders
                .into_iter()
                .map(|order| (order.id.clone(), order))
                .collect(),
            vehicles: AssetRegistry::new(seed.vehicles),
            remoocs: AssetRegistry::new(seed.remoocs),
            default_driver_id,
            order_events_tx,
            metrics,
        }
    }

    pub fn order_snapshot(&self) -> Vec<Order> {
        self.orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
