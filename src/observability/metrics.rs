use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub order_transitions_total: IntCounterVec,
    pub asset_toggles_total: IntCounterVec,
    pub orders_by_status: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let order_transitions_total = IntCounterVec::new(
            Opts::new(
                "order_transitions_total",
                "Order actions by action and outcome",
            ),
            &["action", "outcome"],
        )
        .expect("valid order_transitions_total metric");

        let asset_toggles_total = IntCounterVec::new(
            Opts::new(
                "asset_toggles_total",
                "Asset assignment toggles by class and outcome",
            ),
            &["class", "outcome"],
        )
        .expect("valid asset_toggles_total metric");

        let orders_by_status = IntGaugeVec::new(
            Opts::new("orders_by_status", "Current number of orders per status"),
            &["status"],
        )
        .expect("valid orders_by_status metric");

        registry
            .register(Box::new(order_transitions_total.clone()))
            .expect("register order_transitions_total");
        registry
            .register(Box::new(asset_toggles_total.clone()))
            .expect("register asset_toggles_total");
        registry
            .register(Box::new(orders_by_status.clone()))
            .expect("register orders_by_status");

        Self {
            registry,
            order_transitions_total,
            asset_toggles_total,
            orders_by_status,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
