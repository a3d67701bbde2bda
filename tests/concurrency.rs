use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use driver_desk::engine::lifecycle::{transition_order, OrderAction};
use driver_desk::error::AppError;
use driver_desk::models::asset::Asset;
use driver_desk::models::order::OrderStatus;
use driver_desk::seed::{self, DEFAULT_DRIVER_ID};
use driver_desk::state::AppState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Barrier;

const DRIVERS: [&str; 4] = ["DRV001", "DRV_OTHER", "DRV002", "DRV_NEW"];

fn shared_state() -> Arc<AppState> {
    let seed = seed::generate(&mut StdRng::seed_from_u64(7), Utc::now(), 3, 0);
    Arc::new(AppState::new(seed, DEFAULT_DRIVER_ID.to_string(), 1024))
}

fn most_held_by_one_driver<A: Asset>(assets: &[A]) -> usize {
    let mut held: HashMap<&str, usize> = HashMap::new();
    for driver in assets.iter().filter_map(|asset| asset.assigned_driver_id()) {
        *held.entry(driver).or_default() += 1;
    }
    held.into_values().max().unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_starts_on_one_order_let_exactly_one_through() {
    const CALLERS: usize = 16;

    let state = shared_state();
    let order_id = state
        .orders
        .iter()
        .find(|entry| entry.status == OrderStatus::Paid)
        .map(|entry| entry.key().clone())
        .unwrap();
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let state = state.clone();
            let order_id = order_id.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                transition_order(&state, &order_id, &OrderAction::StartOrder, Utc::now())
            })
        })
        .collect();

    let mut started = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::Unloading);
                started += 1;
            }
            Err(err) => assert!(matches!(err, AppError::InvalidTransition { .. })),
        }
    }

    assert_eq!(started, 1);
    let order = state.orders.get(&order_id).unwrap();
    assert_eq!(order.status, OrderStatus::Unloading);
    assert_eq!(order.current_events(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_a_driver_holding_two_of_a_class() {
    let state = shared_state();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let state = state.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut worst = 0;
            loop {
                let finished = done.load(Ordering::Acquire);
                let vehicles = state.vehicles.snapshot().await;
                let remoocs = state.remoocs.snapshot().await;
                worst = worst
                    .max(most_held_by_one_driver(&vehicles))
                    .max(most_held_by_one_driver(&remoocs));
                if finished {
                    break worst;
                }
                tokio::task::yield_now().await;
            }
        })
    };

    let writers: Vec<_> = (0..8u64)
        .map(|worker| {
            let state = state.clone();
            tokio::spawn(async move {
                let mut rng = StdRng::seed_from_u64(worker);
                for _ in 0..200 {
                    let driver = DRIVERS[rng.random_range(0..DRIVERS.len())];
                    let index = rng.random_range(1..=5);
                    let result = if rng.random_bool(0.5) {
                        state
                            .vehicles
                            .toggle(&format!("V00{index}"), driver, &state.metrics)
                            .await
                            .map(|_| ())
                    } else {
                        state
                            .remoocs
                            .toggle(&format!("R00{index}"), driver, &state.metrics)
                            .await
                            .map(|_| ())
                    };
                    if let Err(err) = result {
                        assert!(matches!(err, AppError::AssetBusy { .. }), "{err}");
                    }
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }
    done.store(true, Ordering::Release);

    assert_eq!(reader.await.unwrap(), 1);
}
