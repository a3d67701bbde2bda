// Property-based checks of the order lifecycle and asset assignment invariants

use chrono::{TimeZone, Utc};
use driver_desk::engine::lifecycle::{apply_transition, OrderAction};
use driver_desk::engine::registry::toggle_assignment;
use driver_desk::error::AppError;
use driver_desk::models::asset::{Asset, Remooc, Vehicle};
use driver_desk::models::order::{Order, OrderStatus};
use driver_desk::seed;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DRIVERS: [&str; 4] = ["DRV001", "DRV_OTHER", "DRV002", "DRV_NEW"];

fn paid_order() -> Order {
    let now = Utc.with_ymd_and_hms(2025, 3, 4, 8, 0, 0).unwrap();
    seed::generate(&mut StdRng::seed_from_u64(5), now, 1, 0)
        .orders
        .remove(0)
}

fn action_strategy() -> impl Strategy<Value = OrderAction> {
    prop_oneof![
        Just(OrderAction::StartOrder),
        Just(OrderAction::ClearSeal),
        Just(OrderAction::DropContainer),
        "[A-Z0-9 ]{0,6}".prop_map(|seal_number| OrderAction::RecordSeal { seal_number }),
        Just(OrderAction::AttachProof {
            pod_image: "pod.jpg".to_string()
        }),
        Just(OrderAction::AttachProof {
            pod_image: String::new()
        }),
        Just(OrderAction::CompleteOrder { pod_image: None }),
        Just(OrderAction::CompleteOrder {
            pod_image: Some("pod.jpg".to_string())
        }),
    ]
}

fn toggle_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..5, 0usize..DRIVERS.len()), 0..40)
}

fn assert_exclusive<A: Asset>(assets: &[A]) -> Result<(), TestCaseError> {
    for driver in DRIVERS {
        let held = assets.iter().filter(|asset| asset.is_held_by(driver)).count();
        prop_assert!(held <= 1, "{driver} holds {held} assets");
    }
    Ok(())
}

fn run_toggles<A: Asset>(mut assets: Vec<A>, steps: &[(usize, usize)]) -> Result<(), TestCaseError> {
    for &(asset_index, driver_index) in steps {
        let asset_id = assets[asset_index].id().to_string();
        let driver = DRIVERS[driver_index];
        let holder = assets[asset_index].assigned_driver_id().map(str::to_string);

        match toggle_assignment(&asset_id, driver, &assets) {
            Ok((next, _)) => {
                let now_held = next[asset_index].assigned_driver_id();
                if holder.as_deref() == Some(driver) {
                    prop_assert_eq!(now_held, None);
                } else {
                    prop_assert_eq!(holder, None);
                    prop_assert_eq!(now_held, Some(driver));
                }
                assets = next;
            }
            Err(AppError::AssetBusy { holder: busy_holder, .. }) => {
                prop_assert_eq!(Some(busy_holder), holder);
            }
            Err(other) => return Err(TestCaseError::fail(format!("unexpected {other}"))),
        }

        assert_exclusive(&assets)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn at_most_one_current_event_after_any_actions(
        actions in prop::collection::vec(action_strategy(), 0..30)
    ) {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        let mut order = paid_order();

        for action in &actions {
            match apply_transition(&order, action, now) {
                Ok(next) => {
                    prop_assert!(next.current_events() <= 1);
                    if !next.status.is_terminal() {
                        prop_assert_eq!(next.current_events(), 1);
                    }
                    order = next;
                }
                Err(err) => {
                    let is_invalid_transition = matches!(err, AppError::InvalidTransition { .. });
                    prop_assert!(is_invalid_transition);
                }
            }
        }
    }

    #[test]
    fn drop_without_seal_always_fails(
        actions in prop::collection::vec(action_strategy(), 0..20)
    ) {
        let now = Utc::now();
        let mut order = paid_order();

        for action in &actions {
            if let Ok(next) = apply_transition(&order, action, now) {
                order = next;
            }

            if order.seal_number.is_none() {
                let result = apply_transition(&order, &OrderAction::DropContainer, now);
                let is_invalid_transition = matches!(result, Err(AppError::InvalidTransition { .. }));
                prop_assert!(is_invalid_transition);
            }
        }
    }

    #[test]
    fn completion_requires_proof(
        actions in prop::collection::vec(action_strategy(), 0..20)
    ) {
        let now = Utc::now();
        let mut order = paid_order();

        for action in &actions {
            let pod_before = order.pod_image.clone();
            if let Ok(next) = apply_transition(&order, action, now) {
                if next.status == OrderStatus::Completed && order.status != OrderStatus::Completed {
                    let proof_supplied = pod_before.is_some()
                        || matches!(action, OrderAction::CompleteOrder { pod_image: Some(_) });
                    prop_assert!(proof_supplied);
                    prop_assert!(next.pod_image.is_some());
                }
                order = next;
            }
        }
    }

    #[test]
    fn vehicles_stay_exclusive(steps in toggle_strategy()) {
        let vehicles: Vec<Vehicle> = seed::initial_vehicles();
        run_toggles(vehicles, &steps)?;
    }

    #[test]
    fn remoocs_stay_exclusive(steps in toggle_strategy()) {
        let remoocs: Vec<Remooc> = seed::initial_remoocs();
        run_toggles(remoocs, &steps)?;
    }
}
