use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::asset::Asset;
use crate::observability::metrics::Metrics;

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The driver now holds the asset; `released` is what they gave up for it.
    Assigned { released: Option<String> },
    Released,
}

impl ToggleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Assigned { .. } => "assigned",
            ToggleOutcome::Released => "released",
        }
    }
}

/// Flips `driver_id`'s hold on the asset `asset_id`.
///
/// A free asset is taken and whatever else of the same class the driver held
/// is released in the same step; an asset the driver already holds is
/// released. An asset held by someone else is left alone.
pub fn toggle_assignment<A: Asset>(
    asset_id: &str,
    driver_id: &str,
    assets: &[A],
) -> Result<(Vec<A>, ToggleOutcome), AppError> {
    let target = assets
        .iter()
        .find(|asset| asset.id() == asset_id)
        .ok_or_else(|| AppError::NotFound(format!("{} {asset_id} not found", A::CLASS)))?;

    match target.assigned_driver_id() {
        Some(holder) if holder == driver_id => {
            let next = assets
                .iter()
                .map(|asset| {
                    let mut asset = asset.clone();
                    if asset.id() == asset_id {
                        asset.set_assigned_driver_id(None);
                    }
                    asset
                })
                .collect();
            Ok((next, ToggleOutcome::Released))
        }
        Some(holder) => Err(AppError::AssetBusy {
            asset_id: asset_id.to_string(),
            holder: holder.to_string(),
        }),
        None => {
            let mut released = None;
            let next = assets
                .iter()
                .map(|asset| {
                    let mut asset = asset.clone();
                    if asset.id() == asset_id {
                        asset.set_assigned_driver_id(Some(driver_id.to_string()));
                    } else if asset.is_held_by(driver_id) {
                        released = Some(asset.id().to_string());
                        asset.set_assigned_driver_id(None);
                    }
                    asset
                })
                .collect();
            Ok((next, ToggleOutcome::Assigned { released }))
        }
    }
}

/// The shared collection of one asset class.
///
/// Every toggle swaps in a whole new collection under the write lock, so a
/// reader sees the driver's holdings either before or after a swap, never
/// halfway through it.
pub struct AssetRegistry<A: Asset> {
    assets: RwLock<Vec<A>>,
}

impl<A: Asset> AssetRegistry<A> {
    pub fn new(assets: Vec<A>) -> Self {
        Self {
            assets: RwLock::new(assets),
        }
    }

    pub async fn snapshot(&self) -> Vec<A> {
        self.assets.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn held_by(&self, driver_id: &str) -> Option<A> {
        self.assets
            .read()
            .await
            .iter()
            .find(|asset| asset.is_held_by(driver_id))
            .cloned()
    }

    pub async fn toggle(
        &self,
        asset_id: &str,
        driver_id: &str,
        metrics: &Metrics,
    ) -> Result<Vec<A>, AppError> {
        let mut assets = self.assets.write().await;

        match toggle_assignment(asset_id, driver_id, assets.as_slice()) {
            Ok((next, outcome)) => {
                *assets = next.clone();
                metrics
                    .asset_toggles_total
                    .with_label_values(&[A::CLASS.as_str(), outcome.as_str()])
                    .inc();

                match outcome {
                    ToggleOutcome::Assigned { released } => info!(
                        class = A::CLASS.as_str(),
                        asset_id,
                        driver_id,
                        released = released.as_deref().unwrap_or("none"),
                        "asset assigned"
                    ),
                    ToggleOutcome::Released => {
                        info!(class = A::CLASS.as_str(), asset_id, driver_id, "asset released")
                    }
                }

                Ok(next)
            }
            Err(err) => {
                metrics
                    .asset_toggles_total
                    .with_label_values(&[A::CLASS.as_str(), err.kind()])
                    .inc();
                warn!(class = A::CLASS.as_str(), asset_id, driver_id, error = %err, "asset toggle rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{toggle_assignment, AssetRegistry, ToggleOutcome};
    use crate::error::AppError;
    use crate::models::asset::{Asset, Remooc, Vehicle, VehicleKind};
    use crate::observability::metrics::Metrics;

    fn vehicle(id: &str, holder: Option<&str>) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate_number: format!("51C-{id}"),
            kind: VehicleKind::Container,
            brand: "HINO".to_string(),
            expiry_date: "2026-05-20".to_string(),
            carrier_id: "C001".to_string(),
            assigned_driver_id: holder.map(str::to_string),
        }
    }

    fn remooc(id: &str, holder: Option<&str>) -> Remooc {
        Remooc {
            id: id.to_string(),
            code: format!("RM-{id}"),
            kind: "40ft flatbed".to_string(),
            expiry_date: "2026-01-15".to_string(),
            carrier_id: "C001".to_string(),
            assigned_driver_id: holder.map(str::to_string),
        }
    }

    fn holder_of<A: Asset>(assets: &[A], id: &str) -> Option<String> {
        assets
            .iter()
            .find(|asset| asset.id() == id)
            .and_then(|asset| asset.assigned_driver_id().map(str::to_string))
    }

    #[test]
    fn free_vehicle_goes_to_the_caller() {
        let fleet = vec![vehicle("V1", None)];

        let (next, outcome) = toggle_assignment("V1", "D1", &fleet).unwrap();

        assert_eq!(holder_of(&next, "V1").as_deref(), Some("D1"));
        assert_eq!(outcome, ToggleOutcome::Assigned { released: None });
    }

    #[test]
    fn taking_a_new_vehicle_releases_the_old_one() {
        let fleet = vec![vehicle("V1", Some("D1")), vehicle("V2", None)];

        let (next, outcome) = toggle_assignment("V2", "D1", &fleet).unwrap();

        assert_eq!(holder_of(&next, "V1"), None);
        assert_eq!(holder_of(&next, "V2").as_deref(), Some("D1"));
        assert_eq!(
            outcome,
            ToggleOutcome::Assigned {
                released: Some("V1".to_string())
            }
        );
    }

    #[test]
    fn busy_vehicle_is_rejected_and_kept() {
        let fleet = vec![vehicle("V1", Some("D1"))];

        let err = toggle_assignment("V1", "D2", &fleet).unwrap_err();

        assert_eq!(
            err,
            AppError::AssetBusy {
                asset_id: "V1".to_string(),
                holder: "D1".to_string(),
            }
        );
        assert_eq!(holder_of(&fleet, "V1").as_deref(), Some("D1"));
    }

    #[test]
    fn toggling_twice_releases_then_reassigns() {
        let fleet = vec![vehicle("V1", Some("D1"))];

        let (released, first) = toggle_assignment("V1", "D1", &fleet).unwrap();
        let (reassigned, second) = toggle_assignment("V1", "D1", &released).unwrap();

        assert_eq!(first, ToggleOutcome::Released);
        assert_eq!(holder_of(&released, "V1"), None);
        assert_eq!(second, ToggleOutcome::Assigned { released: None });
        assert_eq!(holder_of(&reassigned, "V1").as_deref(), Some("D1"));
    }

    #[test]
    fn other_drivers_assets_are_untouched() {
        let trailers = vec![
            remooc("R1", Some("D1")),
            remooc("R2", Some("D2")),
            remooc("R3", None),
        ];

        let (next, _) = toggle_assignment("R3", "D1", &trailers).unwrap();

        assert_eq!(holder_of(&next, "R1"), None);
        assert_eq!(holder_of(&next, "R2").as_deref(), Some("D2"));
        assert_eq!(holder_of(&next, "R3").as_deref(), Some("D1"));
    }

    #[test]
    fn unknown_asset_is_not_found() {
        let fleet = vec![vehicle("V1", None)];

        let result = toggle_assignment("V9", "D1", &fleet);

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn registry_swaps_in_the_new_collection() {
        let registry = AssetRegistry::new(vec![vehicle("V1", Some("D1")), vehicle("V2", None)]);
        let metrics = Metrics::new();

        registry.toggle("V2", "D1", &metrics).await.unwrap();

        assert_eq!(registry.held_by("D1").await.map(|v| v.id), Some("V2".to_string()));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn registry_keeps_state_on_rejection() {
        let registry = AssetRegistry::new(vec![vehicle("V1", Some("D1"))]);
        let metrics = Metrics::new();

        let result = registry.toggle("V1", "D2", &metrics).await;

        assert!(matches!(result, Err(AppError::AssetBusy { .. })));
        assert_eq!(registry.held_by("D1").await.map(|v| v.id), Some("V1".to_string()));
        assert!(registry.held_by("D2").await.is_none());
    }
}
