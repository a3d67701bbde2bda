use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::error::AppError;
use crate::models::asset::{Remooc, Vehicle};
use crate::models::driver::{Carrier, Driver};
use crate::state::AppState;

pub const DRIVER_HEADER: &str = "x-driver-id";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(profile))
}

/// The driver on whose behalf a request acts.
///
/// Identity is vouched for upstream; a request without the header acts as the
/// configured default driver.
pub struct ActingDriver(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ActingDriver {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(DRIVER_HEADER) else {
            return Ok(Self(state.default_driver_id.clone()));
        };

        let driver_id = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("{DRIVER_HEADER} is not valid text")))?
            .trim();

        if driver_id.is_empty() {
            return Err(AppError::BadRequest(format!("{DRIVER_HEADER} cannot be empty")));
        }

        Ok(Self(driver_id.to_string()))
    }
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub driver: Driver,
    pub carrier: Carrier,
    pub vehicle: Option<Vehicle>,
    pub remooc: Option<Remooc>,
}

async fn profile(
    State(state): State<Arc<AppState>>,
    ActingDriver(driver_id): ActingDriver,
) -> Result<Json<ProfileResponse>, AppError> {
    let driver = state
        .drivers
        .get(&driver_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

    Ok(Json(ProfileResponse {
        driver,
        carrier: state.carrier.clone(),
        vehicle: state.vehicles.held_by(&driver_id).await,
        remooc: state.remoocs.held_by(&driver_id).await,
    }))
}
