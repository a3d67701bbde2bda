use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::api::rest::driver::ActingDriver;
use crate::engine::query::search_assets;
use crate::error::AppError;
use crate::models::asset::{Remooc, Vehicle};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/:id/toggle", post(toggle_vehicle))
        .route("/remoocs", get(list_remoocs))
        .route("/remoocs/:id/toggle", post(toggle_remooc))
}

#[derive(Deserialize)]
pub struct AssetQuery {
    pub search: Option<String>,
}

async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AssetQuery>,
) -> Json<Vec<Vehicle>> {
    let vehicles = state.vehicles.snapshot().await;
    Json(search_assets(&vehicles, query.search.as_deref()))
}

async fn list_remoocs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AssetQuery>,
) -> Json<Vec<Remooc>> {
    let remoocs = state.remoocs.snapshot().await;
    Json(search_assets(&remoocs, query.search.as_deref()))
}

async fn toggle_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ActingDriver(driver_id): ActingDriver,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = state
        .vehicles
        .toggle(&id, &driver_id, &state.metrics)
        .await?;
    Ok(Json(vehicles))
}

async fn toggle_remooc(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ActingDriver(driver_id): ActingDriver,
) -> Result<Json<Vec<Remooc>>, AppError> {
    let remoocs = state
        .remoocs
        .toggle(&id, &driver_id, &state.metrics)
        .await?;
    Ok(Json(remoocs))
}
