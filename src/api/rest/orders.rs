use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::lifecycle::{transition_order, OrderAction};
use crate::engine::query::{
    active_orders, completed_orders, completed_summary, history_orders, CompletedSummary,
    OrderFilter,
};
use crate::error::AppError;
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/active", get(list_active))
        .route("/orders/completed", get(list_completed))
        .route("/orders/history", get(list_history))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/actions", post(apply_action))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct ActiveQuery {
    pub search: Option<String>,
    pub operation_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TryFrom<ActiveQuery> for OrderFilter {
    type Error = AppError;

    fn try_from(query: ActiveQuery) -> Result<Self, Self::Error> {
        Ok(OrderFilter {
            search: query.search,
            operation_type: query.operation_type,
            from: parse_bound("from", query.from.as_deref())?,
            to: parse_bound("to", query.to.as_deref())?,
        })
    }
}

/// Range bounds are ISO dates (`2025-03-12`); an empty value means unbounded.
fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {name} date: {raw}"))),
    }
}

#[derive(Serialize)]
pub struct CompletedResponse {
    pub summary: CompletedSummary,
    pub orders: Vec<Order>,
}

async fn list_active(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let filter = OrderFilter::try_from(query)?;
    Ok(Json(active_orders(&state.order_snapshot(), &filter)))
}

async fn list_completed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<CompletedResponse> {
    let orders = completed_orders(&state.order_snapshot(), query.search.as_deref());

    Json(CompletedResponse {
        summary: completed_summary(&orders),
        orders,
    })
}

async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Order>> {
    Json(history_orders(
        &state.order_snapshot(),
        query.search.as_deref(),
    ))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(order.value().clone()))
}

async fn apply_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(action): Json<OrderAction>,
) -> Result<Json<Order>, AppError> {
    let order = transition_order(&state, &id, &action, Utc::now())?;
    Ok(Json(order))
}
