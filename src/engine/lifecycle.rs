use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::event::OrderEvent;
use crate::models::order::{
    display_time, EventStatus, Order, OrderStatus, TimelineEvent, TimelineStep,
};
use crate::state::AppState;

/// Something the driver does to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderAction {
    StartOrder,
    RecordSeal {
        seal_number: String,
    },
    ClearSeal,
    DropContainer,
    AttachProof {
        pod_image: String,
    },
    CompleteOrder {
        #[serde(default)]
        pod_image: Option<String>,
    },
}

impl OrderAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrderAction::StartOrder => "start_order",
            OrderAction::RecordSeal { .. } => "record_seal",
            OrderAction::ClearSeal => "clear_seal",
            OrderAction::DropContainer => "drop_container",
            OrderAction::AttachProof { .. } => "attach_proof",
            OrderAction::CompleteOrder { .. } => "complete_order",
        }
    }
}

/// Computes the order that results from applying `action` at `now`.
///
/// The input is never touched; on rejection the caller still holds the
/// unchanged order. Only the timeline timestamps depend on `now`.
pub fn apply_transition(
    order: &Order,
    action: &OrderAction,
    now: DateTime<Utc>,
) -> Result<Order, AppError> {
    let reject = |reason: &'static str| AppError::InvalidTransition {
        action: action.name(),
        status: order.status,
        reason,
    };

    let mut next = order.clone();

    match (order.status, action) {
        (status, OrderAction::StartOrder) if status.is_awaiting_start() => {
            advance_to(&mut next, TimelineStep::DriverMoving, now)?;
            next.status = OrderStatus::Unloading;
        }
        (OrderStatus::Unloading, OrderAction::RecordSeal { seal_number }) => {
            if order.seal_number.is_some() {
                return Err(reject("seal number already recorded"));
            }
            let seal_number = seal_number.trim();
            if seal_number.is_empty() {
                return Err(reject("seal number is empty"));
            }
            next.seal_number = Some(seal_number.to_string());
        }
        (OrderStatus::Unloading, OrderAction::ClearSeal) => {
            next.seal_number = None;
        }
        (_, OrderAction::DropContainer) if order.seal_number.is_none() => {
            return Err(reject("seal number required"));
        }
        (OrderStatus::Unloading, OrderAction::DropContainer) => {
            advance_to(&mut next, TimelineStep::DriverMoving, now)?;
            next.status = OrderStatus::InTransit;
        }
        (OrderStatus::InTransit, OrderAction::AttachProof { pod_image }) => {
            let pod_image = pod_image.trim();
            if pod_image.is_empty() {
                return Err(reject("proof of delivery is empty"));
            }
            next.pod_image = Some(pod_image.to_string());
        }
        (OrderStatus::InTransit, OrderAction::CompleteOrder { pod_image }) => {
            if let Some(image) = pod_image.as_deref().map(str::trim) {
                if !image.is_empty() {
                    next.pod_image = Some(image.to_string());
                }
            }
            if next.pod_image.is_none() {
                return Err(reject("proof of delivery required"));
            }
            finish(&mut next, now)?;
            next.status = OrderStatus::Completed;
        }
        (OrderStatus::Completed | OrderStatus::Cancelled, _) => {
            return Err(reject("order is closed"));
        }
        _ => return Err(reject("action not allowed in this status")),
    }

    Ok(next)
}

/// Makes `step` the current milestone and closes the one before it.
fn advance_to(order: &mut Order, step: TimelineStep, now: DateTime<Utc>) -> Result<(), AppError> {
    let stamp = display_time(now);
    let previous = step.previous();

    step_mut(order, step)?;

    for event in &mut order.timeline {
        if event.step == step {
            event.status = EventStatus::Current;
            event.time = stamp.clone();
        } else if Some(event.step) == previous
            || (event.step < step && event.status == EventStatus::Current)
        {
            event.status = EventStatus::Completed;
            if event.time.is_empty() {
                event.time = stamp.clone();
            }
        }
    }

    Ok(())
}

/// Closes the final milestone. Any step still marked current is closed with
/// it, since a completed order has nothing in progress.
fn finish(order: &mut Order, now: DateTime<Utc>) -> Result<(), AppError> {
    let stamp = display_time(now);

    let complete = step_mut(order, TimelineStep::Complete)?;
    complete.status = EventStatus::Completed;
    complete.time = stamp.clone();

    for event in &mut order.timeline {
        if event.status == EventStatus::Current {
            event.status = EventStatus::Completed;
            if event.time.is_empty() {
                event.time = stamp.clone();
            }
        }
    }

    Ok(())
}

fn step_mut(order: &mut Order, step: TimelineStep) -> Result<&mut TimelineEvent, AppError> {
    let order_id = order.id.clone();
    order
        .timeline
        .iter_mut()
        .find(|event| event.step == step)
        .ok_or_else(|| {
            AppError::Internal(format!(
                "order {order_id} has no '{}' timeline step",
                step.label()
            ))
        })
}

/// Applies `action` to the stored order with the given id.
///
/// The order's map entry stays write-locked from read to write-back, so two
/// calls on the same order run one after the other while calls on other
/// orders proceed independently.
pub fn transition_order(
    state: &AppState,
    order_id: &str,
    action: &OrderAction,
    now: DateTime<Utc>,
) -> Result<Order, AppError> {
    let result = {
        let mut entry = state
            .orders
            .get_mut(order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        let from = entry.status;
        apply_transition(&entry, action, now).map(|updated| {
            *entry = updated.clone();
            (from, updated)
        })
    };

    match result {
        Ok((from, updated)) => {
            state
                .metrics
                .order_transitions_total
                .with_label_values(&[action.name(), "success"])
                .inc();

            if from != updated.status {
                state
                    .metrics
                    .orders_by_status
                    .with_label_values(&[from.as_str()])
                    .dec();
                state
                    .metrics
                    .orders_by_status
                    .with_label_values(&[updated.status.as_str()])
                    .inc();
            }

            let event = OrderEvent {
                id: Uuid::new_v4(),
                order_id: updated.id.clone(),
                action: action.name().to_string(),
                from,
                to: updated.status,
                at: now,
            };
            let _ = state.order_events_tx.send(event);

            info!(
                order_id = %updated.id,
                action = action.name(),
                from = %from,
                to = %updated.status,
                "order transitioned"
            );

            Ok(updated)
        }
        Err(err) => {
            state
                .metrics
                .order_transitions_total
                .with_label_values(&[action.name(), err.kind()])
                .inc();
            warn!(order_id, action = action.name(), error = %err, "order transition rejected");
            Err(err)
        }
    }
}
