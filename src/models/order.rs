use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of every human-facing timestamp carried on an order.
pub const DISPLAY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn display_time(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    Ready,
    Paid,
    Unloading,
    InTransit,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::New,
        OrderStatus::Ready,
        OrderStatus::Paid,
        OrderStatus::Unloading,
        OrderStatus::InTransit,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses in which the driver has not yet started the job.
    pub fn is_awaiting_start(self) -> bool {
        matches!(
            self,
            OrderStatus::New | OrderStatus::Ready | OrderStatus::Paid
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Ready => "Ready",
            OrderStatus::Paid => "Paid",
            OrderStatus::Unloading => "Unloading",
            OrderStatus::InTransit => "InTransit",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed milestones of an order's timeline, in the order they happen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimelineStep {
    Created,
    CarrierAccepted,
    DriverAccepted,
    DriverMoving,
    Complete,
}

impl TimelineStep {
    pub const ALL: [TimelineStep; 5] = [
        TimelineStep::Created,
        TimelineStep::CarrierAccepted,
        TimelineStep::DriverAccepted,
        TimelineStep::DriverMoving,
        TimelineStep::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimelineStep::Created => "Order created",
            TimelineStep::CarrierAccepted => "Carrier accepted",
            TimelineStep::DriverAccepted => "Driver accepted",
            TimelineStep::DriverMoving => "Driver moving",
            TimelineStep::Complete => "Complete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TimelineStep::Created => "Order was created in the system",
            TimelineStep::CarrierAccepted => "Dispatcher accepted the order",
            TimelineStep::DriverAccepted => "You accepted this order",
            TimelineStep::DriverMoving => "Truck is heading to the customer warehouse",
            TimelineStep::Complete => "Delivered and signed for",
        }
    }

    pub fn previous(self) -> Option<TimelineStep> {
        match self {
            TimelineStep::Created => None,
            TimelineStep::CarrierAccepted => Some(TimelineStep::Created),
            TimelineStep::DriverAccepted => Some(TimelineStep::CarrierAccepted),
            TimelineStep::DriverMoving => Some(TimelineStep::DriverAccepted),
            TimelineStep::Complete => Some(TimelineStep::DriverMoving),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Current,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    pub step: TimelineStep,
    pub label: String,
    pub time: String,
    pub status: EventStatus,
    pub description: Option<String>,
}

impl TimelineEvent {
    pub fn new(step: TimelineStep, status: EventStatus, time: String) -> Self {
        Self {
            id: (step as u8 + 1).to_string(),
            step,
            label: step.label().to_string(),
            time,
            status,
            description: Some(step.description().to_string()),
        }
    }
}

/// Builds the five-step timeline an order in `status` is expected to carry.
///
/// `stamp` supplies the display time for each step; steps that have not been
/// reached yet get an empty time regardless.
pub fn timeline_for(
    status: OrderStatus,
    mut stamp: impl FnMut(TimelineStep) -> String,
) -> Vec<TimelineEvent> {
    TimelineStep::ALL
        .into_iter()
        .map(|step| {
            let event_status = step_status_for(status, step);
            let time = if event_status == EventStatus::Pending {
                String::new()
            } else {
                stamp(step)
            };
            TimelineEvent::new(step, event_status, time)
        })
        .collect()
}

fn step_status_for(status: OrderStatus, step: TimelineStep) -> EventStatus {
    match step {
        TimelineStep::Created | TimelineStep::CarrierAccepted => EventStatus::Completed,
        TimelineStep::DriverAccepted if status.is_awaiting_start() => EventStatus::Current,
        TimelineStep::DriverAccepted => EventStatus::Completed,
        TimelineStep::DriverMoving => match status {
            OrderStatus::Unloading | OrderStatus::InTransit => EventStatus::Current,
            OrderStatus::Completed => EventStatus::Completed,
            _ => EventStatus::Pending,
        },
        TimelineStep::Complete if status == OrderStatus::Completed => EventStatus::Completed,
        TimelineStep::Complete => EventStatus::Pending,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Amounts in VND.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentDetails {
    pub transport_fee: u64,
    pub lift_fee: u64,
    pub forbidden_road_fee: u64,
    pub advance: u64,
    pub total_real: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub container_code: String,
    pub status: OrderStatus,
    pub pickup_date: String,
    pub delivery_date: Option<String>,
    pub customer: Customer,
    pub timeline: Vec<TimelineEvent>,
    pub origin: String,
    pub destination: String,
    pub cargo_type: String,
    pub weight: u32,
    pub distance: u32,
    pub payment: PaymentDetails,
    pub seal_number: Option<String>,
    pub pod_image: Option<String>,
    pub operation_type: String,
    pub container_owner: String,
    pub container_size: String,
    pub note: Option<String>,
    pub services: Vec<String>,
    pub qr_code_url: String,
}

impl Order {
    pub fn timeline_event(&self, step: TimelineStep) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|event| event.step == step)
    }

    pub fn current_events(&self) -> usize {
        self.timeline
            .iter()
            .filter(|event| event.status == EventStatus::Current)
            .count()
    }
}
