//! Synthetic start-up data: orders, the carrier's fleet and its drivers.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::asset::{Remooc, Vehicle, VehicleKind};
use crate::models::driver::{Carrier, Driver};
use crate::models::order::{
    timeline_for, Customer, Order, OrderStatus, PaymentDetails, TimelineStep,
    DISPLAY_TIME_FORMAT,
};

pub const DEFAULT_DRIVER_ID: &str = "DRV001";
pub const OTHER_DRIVER_ID: &str = "DRV_OTHER";
pub const THIRD_DRIVER_ID: &str = "DRV002";
pub const CARRIER_ID: &str = "C001";

pub const OPERATION_TYPES: [&str; 1] = ["Drop at yard for export"];

const TRANSPORT_RATE_PER_KM: u64 = 18_000;
const LIFT_FEE: u64 = 450_000;
const FORBIDDEN_ROAD_FEE: u64 = 200_000;
const QR_CODE_URL: &str =
    "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=DRIVER-DESK-MOCK";

pub struct SeedData {
    pub carrier: Carrier,
    pub drivers: Vec<Driver>,
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub remoocs: Vec<Remooc>,
}

pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    active: usize,
    completed: usize,
) -> SeedData {
    // Every active order starts out paid.
    let mut orders = Vec::with_capacity(active + completed);
    for _ in 0..active {
        orders.push(mock_order(rng, now, OrderStatus::Paid));
    }
    for _ in 0..completed {
        orders.push(mock_order(rng, now, OrderStatus::Completed));
    }

    let mut seen = HashSet::new();
    for order in &mut orders {
        while !seen.insert(order.id.clone()) {
            order.id = order_id(rng, now);
        }
    }

    SeedData {
        carrier: default_carrier(),
        drivers: vec![default_driver(), other_driver(), third_driver()],
        orders,
        vehicles: initial_vehicles(),
        remoocs: initial_remoocs(),
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[&str]) -> String {
    choices[rng.random_range(0..choices.len())].to_string()
}

fn container_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letters: String = (0..4)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect();
    let digits: String = (0..7)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect();
    format!("{letters}{digits}")
}

fn order_id<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    format!(
        "SLT{}{:05}",
        now.format("%y%m%d"),
        rng.random_range(0..100_000u32)
    )
}

/// A display date `offset_days` from `now`, at `hour` or a random daytime hour.
fn display_date<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    offset_days: i64,
    hour: Option<u32>,
) -> String {
    let hour = hour.unwrap_or_else(|| rng.random_range(7..=20));
    let minute = rng.random_range(0..60);
    let day = (now + Duration::days(offset_days)).date_naive();

    day.and_hms_opt(hour, minute, 0)
        .map(|at| at.format(DISPLAY_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn payment_for<R: Rng + ?Sized>(rng: &mut R, distance: u32) -> PaymentDetails {
    let transport_fee =
        ((u64::from(distance) * TRANSPORT_RATE_PER_KM) as f64 / 1000.0).round() as u64 * 1000;
    let lift_fee = if rng.random_bool(0.5) { LIFT_FEE } else { 0 };
    let forbidden_road_fee = if rng.random_bool(0.2) {
        FORBIDDEN_ROAD_FEE
    } else {
        0
    };
    let advance = (transport_fee + lift_fee) * 3 / 10 / 1000 * 1000;

    PaymentDetails {
        transport_fee,
        lift_fee,
        forbidden_road_fee,
        advance,
        total_real: transport_fee + lift_fee + forbidden_road_fee - advance,
    }
}

fn mock_order<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, status: OrderStatus) -> Order {
    let done = status == OrderStatus::Completed;
    let customers = [
        Customer {
            name: "HOA PHAT IMPORT-EXPORT CO., LTD".to_string(),
            phone: "+84987654321".to_string(),
            address: "Song Than Industrial Park, Binh Duong".to_string(),
        },
        Customer {
            name: "VIETNAM LOGISTICS CORP".to_string(),
            phone: "+84912345678".to_string(),
            address: "Cat Lai Port, Ho Chi Minh City".to_string(),
        },
        Customer {
            name: "VIET STEEL GROUP".to_string(),
            phone: "+84909090909".to_string(),
            address: "Nhon Trach Industrial Park, Dong Nai".to_string(),
        },
    ];

    let timeline = timeline_for(status, |step| {
        let (offset, hour) = match step {
            TimelineStep::Created => (if done { -3 } else { -2 }, Some(8)),
            TimelineStep::CarrierAccepted => (if done { -3 } else { -2 }, Some(10)),
            TimelineStep::DriverAccepted => (if done { -2 } else { -1 }, Some(14)),
            TimelineStep::DriverMoving => (if done { -1 } else { 0 }, None),
            TimelineStep::Complete => (0, Some(9)),
        };
        display_date(rng, now, offset, hour)
    });

    let distance = rng.random_range(15..=450);
    let customer = customers[rng.random_range(0..customers.len())].clone();

    Order {
        id: order_id(rng, now),
        container_code: container_code(rng),
        status,
        pickup_date: display_date(rng, now, if done { -3 } else { 0 }, None),
        delivery_date: done.then(|| display_date(rng, now, 0, None)),
        customer,
        timeline,
        origin: pick(rng, &["Cat Lai Port", "ICD Phuoc Long", "VICT Port"]),
        destination: pick(
            rng,
            &[
                "VSIP 1 Industrial Park",
                "Bonded Warehouse",
                "Amata Industrial Park",
                "My Phuoc 3 Industrial Park",
            ],
        ),
        cargo_type: pick(rng, &["Dry", "Reefer", "Bulk"]),
        weight: rng.random_range(15..=30),
        distance,
        payment: payment_for(rng, distance),
        seal_number: None,
        pod_image: None,
        operation_type: pick(rng, &OPERATION_TYPES),
        container_owner: pick(
            rng,
            &["Hapag-Lloyd", "Maersk Line", "COSCO", "Evergreen", "MSC"],
        ),
        container_size: pick(rng, &["40HC", "20DC", "40DC", "45HC"]),
        note: rng
            .random_bool(0.5)
            .then(|| "Fragile cargo, lift with care.".to_string()),
        services: vec!["Container body insurance".to_string()],
        qr_code_url: QR_CODE_URL.to_string(),
    }
}

pub fn default_carrier() -> Carrier {
    Carrier {
        id: CARRIER_ID.to_string(),
        name: "SmartHub Logistics".to_string(),
        phone: "028 3899 9999".to_string(),
        address: "123 Hanoi Highway, Thu Duc City, Ho Chi Minh City".to_string(),
        logo: "https://images.unsplash.com/photo-1560179707-f14e90ef3dab?w=100&h=100&fit=crop"
            .to_string(),
    }
}

pub fn default_driver() -> Driver {
    Driver {
        id: DEFAULT_DRIVER_ID.to_string(),
        name: "Nguyen Hoang Duy".to_string(),
        phone: "0942322454".to_string(),
        email: Some("duynguyen2454@gmail.com".to_string()),
        avatar: "https://images.unsplash.com/photo-1633332755192-727a05c4013d?w=400&h=400&fit=crop"
            .to_string(),
        national_id: Some("079090000001".to_string()),
        dob: Some("1990-01-01".to_string()),
        carrier_id: Some(CARRIER_ID.to_string()),
    }
}

fn other_driver() -> Driver {
    Driver {
        id: OTHER_DRIVER_ID.to_string(),
        name: "Tran Van Binh".to_string(),
        phone: "0909123456".to_string(),
        email: None,
        avatar: String::new(),
        national_id: None,
        dob: None,
        carrier_id: Some(CARRIER_ID.to_string()),
    }
}

fn third_driver() -> Driver {
    Driver {
        id: THIRD_DRIVER_ID.to_string(),
        name: "Le Minh Tam".to_string(),
        phone: "0938765432".to_string(),
        email: None,
        avatar: String::new(),
        national_id: None,
        dob: None,
        carrier_id: Some(CARRIER_ID.to_string()),
    }
}

fn vehicle(id: &str, plate: &str, brand: &str, expiry: &str, holder: Option<&str>) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        plate_number: plate.to_string(),
        kind: VehicleKind::Container,
        brand: brand.to_string(),
        expiry_date: expiry.to_string(),
        carrier_id: CARRIER_ID.to_string(),
        assigned_driver_id: holder.map(str::to_string),
    }
}

fn remooc(id: &str, code: &str, kind: &str, expiry: &str, holder: Option<&str>) -> Remooc {
    Remooc {
        id: id.to_string(),
        code: code.to_string(),
        kind: kind.to_string(),
        expiry_date: expiry.to_string(),
        carrier_id: CARRIER_ID.to_string(),
        assigned_driver_id: holder.map(str::to_string),
    }
}

pub fn initial_vehicles() -> Vec<Vehicle> {
    vec![
        vehicle("V001", "51C-123.45", "HINO", "2026-05-20", Some(DEFAULT_DRIVER_ID)),
        vehicle("V002", "50H-999.99", "HYUNDAI", "2025-12-10", None),
        vehicle("V003", "60C-567.89", "ISUZU", "2025-10-15", Some(OTHER_DRIVER_ID)),
        vehicle("V004", "61C-444.22", "DAEWOO", "2026-01-01", None),
        vehicle("V005", "29C-111.11", "THACO", "2025-08-20", Some(THIRD_DRIVER_ID)),
    ]
}

pub fn initial_remoocs() -> Vec<Remooc> {
    vec![
        remooc("R001", "RM-5555", "40ft flatbed", "2026-01-15", Some(DEFAULT_DRIVER_ID)),
        remooc("R002", "RM-8888", "20ft skeletal", "2025-11-20", None),
        remooc("R003", "RM-7777", "40ft flatbed", "2025-09-05", Some(OTHER_DRIVER_ID)),
        remooc("R004", "RM-3333", "40ft skeletal", "2026-03-30", None),
        remooc("R005", "RM-1212", "40ft gooseneck", "2025-12-25", None),
    ]
}
