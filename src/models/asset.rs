use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Vehicle,
    Remooc,
}

impl AssetClass {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Vehicle => "vehicle",
            AssetClass::Remooc => "remooc",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical asset that one driver at a time may hold.
pub trait Asset: Clone + Send + Sync + 'static {
    const CLASS: AssetClass;

    fn id(&self) -> &str;

    /// Plate number or trailer code, whatever the driver searches by.
    fn code(&self) -> &str;

    fn assigned_driver_id(&self) -> Option<&str>;

    fn set_assigned_driver_id(&mut self, driver_id: Option<String>);

    fn is_held_by(&self, driver_id: &str) -> bool {
        self.assigned_driver_id() == Some(driver_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VehicleKind {
    Truck,
    Container,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub plate_number: String,
    pub kind: VehicleKind,
    pub brand: String,
    pub expiry_date: String,
    pub carrier_id: String,
    pub assigned_driver_id: Option<String>,
}

impl Asset for Vehicle {
    const CLASS: AssetClass = AssetClass::Vehicle;

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.plate_number
    }

    fn assigned_driver_id(&self) -> Option<&str> {
        self.assigned_driver_id.as_deref()
    }

    fn set_assigned_driver_id(&mut self, driver_id: Option<String>) {
        self.assigned_driver_id = driver_id;
    }
}

/// Trailer ("remooc") pulled by a tractor unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Remooc {
    pub id: String,
    pub code: String,
    pub kind: String,
    pub expiry_date: String,
    pub carrier_id: String,
    pub assigned_driver_id: Option<String>,
}

impl Asset for Remooc {
    const CLASS: AssetClass = AssetClass::Remooc;

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn assigned_driver_id(&self) -> Option<&str> {
        self.assigned_driver_id.as_deref()
    }

    fn set_assigned_driver_id(&mut self, driver_id: Option<String>) {
        self.assigned_driver_id = driver_id;
    }
}
