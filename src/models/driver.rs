use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub avatar: String,
    pub national_id: Option<String>,
    pub dob: Option<String>,
    pub carrier_id: Option<String>,
}

/// Fleet owner the driver and the assets belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Carrier {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub logo: String,
}
