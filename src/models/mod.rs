pub mod asset;
pub mod driver;
pub mod event;
pub mod order;
