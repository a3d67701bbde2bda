pub mod lifecycle;
pub mod query;
pub mod registry;
