//! Adapters for external dependencies.

pub mod orders_sea;
pub mod users_sea;
