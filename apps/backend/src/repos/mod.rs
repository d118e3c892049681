//! Repository functions for domain layer.

pub mod customers;
pub mod orders;
pub mod users;
