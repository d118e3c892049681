//! Service layer: storefront workflows on top of the repos.

pub mod customers;
pub mod orders;
pub mod users;
