//! Entity row fixtures for seeding mock database results.
//!
//! These build the SeaORM models that scripted queries hand back, the
//! same rows Postgres would return. Aggregate queries (counts, stats)
//! read ad-hoc columns, so those fixtures are raw value maps instead.

use std::collections::BTreeMap;

use backend::entities::orders::{self, OrderStatus, PaymentMethod};
use backend::entities::{user_credentials, users};
use sea_orm::Value;
use time::OffsetDateTime;

pub fn user_row(id: i64, sub: &str, roles: &[&str]) -> users::Model {
    let now = OffsetDateTime::now_utc();
    users::Model {
        id,
        sub: sub.to_string(),
        name: format!("User {id}"),
        phone: None,
        roles: roles.iter().map(|r| r.to_string()).collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn customer_row(id: i64, sub: &str) -> users::Model {
    user_row(id, sub, &["customer"])
}

pub fn admin_row(id: i64, sub: &str) -> users::Model {
    user_row(id, sub, &["admin"])
}

pub fn credentials_row(id: i64, user_id: i64, email: &str) -> user_credentials::Model {
    let now = OffsetDateTime::now_utc();
    user_credentials::Model {
        id,
        user_id,
        email: email.to_string(),
        password_hash: None,
        last_login: Some(now),
        created_at: now,
        updated_at: now,
    }
}

/// A two-item order totalling 4000 minor units.
pub fn order_row(id: i64, order_number: i64, customer_id: i64) -> orders::Model {
    let now = OffsetDateTime::now_utc();
    orders::Model {
        id,
        order_number,
        customer_id,
        status: OrderStatus::New,
        payment: PaymentMethod::Card,
        total_amount: 4000,
        email: "buyer@example.test".to_string(),
        phone: "+1 555 0101".to_string(),
        address: "12 Elm Street".to_string(),
        comment: None,
        items: serde_json::json!([
            {"name": "Mug", "price": 1500},
            {"name": "Shirt", "price": 2500}
        ]),
        created_at: now,
        updated_at: now,
    }
}

/// Result row for a paginator count query.
pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

/// Result row for the customer order-stats aggregate. Keys stay in
/// alphabetical order so positional tuple decoding sees count first.
pub fn stats_row(order_count: i64, total_spent: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("order_count", Value::BigInt(Some(order_count))),
        ("total_spent", Value::BigInt(Some(total_spent))),
    ])
}
