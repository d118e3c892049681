//! Customer repository functions for domain layer (generic over ConnectionTrait).
//!
//! A customer is a user holding the customer role. The email comes from
//! the joined credentials row and may be absent for accounts that never
//! finished registration.

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::adapters::users_sea::{CustomerListFilter, CustomerUpdate};
use crate::auth::Role;
use crate::entities::{user_credentials, users};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Customer list/detail row.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: time::OffsetDateTime,
}

fn to_summary(user: users::Model, creds: Option<user_credentials::Model>) -> CustomerSummary {
    CustomerSummary {
        id: user.id,
        name: user.name,
        email: creds.map(|c| c.email),
        phone: user.phone,
        roles: Role::from_list(&user.roles),
        created_at: user.created_at,
    }
}

/// One page of customers plus the unpaged match count.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CustomerListFilter,
) -> Result<(Vec<CustomerSummary>, u64), DomainError> {
    let total = users_adapter::count_customers(conn, filter).await?;
    let rows = users_adapter::list_customers(conn, filter).await?;
    let customers = rows
        .into_iter()
        .map(|(user, creds)| to_summary(user, creds))
        .collect();
    Ok((customers, total))
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Option<CustomerSummary>, DomainError> {
    let row = users_adapter::find_customer_by_id(conn, customer_id).await?;
    Ok(row.map(|(user, creds)| to_summary(user, creds)))
}

pub async fn require<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<CustomerSummary, DomainError> {
    find(conn, customer_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Customer, "Customer not found"))
}

/// Apply an admin-side partial update and return the fresh record.
///
/// Looked up without the role filter afterwards, so an update that
/// removes the customer role still returns the updated record.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    update: CustomerUpdate,
) -> Result<CustomerSummary, DomainError> {
    let user = users_adapter::update_customer(conn, customer_id, update).await?;
    let creds = users_adapter::find_credentials_by_user_id(conn, customer_id).await?;
    Ok(to_summary(user, creds))
}

/// Delete a customer; credentials and orders go with the row (FK cascade).
/// Returns false when no row existed.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<bool, DomainError> {
    let rows = users_adapter::delete_user(conn, customer_id).await?;
    Ok(rows > 0)
}
