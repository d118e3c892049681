//! Customer administration: list, detail with order history, update,
//! delete. All of these sit behind the admin role guard.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use tracing::info;

use crate::adapters::users_sea::{CustomerListFilter, CustomerSortField, CustomerUpdate};
use crate::auth::Role;
use crate::domain::paging::{clamp_paging, Paged};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::customers::{self, CustomerSummary};
use crate::repos::orders::{self, Order, OrderStats};
use crate::services::orders::{parse_count, parse_date, parse_key, parse_sort_dir, trimmed};
use crate::services::users::validate_name;

const DEFAULT_PAGE_SIZE: u64 = 10;
const RECENT_ORDERS_SHOWN: u64 = 5;

/// Admin customer list query, raw off the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
    pub registration_date_from: Option<String>,
    pub registration_date_to: Option<String>,
}

/// Admin-side partial update of a customer record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Everything the admin customer page shows: the record itself, order
/// aggregates, and the newest orders.
#[derive(Debug, Clone)]
pub struct CustomerDetail {
    pub customer: CustomerSummary,
    pub stats: OrderStats,
    pub recent_orders: Vec<Order>,
}

pub async fn list_customers(
    query: &CustomerListQuery,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Paged<CustomerSummary>, AppError> {
    let filter = list_filter(query)?;
    let (items, total) = customers::list(conn, &filter).await?;
    Ok(Paged::new(items, total, filter.page, filter.limit))
}

pub async fn customer_detail(
    customer_id: i64,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<CustomerDetail, AppError> {
    let customer = customers::require(conn, customer_id).await?;
    let stats = orders::stats_for_customer(conn, customer_id).await?;
    let recent_orders = orders::recent_for_customer(conn, customer_id, RECENT_ORDERS_SHOWN).await?;

    Ok(CustomerDetail {
        customer,
        stats,
        recent_orders,
    })
}

/// Validate and apply an admin-side customer update.
pub async fn update_customer(
    customer_id: i64,
    input: UpdateCustomer,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<CustomerSummary, AppError> {
    let update = validate_update(&input)?;

    // Look the row up through the customer lens first so updating an
    // id that is not a customer reads as 404, not as a blind write.
    customers::require(conn, customer_id).await?;

    let customer = customers::update(conn, customer_id, update).await?;
    info!(customer_id, "Customer updated");
    Ok(customer)
}

pub async fn delete_customer(
    customer_id: i64,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<(), AppError> {
    customers::require(conn, customer_id).await?;

    let deleted = customers::delete(conn, customer_id).await?;
    if !deleted {
        return Err(AppError::not_found(
            ErrorCode::CustomerNotFound,
            "Customer not found",
        ));
    }
    info!(customer_id, "Customer deleted");
    Ok(())
}

/// Parse a positive customer id off a path segment.
pub fn parse_customer_id(raw: &str) -> Result<i64, AppError> {
    parse_key(raw, ErrorCode::InvalidCustomerId, "id")
}

fn validate_update(input: &UpdateCustomer) -> Result<CustomerUpdate, AppError> {
    let mut update = CustomerUpdate::default();

    if let Some(name) = input.name.as_deref() {
        update.name = Some(validate_name(name)?);
    }
    if let Some(phone) = input.phone.as_deref() {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AppError::validation("Phone must not be blank"));
        }
        update.phone = Some(phone.to_string());
    }
    if let Some(raw_roles) = input.roles.as_deref() {
        update.roles = Some(validate_roles(raw_roles)?);
    }

    if update.is_empty() {
        return Err(AppError::validation(
            "Provide at least one of name, phone or roles to update",
        ));
    }
    Ok(update)
}

/// Strict role parse for admin writes: unknown names are rejected here,
/// unlike reads where bad stored values are silently dropped.
fn validate_roles(raw_roles: &[String]) -> Result<Vec<String>, AppError> {
    if raw_roles.is_empty() {
        return Err(AppError::validation("Roles must not be empty"));
    }
    let mut roles: Vec<Role> = Vec::with_capacity(raw_roles.len());
    for raw in raw_roles {
        let role = Role::parse(raw.trim()).ok_or_else(|| {
            AppError::bad_request(ErrorCode::InvalidRole, format!("Unknown role: {raw}"))
        })?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles.iter().map(|r| r.as_str().to_string()).collect())
}

fn list_filter(query: &CustomerListQuery) -> Result<CustomerListFilter, AppError> {
    let page = parse_count(query.page.as_deref(), "page")?;
    let limit = parse_count(query.limit.as_deref(), "limit")?;
    let (page, limit) = clamp_paging(page, limit, DEFAULT_PAGE_SIZE);

    Ok(CustomerListFilter {
        page,
        limit,
        sort_field: parse_sort_field(query.sort_field.as_deref())?,
        sort_order: parse_sort_dir(query.sort_order.as_deref())?,
        search: trimmed(query.search.as_deref()).map(str::to_string),
        registered_from: parse_date(query.registration_date_from.as_deref(), "registration_date_from")?,
        registered_to: parse_date(query.registration_date_to.as_deref(), "registration_date_to")?,
    })
}

fn parse_sort_field(raw: Option<&str>) -> Result<CustomerSortField, AppError> {
    match trimmed(raw) {
        None => Ok(CustomerSortField::CreatedAt),
        Some("created_at") => Ok(CustomerSortField::CreatedAt),
        Some("name") => Ok(CustomerSortField::Name),
        Some("email") => Ok(CustomerSortField::Email),
        Some(other) => Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Unknown sort_field: {other}"),
        )),
    }
}
