//! Order workflows: checkout, listing, status transitions, deletion.
//!
//! List handlers pass query values down as raw strings; parsing happens
//! here so every rejected value comes back in the problem+json shape
//! with a stable code instead of a framework deserialization error.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::adapters::orders_sea::{OrderCreate, OrderListFilter, OrderSortField};
use crate::domain::orders::{items_total, validate_items, OrderItem};
use crate::domain::paging::{clamp_paging, Paged, SortDir};
use crate::entities::orders::{OrderStatus, PaymentMethod};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::orders::{self, Order};
use crate::services::users::normalize_email;

const DEFAULT_PAGE_SIZE: u64 = 10;
const SELF_SERVICE_PAGE_SIZE: u64 = 5;

/// A new order as submitted by the storefront checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub payment: PaymentMethod,
    pub total_amount: i64,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Admin order list query, raw off the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
    pub total_amount_from: Option<String>,
    pub total_amount_to: Option<String>,
    pub order_date_from: Option<String>,
    pub order_date_to: Option<String>,
    pub search: Option<String>,
}

/// Self-service list query for a customer's own orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyOrdersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

/// Validate a checkout payload and persist the order for `customer_id`.
/// The order number comes back from the database sequence.
pub async fn create_order(
    customer_id: i64,
    input: NewOrder,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Order, AppError> {
    validate_items(&input.items).map_err(AppError::validation)?;

    if input.total_amount < 0 {
        return Err(AppError::validation("Total amount must not be negative"));
    }
    // The client sends its own total; it must agree with the item sum
    // or the order is rejected rather than silently re-priced.
    let expected = items_total(&input.items);
    if input.total_amount != expected {
        return Err(AppError::validation(format!(
            "Total amount {} does not match the item sum {expected}",
            input.total_amount
        )));
    }

    let email = normalize_email(&input.email)?;
    let phone = input.phone.trim();
    if phone.is_empty() {
        return Err(AppError::validation("Phone must not be empty"));
    }
    let address = input.address.trim();
    if address.is_empty() {
        return Err(AppError::validation("Address must not be empty"));
    }
    let comment = input
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let item_count = input.items.len();
    let order = orders::create(
        conn,
        OrderCreate {
            customer_id,
            payment: input.payment,
            total_amount: input.total_amount,
            email,
            phone: phone.to_string(),
            address: address.to_string(),
            comment,
            items: input.items,
        },
    )
    .await?;

    info!(
        order_number = order.order_number,
        customer_id,
        total_amount = order.total_amount,
        item_count,
        "Order created"
    );
    Ok(order)
}

/// Admin-side order list over the whole store.
pub async fn list_orders(
    query: &OrderListQuery,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Paged<Order>, AppError> {
    let filter = admin_filter(query)?;
    let (items, total) = orders::list(conn, &filter).await?;
    Ok(Paged::new(items, total, filter.page, filter.limit))
}

/// The calling customer's own orders, newest first.
pub async fn list_customer_orders(
    customer_id: i64,
    query: &MyOrdersQuery,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Paged<Order>, AppError> {
    let filter = self_filter(customer_id, query)?;
    let (items, total) = orders::list(conn, &filter).await?;
    Ok(Paged::new(items, total, filter.page, filter.limit))
}

pub async fn get_order(
    order_number: i64,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Order, AppError> {
    Ok(orders::require_by_order_number(conn, order_number).await?)
}

/// Move an order to a new status, keyed by order number.
pub async fn update_order_status(
    order_number: i64,
    status_raw: &str,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<Order, AppError> {
    let status = parse_status(status_raw)?;
    let order = orders::update_status(conn, order_number, status).await?;
    info!(order_number, status = ?order.status, "Order status updated");
    Ok(order)
}

/// Delete an order by primary id.
pub async fn delete_order(
    order_id: i64,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<(), AppError> {
    let deleted = orders::delete(conn, order_id).await?;
    if !deleted {
        return Err(AppError::not_found(ErrorCode::OrderNotFound, "Order not found"));
    }
    info!(order_id, "Order deleted");
    Ok(())
}

/// Parse a positive order number off a path segment.
pub fn parse_order_number(raw: &str) -> Result<i64, AppError> {
    parse_key(raw, ErrorCode::InvalidOrderNumber, "order_number")
}

/// Parse a positive order primary id off a path segment.
pub fn parse_order_id(raw: &str) -> Result<i64, AppError> {
    parse_key(raw, ErrorCode::InvalidOrderId, "id")
}

pub(crate) fn parse_key(raw: &str, code: ErrorCode, param: &str) -> Result<i64, AppError> {
    let key = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(code, format!("Invalid {param}: {raw}")))?;
    if key <= 0 {
        return Err(AppError::bad_request(
            code,
            format!("{param} must be positive, got: {key}"),
        ));
    }
    Ok(key)
}

fn admin_filter(query: &OrderListQuery) -> Result<OrderListFilter, AppError> {
    let page = parse_count(query.page.as_deref(), "page")?;
    let limit = parse_count(query.limit.as_deref(), "limit")?;
    let (page, limit) = clamp_paging(page, limit, DEFAULT_PAGE_SIZE);

    let status = match trimmed(query.status.as_deref()) {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };

    Ok(OrderListFilter {
        page,
        limit,
        sort_field: parse_sort_field(query.sort_field.as_deref())?,
        sort_order: parse_sort_dir(query.sort_order.as_deref())?,
        status,
        total_amount_from: parse_money(query.total_amount_from.as_deref(), "total_amount_from")?,
        total_amount_to: parse_money(query.total_amount_to.as_deref(), "total_amount_to")?,
        date_from: parse_date(query.order_date_from.as_deref(), "order_date_from")?,
        date_to: parse_date(query.order_date_to.as_deref(), "order_date_to")?,
        search: trimmed(query.search.as_deref()).map(str::to_string),
        customer_id: None,
    })
}

fn self_filter(customer_id: i64, query: &MyOrdersQuery) -> Result<OrderListFilter, AppError> {
    let page = parse_count(query.page.as_deref(), "page")?;
    let limit = parse_count(query.limit.as_deref(), "limit")?;
    let (page, limit) = clamp_paging(page, limit, SELF_SERVICE_PAGE_SIZE);

    Ok(OrderListFilter {
        page,
        limit,
        search: trimmed(query.search.as_deref()).map(str::to_string),
        ..OrderListFilter::for_customer(customer_id)
    })
}

fn parse_status(raw: &str) -> Result<OrderStatus, AppError> {
    match raw.trim() {
        "new" => Ok(OrderStatus::New),
        "pending" => Ok(OrderStatus::Pending),
        "completed" => Ok(OrderStatus::Completed),
        "cancelled" => Ok(OrderStatus::Cancelled),
        other => Err(AppError::bad_request(
            ErrorCode::InvalidOrderStatus,
            format!("Unknown order status: {other}"),
        )),
    }
}

fn parse_sort_field(raw: Option<&str>) -> Result<OrderSortField, AppError> {
    match trimmed(raw) {
        None => Ok(OrderSortField::CreatedAt),
        Some("created_at") => Ok(OrderSortField::CreatedAt),
        Some("total_amount") => Ok(OrderSortField::TotalAmount),
        Some("order_number") => Ok(OrderSortField::OrderNumber),
        Some(other) => Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Unknown sort_field: {other}"),
        )),
    }
}

pub(crate) fn parse_sort_dir(raw: Option<&str>) -> Result<SortDir, AppError> {
    match trimmed(raw) {
        None => Ok(SortDir::Desc),
        Some("asc") => Ok(SortDir::Asc),
        Some("desc") => Ok(SortDir::Desc),
        Some(other) => Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Unknown sort_order: {other}"),
        )),
    }
}

/// Parse an optional non-negative count. Blank values count as absent
/// so a dangling `&page=` does not fail the whole request.
pub(crate) fn parse_count(raw: Option<&str>, field: &str) -> Result<Option<u64>, AppError> {
    match trimmed(raw) {
        None => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| {
            AppError::bad_request(
                ErrorCode::BadRequest,
                format!("{field} must be a non-negative integer"),
            )
        }),
    }
}

fn parse_money(raw: Option<&str>, field: &str) -> Result<Option<i64>, AppError> {
    let Some(value) = trimmed(raw) else {
        return Ok(None);
    };
    let amount = value.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::BadRequest, format!("{field} must be an integer"))
    })?;
    if amount < 0 {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("{field} must not be negative"),
        ));
    }
    Ok(Some(amount))
}

pub(crate) fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<OffsetDateTime>, AppError> {
    match trimmed(raw) {
        None => Ok(None),
        Some(value) => OffsetDateTime::parse(value, &Rfc3339).map(Some).map_err(|_| {
            AppError::bad_request(
                ErrorCode::BadRequest,
                format!("{field} must be an RFC 3339 timestamp"),
            )
        }),
    }
}

pub(crate) fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}
