//! Order repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::orders_sea as orders_adapter;
use crate::adapters::orders_sea::{OrderCreate, OrderListFilter};
use crate::domain::orders::OrderItem;
use crate::entities::orders::{OrderStatus, PaymentMethod};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Order domain model with items decoded from the jsonb column.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub order_number: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub payment: PaymentMethod,
    pub total_amount: i64,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub comment: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// Aggregates for one customer's order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    pub order_count: i64,
    pub total_spent: i64,
}

// Decoding items can fail, so the conversion is fallible rather than From.
fn to_domain(model: crate::entities::orders::Model) -> Result<Order, DomainError> {
    let items = orders_adapter::decode_items(&model)?;
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        customer_id: model.customer_id,
        status: model.status,
        payment: model.payment,
        total_amount: model.total_amount,
        email: model.email,
        phone: model.phone,
        address: model.address,
        comment: model.comment,
        items,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OrderCreate,
) -> Result<Order, DomainError> {
    let model = orders_adapter::create_order(conn, dto).await?;
    to_domain(model)
}

pub async fn find_by_order_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_number: i64,
) -> Result<Option<Order>, DomainError> {
    let model = orders_adapter::find_by_order_number(conn, order_number).await?;
    model.map(to_domain).transpose()
}

pub async fn require_by_order_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_number: i64,
) -> Result<Order, DomainError> {
    find_by_order_number(conn, order_number)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Order, "Order not found"))
}

/// One page of orders plus the unpaged match count.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OrderListFilter,
) -> Result<(Vec<Order>, u64), DomainError> {
    let total = orders_adapter::count_orders(conn, filter).await?;
    let models = orders_adapter::list_orders(conn, filter).await?;
    let orders = models
        .into_iter()
        .map(to_domain)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((orders, total))
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_number: i64,
    status: OrderStatus,
) -> Result<Order, DomainError> {
    let model = orders_adapter::update_status(conn, order_number, status)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Order, "Order not found"))?;
    to_domain(model)
}

/// Delete an order by primary id. Returns false when no row existed.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<bool, DomainError> {
    let rows = orders_adapter::delete_order(conn, order_id).await?;
    Ok(rows > 0)
}

pub async fn stats_for_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<OrderStats, DomainError> {
    let (order_count, total_spent) = orders_adapter::customer_order_stats(conn, customer_id).await?;
    Ok(OrderStats {
        order_count,
        total_spent,
    })
}

/// The customer's newest orders, for the detail page.
pub async fn recent_for_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    limit: u64,
) -> Result<Vec<Order>, DomainError> {
    let filter = OrderListFilter {
        limit,
        ..OrderListFilter::for_customer(customer_id)
    };
    let models = orders_adapter::list_orders(conn, &filter).await?;
    models.into_iter().map(to_domain).collect()
}
