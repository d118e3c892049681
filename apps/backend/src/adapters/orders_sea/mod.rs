//! SeaORM adapter for the orders table - generic over ConnectionTrait.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::domain::orders::OrderItem;
use crate::domain::paging::SortDir;
use crate::entities::orders;
use crate::entities::orders::OrderStatus;

pub mod dto;

pub use dto::{OrderCreate, OrderListFilter, OrderSortField};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// Escape LIKE wildcards in a raw search term (backslash escape).
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Decode the jsonb items column into typed line items.
///
/// A row whose items no longer parse is emitted as a structured
/// `ITEMS_CORRUPT:` custom error so the error mapper can classify it
/// as data corruption rather than a generic failure.
pub fn decode_items(model: &orders::Model) -> Result<Vec<OrderItem>, sea_orm::DbErr> {
    serde_json::from_value(model.items.clone())
        .map_err(|_| sea_orm::DbErr::Custom(format!("ITEMS_CORRUPT: order {}", model.id)))
}

pub async fn create_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OrderCreate,
) -> Result<orders::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let items = serde_json::to_value(&dto.items).map_err(|e| sea_orm::DbErr::Json(e.to_string()))?;

    let order_active = orders::ActiveModel {
        id: NotSet,
        // Allocated by the database sequence on insert
        order_number: NotSet,
        customer_id: Set(dto.customer_id),
        status: Set(OrderStatus::New),
        payment: Set(dto.payment),
        total_amount: Set(dto.total_amount),
        email: Set(dto.email),
        phone: Set(dto.phone),
        address: Set(dto.address),
        comment: Set(dto.comment),
        items: Set(items),
        created_at: Set(now),
        updated_at: Set(now),
    };

    order_active.insert(conn).await
}

pub async fn find_by_order_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_number: i64,
) -> Result<Option<orders::Model>, sea_orm::DbErr> {
    orders::Entity::find()
        .filter(orders::Column::OrderNumber.eq(order_number))
        .one(conn)
        .await
}

fn order_select(filter: &OrderListFilter) -> Select<orders::Entity> {
    let mut select = orders::Entity::find();

    if let Some(customer_id) = filter.customer_id {
        select = select.filter(orders::Column::CustomerId.eq(customer_id));
    }
    if let Some(status) = filter.status {
        select = select.filter(orders::Column::Status.eq(status));
    }
    if let Some(from) = filter.total_amount_from {
        select = select.filter(orders::Column::TotalAmount.gte(from));
    }
    if let Some(to) = filter.total_amount_to {
        select = select.filter(orders::Column::TotalAmount.lte(to));
    }
    if let Some(from) = filter.date_from {
        select = select.filter(orders::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.date_to {
        select = select.filter(orders::Column::CreatedAt.lte(to));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = format!("%{}%", escape_like(term));
        select = select.filter(
            Condition::any()
                .add(Expr::col((orders::Entity, orders::Column::Email)).ilike(pattern.clone()))
                .add(Expr::col((orders::Entity, orders::Column::Phone)).ilike(pattern.clone()))
                .add(Expr::col((orders::Entity, orders::Column::Address)).ilike(pattern)),
        );
    }

    select
}

pub async fn count_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OrderListFilter,
) -> Result<u64, sea_orm::DbErr> {
    order_select(filter).count(conn).await
}

pub async fn list_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &OrderListFilter,
) -> Result<Vec<orders::Model>, sea_orm::DbErr> {
    let direction = match filter.sort_order {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    };

    let select = order_select(filter);
    let select = match filter.sort_field {
        OrderSortField::CreatedAt => select.order_by(orders::Column::CreatedAt, direction),
        OrderSortField::TotalAmount => select.order_by(orders::Column::TotalAmount, direction),
        OrderSortField::OrderNumber => select.order_by(orders::Column::OrderNumber, direction),
    };

    // Saturates instead of overflowing on absurd page numbers; the
    // query then reads past the end of the table and comes back empty.
    let offset = filter.page.saturating_sub(1).saturating_mul(filter.limit);
    select.offset(offset).limit(filter.limit).all(conn).await
}

/// Set the status of the order with the given order number.
///
/// Returns `Ok(None)` when no such order exists, otherwise refetches
/// and returns the updated row.
pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_number: i64,
    status: OrderStatus,
) -> Result<Option<orders::Model>, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = orders::Entity::update_many()
        .col_expr(
            orders::Column::Status,
            Expr::val(status).cast_as(Alias::new("order_status")),
        )
        .col_expr(orders::Column::UpdatedAt, Expr::val(now).into())
        .filter(orders::Column::OrderNumber.eq(order_number))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    find_by_order_number(conn, order_number).await
}

pub async fn delete_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = orders::Entity::delete_by_id(order_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// Order count and lifetime spend for one customer, in a single query.
/// `SUM(bigint)` comes back as numeric, so it is cast down in SQL.
pub async fn customer_order_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<(i64, i64), sea_orm::DbErr> {
    let row: Option<(i64, Option<i64>)> = orders::Entity::find()
        .select_only()
        .column_as(orders::Column::Id.count(), "order_count")
        .column_as(
            orders::Column::TotalAmount.sum().cast_as(Alias::new("BIGINT")),
            "total_spent",
        )
        .filter(orders::Column::CustomerId.eq(customer_id))
        .into_tuple()
        .one(conn)
        .await?;

    let (count, spent) = row.unwrap_or((0, None));
    Ok((count, spent.unwrap_or(0)))
}
