//! DTOs for orders_sea adapter.

use time::OffsetDateTime;

use crate::domain::orders::OrderItem;
use crate::domain::paging::SortDir;
use crate::entities::orders::{OrderStatus, PaymentMethod};

/// DTO for creating a new order. The order number is allocated by the
/// database sequence, never by the caller.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub payment: PaymentMethod,
    pub total_amount: i64,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub comment: Option<String>,
    pub items: Vec<OrderItem>,
}

/// Sortable columns of the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortField {
    #[default]
    CreatedAt,
    TotalAmount,
    OrderNumber,
}

/// Filter for order lists. `page` is 1-based; `customer_id` narrows
/// the list to one customer's orders for the "my orders" routes.
#[derive(Debug, Clone)]
pub struct OrderListFilter {
    pub page: u64,
    pub limit: u64,
    pub sort_field: OrderSortField,
    pub sort_order: SortDir,
    pub status: Option<OrderStatus>,
    pub total_amount_from: Option<i64>,
    pub total_amount_to: Option<i64>,
    pub date_from: Option<OffsetDateTime>,
    pub date_to: Option<OffsetDateTime>,
    pub search: Option<String>,
    pub customer_id: Option<i64>,
}

impl Default for OrderListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_field: OrderSortField::default(),
            sort_order: SortDir::default(),
            status: None,
            total_amount_from: None,
            total_amount_to: None,
            date_from: None,
            date_to: None,
            search: None,
            customer_id: None,
        }
    }
}

impl OrderListFilter {
    /// Filter scoped to one customer, for the self-service list.
    pub fn for_customer(customer_id: i64) -> Self {
        Self {
            customer_id: Some(customer_id),
            limit: 5,
            ..Self::default()
        }
    }
}
