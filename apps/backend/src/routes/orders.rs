use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::domain::orders::OrderItem;
use crate::entities::orders::{OrderStatus, PaymentMethod};
use crate::error::AppError;
use crate::extractors::{AdminUser, CurrentUser, Owned, ValidatedJson};
use crate::repos::orders::Order;
use crate::routes::fmt_timestamp;
use crate::services::orders::{self, MyOrdersQuery, NewOrder, OrderListQuery};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
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
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_id: order.customer_id,
            status: order.status,
            payment: order.payment,
            total_amount: order.total_amount,
            email: order.email,
            phone: order.phone,
            address: order.address,
            comment: order.comment,
            items: order.items,
            created_at: fmt_timestamp(order.created_at),
            updated_at: fmt_timestamp(order.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Checkout: the caller becomes the order's customer.
async fn create_order(
    current_user: CurrentUser,
    body: ValidatedJson<NewOrder>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let order = orders::create_order(current_user.id, body.into_inner(), db).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

async fn list_all_orders(
    _admin: AdminUser,
    query: web::Query<OrderListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let page = orders::list_orders(&query, db).await?;
    Ok(HttpResponse::Ok().json(page.map(OrderResponse::from)))
}

async fn list_my_orders(
    current_user: CurrentUser,
    query: web::Query<MyOrdersQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let page = orders::list_customer_orders(current_user.id, &query, db).await?;
    Ok(HttpResponse::Ok().json(page.map(OrderResponse::from)))
}

/// Owner-scoped fetch. The ownership guard has already fetched the
/// order, so this handler only renders it.
async fn get_my_order(owned: Owned<Order>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(OrderResponse::from(owned.resource)))
}

async fn get_order(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order_number = orders::parse_order_number(&path.into_inner())?;
    let db = require_db(&app_state)?;
    let order = orders::get_order(order_number, db).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

async fn update_order_status(
    _admin: AdminUser,
    path: web::Path<String>,
    body: ValidatedJson<UpdateOrderStatusRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order_number = orders::parse_order_number(&path.into_inner())?;
    let db = require_db(&app_state)?;
    let order = orders::update_order_status(order_number, &body.status, db).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// Deletion is keyed by primary id, unlike the reads which use the
/// public order number.
async fn delete_order(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order_id = orders::parse_order_id(&path.into_inner())?;
    let db = require_db(&app_state)?;
    orders::delete_order(order_id, db).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_order)));
    // Literal paths go first; "/{order_number}" would swallow them.
    cfg.service(web::resource("/all").route(web::get().to(list_all_orders)));
    cfg.service(web::resource("/all/me").route(web::get().to(list_my_orders)));
    cfg.service(web::resource("/me/{order_number}").route(web::get().to(get_my_order)));
    cfg.service(
        web::resource("/{order_number}")
            .route(web::get().to(get_order))
            .route(web::patch().to(update_order_status))
            .route(web::delete().to(delete_order)),
    );
}
