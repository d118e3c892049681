use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::Role;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AdminUser, ValidatedJson};
use crate::repos::customers::CustomerSummary;
use crate::routes::fmt_timestamp;
use crate::routes::orders::OrderResponse;
use crate::services::customers::{self, CustomerDetail, CustomerListQuery, UpdateCustomer};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: String,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(customer: CustomerSummary) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            roles: customer.roles,
            created_at: fmt_timestamp(customer.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    pub customer: CustomerResponse,
    pub order_count: i64,
    pub total_spent: i64,
    pub recent_orders: Vec<OrderResponse>,
}

impl From<CustomerDetail> for CustomerDetailResponse {
    fn from(detail: CustomerDetail) -> Self {
        Self {
            customer: CustomerResponse::from(detail.customer),
            order_count: detail.stats.order_count,
            total_spent: detail.stats.total_spent,
            recent_orders: detail
                .recent_orders
                .into_iter()
                .map(OrderResponse::from)
                .collect(),
        }
    }
}

async fn list_customers(
    _admin: AdminUser,
    query: web::Query<CustomerListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let page = customers::list_customers(&query, db).await?;
    Ok(HttpResponse::Ok().json(page.map(CustomerResponse::from)))
}

async fn get_customer(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customers::parse_customer_id(&path.into_inner())?;
    let db = require_db(&app_state)?;
    let detail = customers::customer_detail(customer_id, db).await?;
    Ok(HttpResponse::Ok().json(CustomerDetailResponse::from(detail)))
}

async fn update_customer(
    _admin: AdminUser,
    path: web::Path<String>,
    body: ValidatedJson<UpdateCustomer>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customers::parse_customer_id(&path.into_inner())?;
    let db = require_db(&app_state)?;
    let customer = customers::update_customer(customer_id, body.into_inner(), db).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

async fn delete_customer(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer_id = customers::parse_customer_id(&path.into_inner())?;
    let db = require_db(&app_state)?;
    customers::delete_customer(customer_id, db).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list_customers)));
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_customer))
            .route(web::patch().to(update_customer))
            .route(web::delete().to(delete_customer)),
    );
}
