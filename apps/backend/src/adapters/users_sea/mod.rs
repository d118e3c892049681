//! SeaORM adapter for the users / user_credentials tables.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{user_credentials, users};

pub mod dto;

pub use dto::{
    CredentialsCreate, CustomerListFilter, CustomerSortField, CustomerUpdate, UserCreate,
    UserProfileUpdate,
};

use crate::domain::paging::SortDir;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// `'role' = ANY(roles)` membership test on the text[] column.
fn has_role_expr(role: &str) -> SimpleExpr {
    Expr::cust_with_values("? = ANY(roles)", [role])
}

/// Escape LIKE wildcards in a raw search term (backslash escape).
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await
}

pub async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<user_credentials::Model>, sea_orm::DbErr> {
    user_credentials::Entity::find()
        .filter(user_credentials::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn find_credentials_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<user_credentials::Model>, sea_orm::DbErr> {
    user_credentials::Entity::find()
        .filter(user_credentials::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Insert a user keyed on `sub`, or return the existing row.
/// The boolean is true when this call created the row.
pub async fn ensure_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<(users::Model, bool), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let sub = dto.sub.clone();

    let user_active = users::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        name: Set(dto.name),
        phone: NotSet,
        roles: Set(dto.roles),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = users::Entity::insert(user_active)
        .on_conflict(
            OnConflict::column(users::Column::Sub)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let inserted = rows == 1;
    let user = users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("users.sub not found".to_string()))?;

    Ok((user, inserted))
}

/// Insert credentials keyed on `email`, or return the existing row.
/// The boolean is true when this call created the row.
pub async fn ensure_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CredentialsCreate,
) -> Result<(user_credentials::Model, bool), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let email = dto.email.clone();

    let credential_active = user_credentials::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        email: Set(dto.email),
        password_hash: NotSet,
        last_login: Set(Some(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = user_credentials::Entity::insert(credential_active)
        .on_conflict(
            OnConflict::column(user_credentials::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let inserted = rows == 1;
    let creds = user_credentials::Entity::find()
        .filter(user_credentials::Column::Email.eq(email))
        .one(conn)
        .await?
        .ok_or_else(|| {
            sea_orm::DbErr::RecordNotFound("user_credentials.email not found".to_string())
        })?;

    Ok((creds, inserted))
}

pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credentials_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let credential_active = user_credentials::ActiveModel {
        id: Set(credentials_id),
        last_login: Set(Some(now)),
        updated_at: Set(now),
        ..Default::default()
    };
    credential_active.update(conn).await?;
    Ok(())
}

/// Partial update of a user's own profile fields. Unset fields keep
/// their stored value.
pub async fn update_user_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserProfileUpdate,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut user_active = users::ActiveModel {
        id: Set(user_id),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    if let Some(name) = dto.name {
        user_active.name = Set(name);
    }
    if let Some(phone) = dto.phone {
        user_active.phone = Set(Some(phone));
    }
    user_active.update(conn).await
}

/// Admin-side partial update of a customer record, including roles.
pub async fn update_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: CustomerUpdate,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut user_active = users::ActiveModel {
        id: Set(user_id),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    if let Some(name) = dto.name {
        user_active.name = Set(name);
    }
    if let Some(phone) = dto.phone {
        user_active.phone = Set(Some(phone));
    }
    if let Some(roles) = dto.roles {
        user_active.roles = Set(roles);
    }
    user_active.update(conn).await
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = users::Entity::delete_by_id(user_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// A customer row is a user holding the customer role, joined with its
/// credentials so the caller gets the email in one query.
fn customer_select(
    filter: &CustomerListFilter,
) -> sea_orm::SelectTwo<users::Entity, user_credentials::Entity> {
    let mut select = users::Entity::find()
        .find_also_related(user_credentials::Entity)
        .filter(has_role_expr("customer"));

    if let Some(term) = filter.search.as_deref() {
        let pattern = format!("%{}%", escape_like(term));
        select = select.filter(
            Condition::any()
                .add(Expr::col((users::Entity, users::Column::Name)).ilike(pattern.clone()))
                .add(
                    Expr::col((user_credentials::Entity, user_credentials::Column::Email))
                        .ilike(pattern),
                ),
        );
    }
    if let Some(from) = filter.registered_from {
        select = select.filter(users::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.registered_to {
        select = select.filter(users::Column::CreatedAt.lte(to));
    }

    select
}

pub async fn count_customers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CustomerListFilter,
) -> Result<u64, sea_orm::DbErr> {
    customer_select(filter).count(conn).await
}

pub async fn list_customers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CustomerListFilter,
) -> Result<Vec<(users::Model, Option<user_credentials::Model>)>, sea_orm::DbErr> {
    let direction = match filter.sort_order {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    };

    let select = customer_select(filter);
    let select = match filter.sort_field {
        CustomerSortField::CreatedAt => select.order_by(users::Column::CreatedAt, direction),
        CustomerSortField::Name => select.order_by(users::Column::Name, direction),
        CustomerSortField::Email => select.order_by(user_credentials::Column::Email, direction),
    };

    let offset = filter.page.saturating_sub(1).saturating_mul(filter.limit);
    select.offset(offset).limit(filter.limit).all(conn).await
}

pub async fn find_customer_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<(users::Model, Option<user_credentials::Model>)>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id)
        .find_also_related(user_credentials::Entity)
        .filter(has_role_expr("customer"))
        .one(conn)
        .await
}
