use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Larkstore backend is running"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
    time: String,
}

/// Outcome of the database probe, flattened into the health body.
struct DbReport {
    db: String,
    db_error: Option<String>,
    migrations: String,
}

impl DbReport {
    fn ok(migrations: String) -> Self {
        Self {
            db: "ok".into(),
            db_error: None,
            migrations,
        }
    }

    fn error(detail: String) -> Self {
        Self {
            db: "error".into(),
            db_error: Some(detail),
            migrations: "unknown".into(),
        }
    }
}

/// Round-trip one trivial query, then report the newest applied
/// migration so a deploy can confirm the schema it expects is live.
async fn probe_database(app_state: &AppState) -> DbReport {
    let db = match require_db(app_state) {
        Ok(db) => db,
        Err(e) => return DbReport::error(format!("DB unavailable: {e}")),
    };

    let ping = Statement::from_string(
        db.get_database_backend(),
        "SELECT 1 as health_check".to_string(),
    );
    if let Err(e) = db.query_one(ping).await {
        return DbReport::error(format!("DB query failed: {e}"));
    }

    let migrations = match get_latest_migration_version(db).await {
        Ok(Some(version)) => version,
        Ok(None) => "no_migrations".to_string(),
        Err(_) => "unknown".to_string(),
    };
    DbReport::ok(migrations)
}

/// Liveness and readiness in one report: the process answers, and the
/// body says whether the database behind it does too. A broken database
/// turns up in the body, not in the status code; orchestrators watching
/// this endpoint should not restart the process over a database
/// incident.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = probe_database(&app_state).await;

    let time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        db: report.db,
        db_error: report.db_error,
        migrations: report.migrations,
        time,
    }))
}

pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    // Root route is registered separately in main.rs.
    cfg.route("/health", web::get().to(health));
}
