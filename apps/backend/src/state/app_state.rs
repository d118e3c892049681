use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Shared per-worker state handed to every handler.
///
/// Cloning is cheap; the connection is a pooled handle. The database slot
/// is optional so tests and degraded startup can run without one, with
/// `crate::db::require_db` turning the absence into a uniform 503.
///
/// The connection sits behind an `Arc`: `DatabaseConnection` stops being
/// `Clone` when sea-orm's `mock` feature is on, which test builds enable
/// through the dev-dependencies.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Option<Arc<DatabaseConnection>>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(Arc::new(db)),
            security,
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    /// Borrow the connection, if configured. Handlers and services go
    /// through `crate::db::require_db` instead.
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_deref()
    }

    #[cfg(test)]
    pub fn for_tests(db: DatabaseConnection) -> Self {
        Self::new(db, SecurityConfig::default())
    }

    #[cfg(test)]
    pub fn for_tests_without_db() -> Self {
        Self::new_without_db(SecurityConfig::default())
    }
}
