use sea_orm::DatabaseConnection;

use crate::config::db::{DbOwner, DbProfile};
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Assembles an [`AppState`] for the server and for tests.
///
/// A connection can come from a profile (resolved through the environment)
/// or be injected directly; an injected connection wins. With neither, the
/// state is built database-less and handlers answer 503 on data paths.
pub struct StateBuilder {
    security: SecurityConfig,
    profile: Option<DbProfile>,
    connection: Option<DatabaseConnection>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security: SecurityConfig::default(),
            profile: None,
            connection: None,
        }
    }

    /// Connect to the database for `profile` as the app role.
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Use an already-established connection, mock or pooled.
    pub fn with_existing_db(mut self, conn: DatabaseConnection) -> Self {
        self.connection = Some(conn);
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let Self {
            security,
            profile,
            connection,
        } = self;

        let db = match (connection, profile) {
            (Some(conn), _) => Some(conn),
            (None, Some(profile)) => Some(connect_db(profile, DbOwner::App).await?),
            (None, None) => None,
        };

        Ok(match db {
            Some(conn) => AppState::new(conn, security),
            None => AppState::new_without_db(security),
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
