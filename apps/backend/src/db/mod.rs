//! Database access helpers.

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Borrow the connection out of [`AppState`], or fail with the 503
/// `DB_UNAVAILABLE` error when the state was built without one.
///
/// Every handler and service goes through this instead of touching
/// `AppState::db` directly, so a db-less state degrades uniformly.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}
