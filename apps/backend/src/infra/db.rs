use sea_orm::{Database, DatabaseConnection};

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

/// Opens a connection for the given profile and role.
///
/// Schema is taken as-is; applying migrations is the migration CLI's job.
pub async fn connect_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile, owner)?;
    Ok(Database::connect(&url).await?)
}
