//! Schema migrations for the Larkstore database.
//!
//! The migration CLI and the test bootstrap both go through [`migrate`];
//! nothing here reads the environment, connections come from the caller.

pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20250825_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250825_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl MigrationCommand {
    /// Status only reads the seaql_migrations table.
    fn mutates(self) -> bool {
        !matches!(self, MigrationCommand::Status)
    }
}

/// Runs one migration command against an already-open connection, logging a
/// before/after snapshot of the runner state.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = RunnerSnapshot::capture(db).await?;
    tracing::info!("▶ cmd={command:?}  backend={}", before.backend);
    tracing::info!("▶ connected to DB: {}", before.database);
    tracing::info!("▶ BEFORE: {}", before.counts());

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if command.mutates() {
                let after = RunnerSnapshot::capture(db).await?;
                tracing::info!("▶ AFTER: {}", after.counts());
            }
            tracing::info!("✅ {command:?} OK for {}", before.database);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {command:?} failed for {}: {e}", before.database);
            Err(e)
        }
    }
}

#[derive(Debug)]
struct RunnerSnapshot {
    backend: String,
    database: String,
    applied: usize,
    defined: usize,
}

impl RunnerSnapshot {
    async fn capture(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self {
            backend: format!("{:?}", db.get_database_backend()),
            database: current_database(db).await?,
            applied: count_applied_migrations(db).await.unwrap_or(0),
            defined: Migrator::migrations().len(),
        })
    }

    fn counts(&self) -> String {
        format!(
            "runner has {} migration(s) defined, {} applied",
            self.defined, self.applied
        )
    }
}

async fn current_database(db: &DatabaseConnection) -> Result<String, DbErr> {
    if db.get_database_backend() != DatabaseBackend::Postgres {
        return Ok("<unsupported>".to_string());
    }

    let stmt = Statement::from_string(
        db.get_database_backend(),
        String::from("select current_database() as name"),
    );
    match db.query_one(stmt).await? {
        Some(row) => row.try_get("", "name"),
        None => Ok("<unknown>".to_string()),
    }
}

/// Number of applied migrations; a database the runner has never touched
/// counts as zero.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(list) => Ok(list.len()),
        // The seaql_migrations table does not exist until the first `up`.
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Version string of the newest applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(list) => Ok(list.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
