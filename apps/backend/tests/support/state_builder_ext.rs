//! Test-only extension trait for StateBuilder
//!
//! Provides mock database wiring on top of the production StateBuilder
//! so tests can script SeaORM results without a live Postgres.

use backend::infra::state::StateBuilder;
use sea_orm::{DatabaseBackend, MockDatabase};

/// Test-only extension trait for StateBuilder
pub trait StateBuilderTestExt {
    /// Attach an empty SeaORM mock connection for Postgres. Any query
    /// against it fails with an exhausted-buffer error, which is exactly
    /// what the db-failure tests want.
    fn with_mock_db(self) -> Self;

    /// Attach a SeaORM mock connection with pre-scripted query/exec
    /// results. The closure receives the MockDatabase builder-style,
    /// since the append methods consume their receiver.
    fn with_mock_db_with_results<F>(self, setup_fn: F) -> Self
    where
        F: FnOnce(MockDatabase) -> MockDatabase;
}

impl StateBuilderTestExt for StateBuilder {
    fn with_mock_db(self) -> Self {
        let conn = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        self.with_existing_db(conn)
    }

    fn with_mock_db_with_results<F>(self, setup_fn: F) -> Self
    where
        F: FnOnce(MockDatabase) -> MockDatabase,
    {
        let mock_db = setup_fn(MockDatabase::new(DatabaseBackend::Postgres));
        self.with_existing_db(mock_db.into_connection())
    }
}
