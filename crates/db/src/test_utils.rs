//! Test utilities for database operations.
//!
//! Provides helpers for setting up and tearing down test databases. Integration
//! tests use [`TestDatabase::in_memory`], which runs the real migrations against
//! a private `SQLite` database, so unique indexes, grouped counts and conditional
//! updates behave exactly as they do in production.

use std::sync::Arc;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migrations::Migrator;

/// Test database configuration for running against a real `PostgreSQL` server.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "agora_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "agora_test".to_string()),
            database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "agora_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory `SQLite` database with every migration applied.
    ///
    /// The pool holds exactly one connection: an in-memory database lives and dies
    /// with the connection that opened it.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Connect to the `PostgreSQL` test database described by `config` and migrate it.
    pub async fn postgres(config: &TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get a shareable handle to the connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Execute a raw SQL statement, for tests that need to corrupt data on purpose.
    pub async fn execute_raw(&self, sql: &str) -> Result<u64, DbErr> {
        let backend = self.conn.get_database_backend();
        let result = self
            .conn
            .execute(Statement::from_string(backend, sql.to_string()))
            .await?;
        Ok(result.rows_affected())
    }

    /// Backend the connection talks to.
    #[must_use]
    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }
}
