//! The execution boundary.
//!
//! [`SchemaBuilder`](crate::builder::SchemaBuilder) needs exactly two things
//! from a database: run a statement, and read back a single integer. The
//! [`Connection`] trait captures that; it is implemented for sqlx pools.

use std::future::Future;
use std::str::FromStr;

use oxide_blueprint::Dialect;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// A connection-like collaborator that executes DDL.
pub trait Connection: Send + Sync {
    /// Error reported by the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes one statement. The text may hold several `; `-separated
    /// commands.
    fn execute(&self, sql: &str)
    -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;

    /// Runs a query returning a single integer (e.g. `COUNT(*)`).
    fn query_count(&self, sql: &str)
    -> impl Future<Output = std::result::Result<i64, Self::Error>> + Send;
}

impl Connection for SqlitePool {
    type Error = sqlx::Error;

    async fn execute(&self, sql: &str) -> std::result::Result<(), Self::Error> {
        sqlx::raw_sql(sql).execute(self).await?;
        Ok(())
    }

    async fn query_count(&self, sql: &str) -> std::result::Result<i64, Self::Error> {
        sqlx::query_scalar::<_, i64>(sql).fetch_one(self).await
    }
}

impl Connection for PgPool {
    type Error = sqlx::Error;

    async fn execute(&self, sql: &str) -> std::result::Result<(), Self::Error> {
        // Simple query protocol: PostgreSQL rejects several commands in one
        // prepared statement.
        sqlx::raw_sql(sql).execute(self).await?;
        Ok(())
    }

    async fn query_count(&self, sql: &str) -> std::result::Result<i64, Self::Error> {
        sqlx::query_scalar::<_, i64>(sql).fetch_one(self).await
    }
}

/// A pool for whichever backend a database URL names.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite pool.
    Sqlite(SqlitePool),
    /// PostgreSQL pool.
    Postgres(PgPool),
}

impl DatabasePool {
    /// Connects to `url`. `postgres://` and `postgresql://` URLs open a
    /// PostgreSQL pool; anything else is treated as SQLite, creating the
    /// database file if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Database`](crate::error::SchemaError::Database)
    /// if the URL is invalid or the connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        if Self::dialect_for_url(url) == Dialect::Postgres {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            return Ok(Self::Postgres(pool));
        }

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self::Sqlite(pool))
    }

    /// Infers the dialect from a database URL scheme.
    #[must_use]
    pub fn dialect_for_url(url: &str) -> Dialect {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else {
            Dialect::Sqlite
        }
    }

    /// Returns the dialect of the connected backend.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        match self {
            Self::Sqlite(_) => Dialect::Sqlite,
            Self::Postgres(_) => Dialect::Postgres,
        }
    }
}

impl Connection for DatabasePool {
    type Error = sqlx::Error;

    async fn execute(&self, sql: &str) -> std::result::Result<(), Self::Error> {
        match self {
            Self::Sqlite(pool) => Connection::execute(pool, sql).await,
            Self::Postgres(pool) => Connection::execute(pool, sql).await,
        }
    }

    async fn query_count(&self, sql: &str) -> std::result::Result<i64, Self::Error> {
        match self {
            Self::Sqlite(pool) => pool.query_count(sql).await,
            Self::Postgres(pool) => pool.query_count(sql).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for_url() {
        assert_eq!(
            DatabasePool::dialect_for_url("postgres://localhost/app"),
            Dialect::Postgres
        );
        assert_eq!(
            DatabasePool::dialect_for_url("postgresql://u:p@db/app"),
            Dialect::Postgres
        );
        assert_eq!(
            DatabasePool::dialect_for_url("sqlite:db.sqlite3"),
            Dialect::Sqlite
        );
        assert_eq!(DatabasePool::dialect_for_url(":memory:"), Dialect::Sqlite);
    }

    #[tokio::test]
    async fn test_sqlite_pool_executes_and_counts() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");

        Connection::execute(&pool, "CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2)")
            .await
            .unwrap();
        assert_eq!(pool.query_count("SELECT COUNT(*) FROM t").await.unwrap(), 2);
    }
}
