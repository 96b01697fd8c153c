//! Database context for managing connections and repository access.
//!
//! The DbContext is the primary entry point for all database operations.
//! It holds the connection pool and provides access to all repositories.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::category::CategoryRepository;
use super::denormalized::DenormalizedViewRepository;
use super::page::PageRepository;
use super::pool::{DbError, DbPool};

/// Database context that manages the connection pool and provides repository
/// access.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("postgres://localhost/wiki")?;
/// let stats = ctx.pages().statistics().await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a context from a database file path (SQLite only).
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: DbPool::sqlite_from_path(db_path),
        }
    }

    /// Create a context from a database URL.
    ///
    /// Supports:
    /// - SQLite: file paths or `sqlite:` URLs
    /// - PostgreSQL: `postgres://` or `postgresql://` URLs
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        Ok(Self {
            pool: DbPool::from_url(url)?,
        })
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get a page repository.
    pub fn pages(&self) -> PageRepository {
        PageRepository::new(self.pool.clone())
    }

    /// Get a category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Get a repository for the denormalized export view.
    pub fn denormalized(&self) -> DenormalizedViewRepository {
        DenormalizedViewRepository::new(self.pool.clone())
    }

    /// Verify the connection works.
    ///
    /// Useful for failing fast at startup if the database is unreachable.
    /// For SQLite, this creates the database file if it doesn't exist.
    pub async fn test_connection(&self) -> Result<(), DbError> {
        crate::with_conn!(self.pool, conn => {
            conn.batch_execute("SELECT 1").await
        })
    }
}
