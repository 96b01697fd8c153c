//! Repository layer for database access.
//!
//! All database access uses Diesel ORM, async via diesel-async. The schema is
//! externally owned: this layer reads and lightly maintains the wiki tables
//! and manages the `denormalized_page_data` view, but never creates tables.

pub mod category;
pub mod context;
pub mod denormalized;
pub mod models;
pub mod page;
pub mod pool;
pub mod schema;
pub mod util;

pub use category::CategoryRepository;
pub use context::DbContext;
pub use denormalized::{DenormalizedViewRepository, VIEW_NAME};
pub use page::PageRepository;
pub use pool::{DbError, DbPool};

use chrono::{DateTime, Utc};

diesel::define_sql_function! {
    /// SQL LOWER(), available on both backends.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Parse an optional RFC 3339 datetime string from the database.
pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_opt() {
        let parsed = parse_datetime_opt(Some("2024-03-01T12:00:00Z".to_string()));
        assert!(parsed.is_some());

        assert!(parse_datetime_opt(Some("not a date".to_string())).is_none());
        assert!(parse_datetime_opt(None).is_none());
    }
}
