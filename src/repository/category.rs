//! Diesel-based category repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::lower;
use super::models::{CategoryCountRow, CategoryRecord};
use super::pool::{DbError, DbPool};
use super::schema::{category, page_category};
use crate::models::{Category, PageStatus};
use crate::with_conn;

impl From<CategoryCountRow> for Category {
    fn from(row: CategoryCountRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            text_content: row.text_content,
            status: PageStatus::from_str(&row.status).unwrap_or(PageStatus::Stub),
            page_count: row.page_count,
        }
    }
}

/// Category repository.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: DbPool,
}

impl CategoryRepository {
    /// Create a new category repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List categories ordered by ID, each with its distinct page count.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>, DbError> {
        // The page count left-joins the link table so empty categories show 0.
        let query = format!(
            "SELECT c.id, c.name, c.text_content, c.status, \
             COUNT(DISTINCT pc.page_id) AS page_count \
             FROM category c \
             LEFT JOIN page_category pc ON pc.category_id = c.id \
             GROUP BY c.id, c.name, c.text_content, c.status \
             ORDER BY c.id \
             LIMIT {limit} OFFSET {offset}"
        );

        with_conn!(self.pool, conn => {
            let rows: Vec<CategoryCountRow> =
                diesel::sql_query(&query).load(&mut conn).await?;
            Ok(rows.into_iter().map(Category::from).collect())
        })
    }

    /// Get a category by name (case-insensitive), with its page count.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, DbError> {
        let needle = name.to_lowercase();

        let record = with_conn!(self.pool, conn => {
            category::table
                .filter(lower(category::name).eq(needle.clone()))
                .select(CategoryRecord::as_select())
                .first::<CategoryRecord>(&mut conn)
                .await
                .optional()
        })?;

        let Some(record) = record else {
            return Ok(None);
        };

        let page_count = with_conn!(self.pool, conn => {
            page_category::table
                .filter(page_category::category_id.eq(record.id))
                .select(diesel::dsl::count_distinct(page_category::page_id))
                .get_result::<i64>(&mut conn)
                .await
        })?;

        Ok(Some(Category {
            id: record.id,
            name: record.name,
            text_content: record.text_content,
            status: PageStatus::from_str(&record.status).unwrap_or(PageStatus::Stub),
            page_count,
        }))
    }

    /// Count total categories.
    pub async fn count(&self) -> Result<i64, DbError> {
        with_conn!(self.pool, conn => {
            category::table.count().get_result(&mut conn).await
        })
    }
}
