//! Diesel-based page repository.
//!
//! Covers the page-table operations the CLI exposes: joined lookups, keyword
//! search, view-counter maintenance, deletion, and aggregate statistics.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{PageRecord, PageStatsRow};
use super::pool::{DbError, DbPool};
use super::schema::{namespace, page, project};
use super::{lower, parse_datetime_opt};
use crate::models::{Page, PageStats, PageStatus};
use crate::with_conn;

/// Build a domain page from its record plus joined lookup names.
fn assemble(record: PageRecord, project_name: Option<String>, namespace_name: Option<String>) -> Page {
    Page {
        id: record.id,
        title: record.title,
        project_id: record.project_id,
        views: record.views,
        status: PageStatus::from_str(&record.status).unwrap_or(PageStatus::Stub),
        namespace_id: record.namespace_id,
        text: record.text,
        project_name,
        namespace_name,
        created_at: parse_datetime_opt(record.created_at),
        updated_at: parse_datetime_opt(record.updated_at),
    }
}

type JoinedRow = (PageRecord, Option<String>, Option<String>);

/// Page repository with compile-time query checking where the DSL covers it.
#[derive(Clone)]
pub struct PageRepository {
    pool: DbPool,
}

impl PageRepository {
    /// Create a new page repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a page by ID, with project and namespace names left-joined in.
    pub async fn get(&self, id: i32) -> Result<Option<Page>, DbError> {
        with_conn!(self.pool, conn => {
            page::table
                .left_join(project::table)
                .left_join(namespace::table)
                .filter(page::id.eq(id))
                .select((
                    PageRecord::as_select(),
                    project::name.nullable(),
                    namespace::name.nullable(),
                ))
                .first::<JoinedRow>(&mut conn)
                .await
                .optional()
                .map(|row| row.map(|(record, pr, ns)| assemble(record, pr, ns)))
        })
    }

    /// Get a page by title (case-insensitive).
    pub async fn get_by_title(&self, title: &str) -> Result<Option<Page>, DbError> {
        let needle = title.to_lowercase();

        with_conn!(self.pool, conn => {
            page::table
                .filter(lower(page::title).eq(needle.clone()))
                .select(PageRecord::as_select())
                .first::<PageRecord>(&mut conn)
                .await
                .optional()
                .map(|row| row.map(|record| assemble(record, None, None)))
        })
    }

    /// List pages ordered by ID, with pagination.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Page>, DbError> {
        with_conn!(self.pool, conn => {
            page::table
                .left_join(project::table)
                .left_join(namespace::table)
                .order(page::id.asc())
                .limit(limit)
                .offset(offset)
                .select((
                    PageRecord::as_select(),
                    project::name.nullable(),
                    namespace::name.nullable(),
                ))
                .load::<JoinedRow>(&mut conn)
                .await
                .map(|rows| {
                    rows.into_iter()
                        .map(|(record, pr, ns)| assemble(record, pr, ns))
                        .collect()
                })
        })
    }

    /// Search pages by keyword in title or text, most-viewed first.
    pub async fn search(&self, keyword: &str, limit: i64) -> Result<Vec<Page>, DbError> {
        let pattern = format!("%{}%", keyword.to_lowercase());

        with_conn!(self.pool, conn => {
            page::table
                .filter(
                    lower(page::title)
                        .like(pattern.clone())
                        .or(lower(page::text).like(pattern.clone())),
                )
                .order(page::views.desc())
                .limit(limit)
                .select(PageRecord::as_select())
                .load::<PageRecord>(&mut conn)
                .await
                .map(|rows| {
                    rows.into_iter()
                        .map(|record| assemble(record, None, None))
                        .collect()
                })
        })
    }

    /// Get the top viewed pages.
    pub async fn top_viewed(&self, limit: i64) -> Result<Vec<Page>, DbError> {
        with_conn!(self.pool, conn => {
            page::table
                .order(page::views.desc())
                .limit(limit)
                .select(PageRecord::as_select())
                .load::<PageRecord>(&mut conn)
                .await
                .map(|rows| {
                    rows.into_iter()
                        .map(|record| assemble(record, None, None))
                        .collect()
                })
        })
    }

    /// Increment a page's view counter. Returns false if the page is missing.
    pub async fn increment_views(&self, id: i32, by: i32) -> Result<bool, DbError> {
        with_conn!(self.pool, conn => {
            let rows = diesel::update(page::table.find(id))
                .set(page::views.eq(page::views + by))
                .execute(&mut conn)
                .await?;
            Ok(rows > 0)
        })
    }

    /// Replace a page's text content. Returns false if the page is missing.
    pub async fn update_text(&self, id: i32, new_text: &str) -> Result<bool, DbError> {
        with_conn!(self.pool, conn => {
            let rows = diesel::update(page::table.find(id))
                .set(page::text.eq(new_text))
                .execute(&mut conn)
                .await?;
            Ok(rows > 0)
        })
    }

    /// Delete a page by ID. Returns false if the page is missing.
    pub async fn delete(&self, id: i32) -> Result<bool, DbError> {
        with_conn!(self.pool, conn => {
            let rows = diesel::delete(page::table.find(id))
                .execute(&mut conn)
                .await?;
            Ok(rows > 0)
        })
    }

    /// Count total pages.
    pub async fn count(&self) -> Result<i64, DbError> {
        with_conn!(self.pool, conn => {
            page::table.count().get_result(&mut conn).await
        })
    }

    /// Aggregate statistics over the page table.
    ///
    /// The casts keep the row shape identical on SQLite and Postgres
    /// (Postgres AVG is numeric, SQLite SUM stays at integer width).
    pub async fn statistics(&self) -> Result<PageStats, DbError> {
        let query = "SELECT COUNT(*) AS total_pages, \
             CAST(SUM(views) AS BIGINT) AS total_views, \
             CAST(AVG(views) AS DOUBLE PRECISION) AS avg_views, \
             CAST(MAX(views) AS BIGINT) AS max_views, \
             CAST(MIN(views) AS BIGINT) AS min_views, \
             COUNT(DISTINCT project_id) AS projects_count, \
             COUNT(DISTINCT namespace_id) AS namespaces_count \
             FROM page";

        with_conn!(self.pool, conn => {
            let row: PageStatsRow = diesel::sql_query(query).get_result(&mut conn).await?;
            Ok(PageStats {
                total_pages: row.total_pages,
                total_views: row.total_views.unwrap_or(0),
                avg_views: row.avg_views.unwrap_or(0.0),
                max_views: row.max_views.unwrap_or(0),
                min_views: row.min_views.unwrap_or(0),
                projects_count: row.projects_count,
                namespaces_count: row.namespaces_count,
            })
        })
    }
}
