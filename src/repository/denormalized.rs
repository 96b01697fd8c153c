//! The denormalized export view.
//!
//! `denormalized_page_data` flattens one page per row: project and namespace
//! names left-joined in, distinct category names collapsed to one delimited
//! string, and the edit/page_view/comment relations distinct-counted. The
//! distinct counts matter: three one-to-many joins in one query fan out, and
//! counting raw rows would multiply the counts (a page with 3 categories and
//! 2 edits must report edit_count = 2, not 6).

use diesel_async::{RunQueryDsl, SimpleAsyncConnection};

use super::models::{CountRow, DenormalizedPageRecord};
use super::pool::{DbError, DbPool};
use crate::models::DenormalizedPage;
use crate::{with_conn, with_conn_split};

/// Name of the view this repository manages.
pub const VIEW_NAME: &str = "denormalized_page_data";

/// Separator used between category names in the `categories` column.
pub const CATEGORY_SEPARATOR: &str = "; ";

impl From<DenormalizedPageRecord> for DenormalizedPage {
    fn from(record: DenormalizedPageRecord) -> Self {
        DenormalizedPage {
            page_id: record.page_id,
            title: record.title,
            views: record.views,
            text: record.text,
            project_name: record.project_name,
            namespace_name: record.namespace_name,
            categories: record.categories,
            edit_count: record.edit_count,
            view_count: record.view_count,
            comment_count: record.comment_count,
        }
    }
}

/// Shared body of the view definition; only the category aggregation differs
/// between backends.
fn view_body(categories_expr: &str, limit: u32) -> String {
    format!(
        "CREATE VIEW {VIEW_NAME} AS \
         SELECT \
             p.id AS page_id, \
             p.title AS title, \
             p.views AS views, \
             p.text AS text, \
             pr.name AS project_name, \
             n.name AS namespace_name, \
             {categories_expr} AS categories, \
             COUNT(DISTINCT e.id) AS edit_count, \
             COUNT(DISTINCT pv.id) AS view_count, \
             COUNT(DISTINCT cm.id) AS comment_count \
         FROM page p \
         LEFT JOIN project pr ON p.project_id = pr.id \
         LEFT JOIN namespace n ON p.namespace_id = n.id \
         LEFT JOIN page_category pc ON pc.page_id = p.id \
         LEFT JOIN category c ON c.id = pc.category_id \
         LEFT JOIN edit e ON e.page_id = p.id \
         LEFT JOIN page_view pv ON pv.page_id = p.id \
         LEFT JOIN comment cm ON cm.page_id = p.id \
         GROUP BY p.id, p.title, p.views, p.text, pr.name, n.name \
         LIMIT {limit}"
    )
}

/// Repository for creating and reading the denormalized export view.
#[derive(Clone)]
pub struct DenormalizedViewRepository {
    pool: DbPool,
}

impl DenormalizedViewRepository {
    /// Create a new view repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Drop and recreate the view with the given row limit baked in.
    ///
    /// Idempotent: re-running against an unchanged database leaves an
    /// equivalent view in place. Neither backend gets CREATE OR REPLACE -
    /// SQLite doesn't support it and Postgres's refuses column-set changes,
    /// so both use DROP + CREATE.
    pub async fn ensure_view(&self, limit: u32) -> Result<(), DbError> {
        tracing::info!("recreating view {} (limit {})", VIEW_NAME, limit);

        with_conn_split!(self.pool,
            sqlite: conn => {
                // GROUP_CONCAT(DISTINCT x) only supports the default comma
                // separator, so dedup in a derived table and aggregate with
                // the two-argument form. Keeps names containing commas intact.
                let categories = format!(
                    "(SELECT GROUP_CONCAT(name, '{CATEGORY_SEPARATOR}') \
                      FROM (SELECT DISTINCT c2.name AS name \
                            FROM page_category pc2 \
                            JOIN category c2 ON c2.id = pc2.category_id \
                            WHERE pc2.page_id = p.id))"
                );
                let create = view_body(&categories, limit);
                conn.batch_execute(&format!("DROP VIEW IF EXISTS {VIEW_NAME}; {create}"))
                    .await
            },
            postgres: conn => {
                let create = view_body(
                    &format!("STRING_AGG(DISTINCT c.name, '{CATEGORY_SEPARATOR}')"),
                    limit,
                );
                diesel::sql_query(format!("DROP VIEW IF EXISTS {VIEW_NAME}"))
                    .execute(&mut conn)
                    .await?;
                diesel::sql_query(create).execute(&mut conn).await?;
                Ok(())
            }
        )
    }

    /// Fetch every row of the view, in whatever order it produces them.
    pub async fn fetch_all(&self) -> Result<Vec<DenormalizedPage>, DbError> {
        let query = format!(
            "SELECT page_id, title, views, text, project_name, namespace_name, \
             categories, edit_count, view_count, comment_count \
             FROM {VIEW_NAME}"
        );

        with_conn!(self.pool, conn => {
            let rows: Vec<DenormalizedPageRecord> =
                diesel::sql_query(&query).load(&mut conn).await?;
            Ok(rows.into_iter().map(DenormalizedPage::from).collect())
        })
    }

    /// Count the rows the view currently produces.
    pub async fn count(&self) -> Result<i64, DbError> {
        let query = format!("SELECT COUNT(*) AS count FROM {VIEW_NAME}");

        with_conn!(self.pool, conn => {
            let row: CountRow = diesel::sql_query(&query).get_result(&mut conn).await?;
            Ok(row.count)
        })
    }
}
