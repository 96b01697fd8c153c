//! Diesel ORM records for database tables and raw query rows.
//!
//! Records mirror the external tables one-to-one; conversion into domain
//! models lives next to the repository that loads them.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};

use super::schema;

/// Page record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::page)]
pub struct PageRecord {
    pub id: i32,
    pub title: String,
    pub project_id: Option<i32>,
    pub views: i32,
    pub status: String,
    pub namespace_id: Option<i32>,
    pub text: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Category record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::category)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
    pub text_content: String,
    pub status: String,
}

/// One row of the `denormalized_page_data` view.
///
/// Counts come back as BigInt on both backends (SQLite integers widen, and
/// Postgres COUNT is int8); id/views stay at the page table's Integer width.
#[derive(QueryableByName, Debug, Clone)]
pub struct DenormalizedPageRecord {
    #[diesel(sql_type = Integer)]
    pub page_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Integer)]
    pub views: i32,
    #[diesel(sql_type = Text)]
    pub text: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub project_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub namespace_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub categories: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub edit_count: i64,
    #[diesel(sql_type = BigInt)]
    pub view_count: i64,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

/// Aggregate statistics row over the page table.
///
/// SUM/AVG/MAX/MIN are null on an empty table; the query casts them so the
/// same row shape loads on both backends.
#[derive(QueryableByName, Debug)]
pub struct PageStatsRow {
    #[diesel(sql_type = BigInt)]
    pub total_pages: i64,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub total_views: Option<i64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_views: Option<f64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub max_views: Option<i64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub min_views: Option<i64>,
    #[diesel(sql_type = BigInt)]
    pub projects_count: i64,
    #[diesel(sql_type = BigInt)]
    pub namespaces_count: i64,
}

/// Category row with its distinct page count.
#[derive(QueryableByName, Debug)]
pub struct CategoryCountRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub text_content: String,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = BigInt)]
    pub page_count: i64,
}

/// Single-count result row for raw COUNT queries.
#[derive(QueryableByName, Debug)]
pub struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
