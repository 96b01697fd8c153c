//! End-to-end tests for the denormalization view and CSV export, run against
//! temporary SQLite databases with hand-seeded fixture tables.

use std::collections::HashSet;
use std::path::Path;

use diesel_async::SimpleAsyncConnection;
use tempfile::TempDir;

use pagexport::models::DenormalizedPage;
use pagexport::repository::denormalized::CATEGORY_SEPARATOR;
use pagexport::repository::{DbContext, DbPool};
use pagexport::services::export::{
    classify_db_error, validate_output_path, write_csv, CSV_HEADER,
};

const FIXTURE_SCHEMA: &str = r#"
CREATE TABLE page (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    project_id INTEGER,
    views INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'stub',
    namespace_id INTEGER,
    text TEXT NOT NULL DEFAULT '',
    created_at TEXT,
    updated_at TEXT
);
CREATE TABLE project (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE namespace (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE category (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    text_content TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'stub'
);
CREATE TABLE page_category (
    page_id INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    PRIMARY KEY (page_id, category_id)
);
CREATE TABLE edit (id INTEGER PRIMARY KEY, page_id INTEGER NOT NULL, editor TEXT, edited_at TEXT);
CREATE TABLE page_view (id INTEGER PRIMARY KEY, page_id INTEGER NOT NULL, viewed_at TEXT);
CREATE TABLE comment (id INTEGER PRIMARY KEY, page_id INTEGER NOT NULL, body TEXT, created_at TEXT);
"#;

/// Page 1: no project/namespace, categories X and Y, 3 edits, 0 page views,
/// 1 comment.
/// Page 2: bare - no joined rows anywhere.
/// Page 3: fan-out probe - project + namespace, 3 categories, 2 edits,
/// 4 page views, 2 comments.
const FIXTURE_DATA: &str = r#"
INSERT INTO project (id, name) VALUES (1, 'Wiki');
INSERT INTO namespace (id, name) VALUES (1, 'Main');
INSERT INTO page (id, title, project_id, views, status, namespace_id, text, created_at)
VALUES
    (1, 'A', NULL, 5, 'active', NULL, 'hello', '2024-01-01T00:00:00Z'),
    (2, 'B', NULL, 0, 'stub', NULL, 'empty page', NULL),
    (3, 'C', 1, 9, 'active', 1, 'busy page', NULL);
INSERT INTO category (id, name) VALUES (1, 'X'), (2, 'Y'), (3, 'Z');
INSERT INTO page_category (page_id, category_id)
VALUES (1, 1), (1, 2), (3, 1), (3, 2), (3, 3);
INSERT INTO edit (id, page_id) VALUES (1, 1), (2, 1), (3, 1), (4, 3), (5, 3);
INSERT INTO page_view (id, page_id) VALUES (1, 3), (2, 3), (3, 3), (4, 3);
INSERT INTO comment (id, page_id) VALUES (1, 1), (2, 3), (3, 3);
"#;

async fn exec(ctx: &DbContext, sql: &str) {
    match ctx.pool() {
        DbPool::Sqlite(pool) => {
            let mut conn = pool.get().await.unwrap();
            conn.batch_execute(sql).await.unwrap();
        }
        #[cfg(feature = "postgres")]
        DbPool::Postgres(_) => unreachable!("tests run against SQLite"),
    }
}

async fn seeded_db() -> (DbContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("wiki.db"));
    exec(&ctx, FIXTURE_SCHEMA).await;
    exec(&ctx, FIXTURE_DATA).await;
    (ctx, dir)
}

fn row_for<'a>(rows: &'a [DenormalizedPage], page_id: i32) -> &'a DenormalizedPage {
    rows.iter()
        .find(|r| r.page_id == page_id)
        .unwrap_or_else(|| panic!("no row for page {page_id}"))
}

fn category_set(row: &DenormalizedPage) -> HashSet<&str> {
    row.categories
        .as_deref()
        .map(|s| s.split(CATEGORY_SEPARATOR).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn page_with_children_is_flattened() {
    let (ctx, _dir) = seeded_db().await;
    let view = ctx.denormalized();

    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    let row = row_for(&rows, 1);
    assert_eq!(row.title, "A");
    assert_eq!(row.views, 5);
    assert_eq!(row.text, "hello");
    assert_eq!(row.project_name, None);
    assert_eq!(row.namespace_name, None);
    assert_eq!(category_set(row), HashSet::from(["X", "Y"]));
    assert_eq!(row.edit_count, 3);
    assert_eq!(row.view_count, 0);
    assert_eq!(row.comment_count, 1);
}

#[tokio::test]
async fn page_with_no_joined_rows_gets_nulls_and_zeros() {
    let (ctx, _dir) = seeded_db().await;
    let view = ctx.denormalized();

    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    let row = row_for(&rows, 2);
    assert_eq!(row.title, "B");
    assert_eq!(row.project_name, None);
    assert_eq!(row.namespace_name, None);
    // Missing categories are NULL, never an empty string
    assert_eq!(row.categories, None);
    // Missing children count as 0, never null
    assert_eq!(row.edit_count, 0);
    assert_eq!(row.view_count, 0);
    assert_eq!(row.comment_count, 0);
}

#[tokio::test]
async fn fan_out_does_not_inflate_counts() {
    let (ctx, _dir) = seeded_db().await;
    let view = ctx.denormalized();

    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    // Page 3 joins 3 categories x 2 edits x 4 views x 2 comments; raw row
    // counting would report 48 per relation.
    let row = row_for(&rows, 3);
    assert_eq!(category_set(row), HashSet::from(["X", "Y", "Z"]));
    assert_eq!(row.edit_count, 2);
    assert_eq!(row.view_count, 4);
    assert_eq!(row.comment_count, 2);
    assert_eq!(row.project_name.as_deref(), Some("Wiki"));
    assert_eq!(row.namespace_name.as_deref(), Some("Main"));
}

#[tokio::test]
async fn comma_in_category_name_survives_aggregation() {
    let (ctx, _dir) = seeded_db().await;
    exec(
        &ctx,
        "INSERT INTO category (id, name) VALUES (9, 'History, Ancient');
         INSERT INTO page_category (page_id, category_id) VALUES (2, 9);",
    )
    .await;

    let view = ctx.denormalized();
    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    // The name must come through verbatim, not split or reseparated
    let row = row_for(&rows, 2);
    assert_eq!(row.categories.as_deref(), Some("History, Ancient"));

    // And page 1's multi-category aggregation still uses the separator
    assert_eq!(category_set(row_for(&rows, 1)), HashSet::from(["X", "Y"]));
}

#[tokio::test]
async fn view_rows_have_unique_page_ids() {
    let (ctx, _dir) = seeded_db().await;
    let view = ctx.denormalized();

    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    let ids: HashSet<i32> = rows.iter().map(|r| r.page_id).collect();
    assert_eq!(ids.len(), rows.len());
    assert_eq!(rows.len(), 3); // one row per page
}

#[tokio::test]
async fn view_limit_bounds_the_row_count() {
    let (ctx, _dir) = seeded_db().await;
    let view = ctx.denormalized();

    view.ensure_view(2).await.unwrap();
    assert_eq!(view.fetch_all().await.unwrap().len(), 2);
    assert_eq!(view.count().await.unwrap(), 2);

    // Recreating with a bigger limit is idempotent and lifts the cap
    view.ensure_view(10_000).await.unwrap();
    view.ensure_view(10_000).await.unwrap();
    assert_eq!(view.count().await.unwrap(), 3);
}

#[tokio::test]
async fn pages_with_identical_content_stay_distinct() {
    let (ctx, _dir) = seeded_db().await;
    exec(
        &ctx,
        "INSERT INTO page (id, title, views, status, text) VALUES
             (10, 'Twin', 7, 'active', 'same text'),
             (11, 'Twin', 7, 'active', 'same text');",
    )
    .await;

    let view = ctx.denormalized();
    view.ensure_view(10_000).await.unwrap();
    let rows = view.fetch_all().await.unwrap();

    let twins: Vec<_> = rows.iter().filter(|r| r.title == "Twin").collect();
    assert_eq!(twins.len(), 2);
}

fn sorted_data_lines(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = content.lines().skip(1).collect();
    lines.sort_unstable();
    lines
}

async fn export_once(ctx: &DbContext, path: &Path, limit: u32) -> u64 {
    let view = ctx.denormalized();
    view.ensure_view(limit).await.unwrap();
    let rows = view.fetch_all().await.unwrap();
    write_csv(path, &rows, |_| {}).unwrap()
}

#[tokio::test]
async fn csv_export_writes_header_and_rows() {
    let (ctx, dir) = seeded_db().await;
    let path = dir.path().join("pages.csv");

    let written = export_once(&ctx, &path, 10_000).await;
    assert_eq!(written, 3);

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.count(), 3);

    // The bare page serializes nulls as empty fields and zero counts as 0
    assert!(content.contains("2,B,0,empty page,,,,0,0,0"));
}

#[tokio::test]
async fn csv_export_is_idempotent_and_overwrites() {
    let (ctx, dir) = seeded_db().await;
    let path = dir.path().join("pages.csv");

    export_once(&ctx, &path, 10_000).await;
    let first = std::fs::read_to_string(&path).unwrap();

    export_once(&ctx, &path, 10_000).await;
    let second = std::fs::read_to_string(&path).unwrap();

    // Byte-identical modulo row ordering, which the view doesn't guarantee
    assert_eq!(sorted_data_lines(&first), sorted_data_lines(&second));

    // Shrinking the limit overwrites, leaving no stale rows behind
    export_once(&ctx, &path, 1).await;
    let third = std::fs::read_to_string(&path).unwrap();
    assert_eq!(third.lines().count(), 2);
}

#[tokio::test]
async fn missing_output_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("pages.csv");

    let err = validate_output_path(&path).unwrap_err();
    assert_eq!(err.kind(), "io");
}

#[tokio::test]
async fn missing_tables_classify_as_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("empty.db"));
    let view = ctx.denormalized();

    // SQLite reports the missing page table either at view creation or at
    // first query, depending on version; both paths classify the same way.
    let err = match view.ensure_view(10).await {
        Err(e) => e,
        Ok(()) => view.fetch_all().await.unwrap_err(),
    };
    assert_eq!(classify_db_error(err).kind(), "schema");
}

#[tokio::test]
async fn page_repository_lookups() {
    let (ctx, _dir) = seeded_db().await;
    let pages = ctx.pages();

    let page = pages.get(3).await.unwrap().unwrap();
    assert_eq!(page.title, "C");
    assert_eq!(page.project_name.as_deref(), Some("Wiki"));
    assert_eq!(page.namespace_name.as_deref(), Some("Main"));

    // Title lookup is case-insensitive
    let by_title = pages.get_by_title("c").await.unwrap().unwrap();
    assert_eq!(by_title.id, 3);
    assert!(pages.get_by_title("nope").await.unwrap().is_none());

    let hits = pages.search("busy", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 3);

    let top = pages.top_viewed(2).await.unwrap();
    assert_eq!(top[0].id, 3); // 9 views beats 5
}

#[tokio::test]
async fn page_repository_maintenance() {
    let (ctx, _dir) = seeded_db().await;
    let pages = ctx.pages();

    assert!(pages.increment_views(1, 2).await.unwrap());
    assert_eq!(pages.get(1).await.unwrap().unwrap().views, 7);
    assert!(!pages.increment_views(999, 1).await.unwrap());

    assert!(pages.update_text(2, "filled in").await.unwrap());
    assert_eq!(pages.get(2).await.unwrap().unwrap().text, "filled in");

    assert!(pages.delete(2).await.unwrap());
    assert!(!pages.delete(2).await.unwrap());
    assert_eq!(pages.count().await.unwrap(), 2);
}

#[tokio::test]
async fn page_statistics_aggregate() {
    let (ctx, _dir) = seeded_db().await;
    let stats = ctx.pages().statistics().await.unwrap();

    assert_eq!(stats.total_pages, 3);
    assert_eq!(stats.total_views, 14);
    assert_eq!(stats.max_views, 9);
    assert_eq!(stats.min_views, 0);
    assert_eq!(stats.projects_count, 1);
    assert_eq!(stats.namespaces_count, 1);
    assert!((stats.avg_views - 14.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn category_repository_counts_distinct_pages() {
    let (ctx, _dir) = seeded_db().await;
    let categories = ctx.categories();

    assert_eq!(categories.count().await.unwrap(), 3);

    let list = categories.list(50, 0).await.unwrap();
    assert_eq!(list.len(), 3);
    let x = list.iter().find(|c| c.name == "X").unwrap();
    assert_eq!(x.page_count, 2); // pages 1 and 3
    let z = list.iter().find(|c| c.name == "Z").unwrap();
    assert_eq!(z.page_count, 1);

    let y = categories.get_by_name("y").await.unwrap().unwrap();
    assert_eq!(y.name, "Y");
    assert_eq!(y.page_count, 2);
    assert!(categories.get_by_name("missing").await.unwrap().is_none());
}
