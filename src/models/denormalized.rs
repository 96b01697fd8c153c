//! The denormalized export row.

use serde::Serialize;

/// One row of the `denormalized_page_data` view: one page flattened with its
/// project/namespace names, its distinct category names joined with `"; "`,
/// and distinct-counted child relations.
///
/// `categories` is `None` for a page with no category associations (never an
/// empty string); the three counts are `0` for a page with no children (never
/// null).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenormalizedPage {
    pub page_id: i32,
    pub title: String,
    pub views: i32,
    pub text: String,
    pub project_name: Option<String>,
    pub namespace_name: Option<String>,
    pub categories: Option<String>,
    pub edit_count: i64,
    pub view_count: i64,
    pub comment_count: i64,
}
