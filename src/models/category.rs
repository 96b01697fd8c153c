//! Category domain model.

use serde::Serialize;

use super::PageStatus;

/// A category, with the number of pages linked to it via `page_category`.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub text_content: String,
    pub status: PageStatus,
    /// Distinct pages carrying this category.
    pub page_count: i64,
}
