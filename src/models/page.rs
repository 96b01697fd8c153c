//! Page domain model and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Editorial status of a page or category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Minimal placeholder content.
    Stub,
    /// Regular published content.
    Active,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Stub => "stub",
            PageStatus::Active => "active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stub" => Some(PageStatus::Stub),
            "active" => Some(PageStatus::Active),
            _ => None,
        }
    }
}

/// A wiki page with optional joined project/namespace names.
///
/// The names are populated by lookups that left-join the `project` and
/// `namespace` tables; they stay `None` when the foreign key is null or the
/// referenced row is missing.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub id: i32,
    pub title: String,
    pub project_id: Option<i32>,
    pub views: i32,
    pub status: PageStatus,
    pub namespace_id: Option<i32>,
    pub text: String,
    pub project_name: Option<String>,
    pub namespace_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregate statistics over the page table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageStats {
    pub total_pages: i64,
    pub total_views: i64,
    pub avg_views: f64,
    pub max_views: i64,
    pub min_views: i64,
    pub projects_count: i64,
    pub namespaces_count: i64,
}
