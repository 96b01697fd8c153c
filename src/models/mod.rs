//! Domain models.

mod category;
mod denormalized;
mod page;

pub use category::Category;
pub use denormalized::DenormalizedPage;
pub use page::{Page, PageStats, PageStatus};
