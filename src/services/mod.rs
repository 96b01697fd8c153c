//! Service layer.

pub mod export;
