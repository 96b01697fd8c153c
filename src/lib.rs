//! Wiki page denormalization and CSV export.
//!
//! The library side of the `pagex` binary: configuration, domain models, the
//! Diesel repository layer, and the export service.

pub mod cli;
pub mod config;
pub mod models;
pub mod repository;
pub mod services;
