//! In-memory resource catalog
//!
//! This crate provides:
//! - An `IdentifierResolver` over item sets, items and media loaded from JSON
//! - Resource events dispatched to observers on every change

pub mod catalog;
pub mod error;
pub mod models;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use models::{CatalogData, ItemRecord, ItemSetRecord, MediaRecord};
