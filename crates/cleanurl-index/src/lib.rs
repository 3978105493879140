//! Item set identifier index
//!
//! This crate provides:
//! - The longest-first alternation over item set identifiers
//! - Lock-free publication of index snapshots
//! - An observer that rebuilds the index on item set changes

pub mod error;
pub mod handle;
pub mod index;
pub mod maintainer;

pub use error::{IndexError, Result};
pub use handle::IndexHandle;
pub use index::ItemSetIdentifierIndex;
pub use maintainer::IndexMaintainer;
