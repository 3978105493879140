//! Core domain models for clean urls
//!
//! This crate contains:
//! - Resource references and types
//! - The format tag table
//! - Path segment encoding shared by building and matching
//! - Collaborator traits implemented by the host (resolver, observers)

pub mod chain;
pub mod error;
pub mod event;
pub mod format;
pub mod resolver;
pub mod resource;
pub mod segment;

pub use chain::IdentifierChain;
pub use error::{Error, Result};
pub use event::{EventKind, ResourceEvent, ResourceObserver};
pub use format::{FormatLayout, FormatTag, IdentifierForm};
pub use resolver::{IdentifierResolver, parents_of_type};
pub use resource::{ResourceRef, ResourceType};
pub use segment::{decode_segment, encode_segment, normalize_path};
