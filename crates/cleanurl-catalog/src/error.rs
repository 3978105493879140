//! Error types for cleanurl-catalog

use std::path::PathBuf;

use cleanurl_core::ResourceRef;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Catalog parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate resource: {0}")]
    DuplicateResource(ResourceRef),

    #[error("{child} refers to missing {parent}")]
    MissingParent { child: ResourceRef, parent: ResourceRef },
}
