use thiserror::Error;

use crate::ResourceType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The \"{}\" #{id} has no normalized identifier", .resource_type.controller_name())]
    ResourceHasNoIdentifier {
        resource_type: ResourceType,
        id: u64,
    },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
