//! Resource domain model

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kinds of resources that get a clean url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    ItemSet,
    Item,
    Media,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::ItemSet, ResourceType::Item, ResourceType::Media];

    /// Name of the host controller, used by the default route (`item/12`).
    pub fn controller_name(self) -> &'static str {
        match self {
            ResourceType::ItemSet => "item-set",
            ResourceType::Item => "item",
            ResourceType::Media => "media",
        }
    }

    /// Name of the api resource (`item_sets`, `items`, `media`).
    pub fn api_name(self) -> &'static str {
        match self {
            ResourceType::ItemSet => "item_sets",
            ResourceType::Item => "items",
            ResourceType::Media => "media",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.controller_name())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    /// Accepts api names, json-ld types and controller names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "item_sets" | "item_set" | "o:ItemSet" | "item-set" => Ok(ResourceType::ItemSet),
            "items" | "o:Item" | "item" => Ok(ResourceType::Item),
            "media" | "medias" | "o:Media" => Ok(ResourceType::Media),
            other => Err(Error::UnknownResourceType(other.to_string())),
        }
    }
}

/// A transient reference to a host resource.
///
/// Identity is `(resource_type, id)`: the identifier is carried along when the
/// host already knows it, but two refs to the same resource compare equal
/// whether or not it is filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: ResourceType,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl ResourceRef {
    pub fn new(resource_type: ResourceType, id: u64) -> Self {
        Self {
            resource_type,
            id,
            identifier: None,
        }
    }

    pub fn item_set(id: u64) -> Self {
        Self::new(ResourceType::ItemSet, id)
    }

    pub fn item(id: u64) -> Self {
        Self::new(ResourceType::Item, id)
    }

    pub fn media(id: u64) -> Self {
        Self::new(ResourceType::Media, id)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

impl PartialEq for ResourceRef {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type && self.id == other.id
    }
}

impl Eq for ResourceRef {}

impl Hash for ResourceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}
