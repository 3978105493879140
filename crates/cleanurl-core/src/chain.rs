//! Identifier chains: the identifiers a clean url carries for a resource.

use serde::{Deserialize, Serialize};

/// Bare identifiers of a resource and of the ancestors its url embeds.
///
/// Ancestor segments may hold the ancestor's numeric id instead of an
/// identifier when a `parent_id` policy applied at build time; resolvers
/// accept either.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentifierChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub own: String,
}

impl IdentifierChain {
    pub fn new(own: impl Into<String>) -> Self {
        Self {
            own: own.into(),
            ..Default::default()
        }
    }

    pub fn with_item_set(mut self, item_set: impl Into<String>) -> Self {
        self.item_set = Some(item_set.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Segments in path order: item set, item, own.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.item_set
            .as_deref()
            .into_iter()
            .chain(self.item.as_deref())
            .chain(std::iter::once(self.own.as_str()))
    }
}
