//! Host-facing collaborator interfaces

use crate::{IdentifierChain, ResourceRef, ResourceType, Result};

/// Access to the host's resources, implemented by the integration layer.
///
/// Identifiers exchanged through this trait are always bare values, without
/// the configured identifier prefix.
pub trait IdentifierResolver {
    /// The configured identifier of a resource, if it has one.
    fn identifier_of(&self, resource: &ResourceRef) -> Option<String>;

    /// Direct parents: the item sets of an item, in insertion order, or the
    /// item of a media. Item sets have none.
    fn parents_of(&self, resource: &ResourceRef) -> Vec<ResourceRef>;

    /// Find the resource addressed by an identifier chain.
    fn lookup_by_identifier_chain(
        &self,
        resource_type: ResourceType,
        chain: &IdentifierChain,
    ) -> Option<ResourceRef>;

    /// Find a resource by its numeric id.
    fn find_by_id(&self, resource_type: ResourceType, id: u64) -> Option<ResourceRef>;

    /// Every identifier of a resource type, used to rebuild the item set index.
    fn identifiers_of_type(&self, resource_type: ResourceType) -> Result<Vec<String>>;
}

/// Parents of `resource` restricted to one type.
pub fn parents_of_type<R: IdentifierResolver + ?Sized>(
    resolver: &R,
    resource: &ResourceRef,
    resource_type: ResourceType,
) -> Vec<ResourceRef> {
    resolver
        .parents_of(resource)
        .into_iter()
        .filter(|parent| parent.resource_type == resource_type)
        .collect()
}
