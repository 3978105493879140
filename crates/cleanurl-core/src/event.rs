//! Resource change notifications

use serde::{Deserialize, Serialize};

use crate::{IdentifierResolver, ResourceRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

/// Emitted by the host after a resource was saved or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEvent {
    pub kind: EventKind,
    pub resource: ResourceRef,
}

impl ResourceEvent {
    pub fn new(kind: EventKind, resource: ResourceRef) -> Self {
        Self { kind, resource }
    }
}

/// Receives resource events from the host integration layer.
///
/// The resolver passed along reflects the state after the change.
pub trait ResourceObserver: Send + Sync {
    fn on_resource_event(&self, event: &ResourceEvent, resolver: &dyn IdentifierResolver);
}
