//! Keeps the published index in step with item set changes.

use std::sync::Arc;

use cleanurl_core::{IdentifierResolver, ResourceEvent, ResourceObserver, ResourceType};
use tracing::{debug, warn};

use crate::{IndexHandle, ItemSetIdentifierIndex, Result};

/// Rebuilds the item set index whenever an item set is created, updated or
/// deleted. A failed rebuild is logged and the stale index kept.
#[derive(Debug, Clone)]
pub struct IndexMaintainer {
    handle: Arc<IndexHandle>,
}

impl IndexMaintainer {
    pub fn new(handle: Arc<IndexHandle>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &Arc<IndexHandle> {
        &self.handle
    }

    /// Full rebuild, for install and configuration save.
    pub fn refresh(&self, resolver: &dyn IdentifierResolver) -> Result<Arc<ItemSetIdentifierIndex>> {
        self.handle.rebuild_from(resolver)
    }
}

impl ResourceObserver for IndexMaintainer {
    fn on_resource_event(&self, event: &ResourceEvent, resolver: &dyn IdentifierResolver) {
        if event.resource.resource_type != ResourceType::ItemSet {
            return;
        }
        debug!("Item set {} {:?}, rebuilding index", event.resource.id, event.kind);
        if let Err(err) = self.refresh(resolver) {
            warn!("Keeping previous item set index: {err}");
        }
    }
}
