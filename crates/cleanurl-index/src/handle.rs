//! Copy-on-write publication of the item set index.
//!
//! Uses `arc-swap`: every request loads the current snapshot lock-free and
//! keeps it for the whole match, while a rebuild swaps in a new snapshot.
//! In-flight matches never see a half-built index.

use std::sync::Arc;

use arc_swap::ArcSwap;
use cleanurl_core::{IdentifierResolver, ResourceType};
use tracing::{info, warn};

use crate::{ItemSetIdentifierIndex, Result};

#[derive(Debug)]
pub struct IndexHandle {
    current: ArcSwap<ItemSetIdentifierIndex>,
}

impl IndexHandle {
    pub fn new(index: ItemSetIdentifierIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// Build the initial index from the resolver, or start empty when the
    /// identifiers cannot be listed yet (during install, for example).
    pub fn from_resolver<R: IdentifierResolver + ?Sized>(resolver: &R) -> Self {
        let handle = Self::default();
        if let Err(err) = handle.rebuild_from(resolver) {
            warn!("Item set index left empty: {err}");
        }
        handle
    }

    /// Current snapshot.
    #[inline]
    pub fn load(&self) -> Arc<ItemSetIdentifierIndex> {
        self.current.load_full()
    }

    /// Replace the snapshot atomically. Readers holding the previous one keep it.
    pub fn publish(&self, index: ItemSetIdentifierIndex) {
        info!("Published item set index with {} identifiers", index.len());
        self.current.store(Arc::new(index));
    }

    /// Rebuild from the resolver and publish. On failure the current
    /// snapshot stays in place.
    pub fn rebuild_from<R: IdentifierResolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<Arc<ItemSetIdentifierIndex>> {
        let identifiers = resolver.identifiers_of_type(ResourceType::ItemSet)?;
        let index = ItemSetIdentifierIndex::rebuild(identifiers)?;
        self.publish(index);
        Ok(self.load())
    }
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::new(ItemSetIdentifierIndex::empty())
    }
}
