pub mod build;
pub mod config;
pub mod index;
pub mod matching;
pub mod route;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cleanurl_catalog::Catalog;
use cleanurl_config::{Configuration, ConfigurationStore, FileStore};
use cleanurl_engine::CleanRouter;
use cleanurl_index::IndexHandle;
use tracing::debug;

/// Load the settings, creating the default file on first use.
pub fn load_config(store: &FileStore) -> Result<Configuration> {
    debug!("Loading settings from {}", store.path().display());
    store
        .load()
        .with_context(|| format!("Failed to load settings from {}", store.path().display()))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    debug!("Loading catalog {}", path.display());
    Catalog::from_path(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Router over a fresh index built from `catalog`.
pub fn router(config: Configuration, catalog: &Catalog) -> CleanRouter {
    let index = IndexHandle::from_resolver(catalog);
    debug!("Item set index holds {} identifiers", index.load().len());
    CleanRouter::new(Arc::new(config), Arc::new(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanurl_core::ResourceRef;

    #[test]
    fn test_router_from_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{ "item_sets": [{ "id": 1, "identifier": "ark:1" }],
                 "items": [{ "id": 2, "identifier": "poem", "item_sets": [1] }] }"#,
        )
        .unwrap();
        let settings = dir.path().join("cleanurl.toml");
        std::fs::write(&settings, "[item]\nallowed_formats = [\"item_set_item\"]\n").unwrap();
        let store = FileStore::new(&settings);

        let config = load_config(&store).unwrap();
        let catalog = load_catalog(&path).unwrap();
        let params = router(config, &catalog).route("ark%3a1/poem", &catalog).unwrap();
        assert_eq!(params.resource, ResourceRef::item(2));

        assert!(load_catalog(&dir.path().join("missing.json")).is_err());
    }
}
