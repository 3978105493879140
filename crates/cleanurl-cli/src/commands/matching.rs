use std::path::Path;

use anyhow::Result;
use cleanurl_catalog::Catalog;
use cleanurl_config::FileStore;

pub fn handle(store: &FileStore, path: &str, catalog: Option<&Path>) -> Result<()> {
    let config = super::load_config(store)?;
    // Without a catalog the item set index is empty.
    let catalog = match catalog {
        Some(catalog) => super::load_catalog(catalog)?,
        None => Catalog::new(),
    };

    match super::router(config, &catalog).match_path(path) {
        Some(matched) => println!("{}", serde_json::to_string_pretty(&matched)?),
        None => println!("No match: {path}"),
    }
    Ok(())
}
