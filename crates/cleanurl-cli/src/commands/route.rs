use std::path::Path;

use anyhow::Result;
use cleanurl_config::FileStore;

pub fn handle(store: &FileStore, catalog: &Path, path: &str) -> Result<()> {
    let config = super::load_config(store)?;
    let catalog = super::load_catalog(catalog)?;

    match super::router(config, &catalog).route(path, &catalog) {
        Some(params) => println!("{}", serde_json::to_string_pretty(&params)?),
        None => println!("No route: {path} (host default routing)"),
    }
    Ok(())
}
