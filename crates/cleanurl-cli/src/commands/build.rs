use std::path::Path;

use anyhow::Result;
use cleanurl_config::FileStore;
use cleanurl_core::{FormatTag, ResourceRef, ResourceType};
use cleanurl_engine::{BuildOptions, PathBuilder};

pub fn handle(
    store: &FileStore,
    catalog: &Path,
    resource_type: &str,
    id: u64,
    format: Option<&str>,
    base_path: String,
    server_url: Option<String>,
) -> Result<()> {
    let config = super::load_config(store)?;
    let catalog = super::load_catalog(catalog)?;

    let resource_type: ResourceType = resource_type.parse()?;
    let format = format.map(str::parse::<FormatTag>).transpose()?;

    let mut options = BuildOptions::default().with_base_path(base_path);
    if let Some(server_url) = server_url {
        options = options.with_server_url(server_url);
    }

    let resource = ResourceRef::new(resource_type, id);
    let path = PathBuilder::new(&config, &catalog).build_with(&resource, format, &options)?;
    println!("{path}");
    Ok(())
}
