use std::path::Path;

use anyhow::Result;
use cleanurl_index::IndexHandle;

pub fn handle(catalog: &Path) -> Result<()> {
    let catalog = super::load_catalog(catalog)?;
    let index = IndexHandle::from_resolver(&catalog).load();

    if index.is_empty() {
        println!("No item set identifiers.");
        return Ok(());
    }

    println!("Item set identifiers ({}), longest first:", index.len());
    for identifier in index.identifiers() {
        println!("  {identifier}");
    }
    println!("Alternation: {}", index.alternation());
    Ok(())
}
