use anyhow::{Context, Result};
use cleanurl_config::{Configuration, ConfigurationStore, FileStore};

use crate::cli::ConfigCommands;

pub fn handle(cmd: ConfigCommands, store: &FileStore) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init(store, force),
        ConfigCommands::Show => show(store),
        ConfigCommands::Check => check(store),
    }
}

fn init(store: &FileStore, force: bool) -> Result<()> {
    if store.path().exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            store.path().display()
        );
    }
    store.save(&Configuration::default())?;
    println!("✓ Created {}", store.path().display());
    Ok(())
}

fn show(store: &FileStore) -> Result<()> {
    let config = super::load_config(store)?;
    println!("# {}", store.path().display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn check(store: &FileStore) -> Result<()> {
    let path = store.path();
    if !path.exists() {
        anyhow::bail!("{} does not exist (run 'cleanurl config init')", path.display());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = Configuration::from_toml_str(&content)?;

    println!("✓ {} is valid", path.display());
    println!("  Item formats: {}", join(config.item.allowed_formats.iter()));
    println!("  Media formats: {}", join(config.media.allowed_formats.iter()));
    println!("  No identifier: {:?}", config.identifier_undefined);
    Ok(())
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
