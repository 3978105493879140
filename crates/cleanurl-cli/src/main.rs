mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cleanurl_config::FileStore;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let store = match cli.config {
        Some(path) => FileStore::new(path),
        None => FileStore::at_default_location(),
    };

    match cli.command {
        cli::Commands::Config(cmd) => commands::config::handle(cmd, &store),
        cli::Commands::Build {
            catalog,
            resource_type,
            id,
            format,
            base_path,
            server_url,
        } => commands::build::handle(
            &store,
            &catalog,
            &resource_type,
            id,
            format.as_deref(),
            base_path,
            server_url,
        ),
        cli::Commands::Match { path, catalog } => {
            commands::matching::handle(&store, &path, catalog.as_deref())
        }
        cli::Commands::Route { catalog, path } => commands::route::handle(&store, &catalog, &path),
        cli::Commands::Index { catalog } => commands::index::handle(&catalog),
    }
}
