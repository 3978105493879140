use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cleanurl")]
#[command(about = "Clean urls for item sets, items and media", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (default: platform config dir)
    #[arg(long, global = true, env = "CLEANURL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage clean url settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Build the clean url of a resource
    Build {
        /// Catalog of resources (JSON)
        #[arg(long)]
        catalog: PathBuf,

        /// Resource type (item-set, item, media)
        resource_type: String,

        /// Resource id
        id: u64,

        /// Format tag (default from settings)
        #[arg(long)]
        format: Option<String>,

        /// Base path of the site, e.g. /s/my-site
        #[arg(long, default_value = "")]
        base_path: String,

        /// Scheme and host, for absolute urls
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Match a path against the clean url patterns
    Match {
        /// Request path
        path: String,

        /// Catalog used to build the item set index
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Match and resolve a path to the route the host would dispatch
    Route {
        /// Catalog of resources (JSON)
        #[arg(long)]
        catalog: PathBuf,

        /// Request path
        path: String,
    },

    /// Show the item set identifier index
    Index {
        /// Catalog of resources (JSON)
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default settings
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings
    Show,

    /// Validate the settings file
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "cleanurl",
            "build",
            "--catalog",
            "catalog.json",
            "item",
            "5",
            "--format",
            "generic_item",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                resource_type,
                id,
                format,
                base_path,
                ..
            } => {
                assert_eq!(resource_type, "item");
                assert_eq!(id, 5);
                assert_eq!(format.as_deref(), Some("generic_item"));
                assert_eq!(base_path, "");
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["cleanurl", "config", "show", "--config", "/tmp/cleanurl.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cleanurl.toml")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }
}
