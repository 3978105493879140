//! Configuration persistence

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{ConfigError, Configuration, Result};

/// Where the host keeps the clean url settings.
pub trait ConfigurationStore {
    fn load(&self) -> Result<Configuration>;

    /// Validate and persist. An inconsistent configuration is rejected here
    /// and never reaches path resolution.
    fn save(&self, config: &Configuration) -> Result<Configuration>;
}

/// TOML file store (`cleanurl.toml`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory.
    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "cleanurl", "cleanurl") {
            dirs.config_dir().join("cleanurl.toml")
        } else {
            PathBuf::from("~/.cleanurl/cleanurl.toml")
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigurationStore for FileStore {
    /// Load config from the file, or create a default one if not found.
    fn load(&self) -> Result<Configuration> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .map_err(|err| ConfigError::Io(self.path.clone(), err))?;
            Configuration::from_toml_str(&content)
        } else {
            self.save(&Configuration::default())
        }
    }

    fn save(&self, config: &Configuration) -> Result<Configuration> {
        let config = config.clone().prepare()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| ConfigError::Io(parent.to_path_buf(), err))?;
        }
        let content = config.to_toml_string()?;
        std::fs::write(&self.path, content).map_err(|err| ConfigError::Io(self.path.clone(), err))?;
        info!("Saved clean url settings to {}", self.path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UndefinedPolicy;
    use cleanurl_core::FormatTag;

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("cleanurl.toml"));

        let config = store.load().unwrap();
        assert_eq!(config, Configuration::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cleanurl.toml"));

        let mut config = Configuration::default();
        config.main_path = "/archives/".to_string();
        config.identifier_undefined = UndefinedPolicy::Generic;
        config.media.default_format = FormatTag::GenericItemMedia;

        let saved = store.save(&config).unwrap();
        assert_eq!(saved.main_path, "archives/");
        assert!(saved.media.allowed_formats.contains(&FormatTag::GenericItemMedia));

        let loaded = store.load().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_save_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cleanurl.toml"));

        let mut config = Configuration::default();
        config.item.allowed_formats.push(FormatTag::ItemSetMedia);

        assert!(matches!(store.save(&config), Err(ConfigError::Validation(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleanurl.toml");
        std::fs::write(&path, "[item]\ndefault_format = \"nope\"\n").unwrap();

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
