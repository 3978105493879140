//! Clean url configuration
//!
//! A [`Configuration`] is an immutable snapshot of the settings that drive path
//! building and path matching. It is always sanitized, normalized and
//! validated before it is handed out, so resolution never has to deal with an
//! inconsistent configuration.
//!
//! ```toml
//! main_path = "collections/"
//! identifier_prefix = "doc:"
//! identifier_undefined = "default"
//!
//! [item_set]
//! generic = "collection/"
//!
//! [item]
//! generic = "item/"
//! default_format = "generic_item"
//! allowed_formats = ["generic_item", "item_set_item"]
//! item_set_undefined = "parent_id"
//!
//! [media]
//! generic = "media/"
//! default_format = "generic_media"
//! allowed_formats = ["generic_media"]
//! ```

mod error;
mod store;

pub use error::{ConfigError, Result};
pub use store::{ConfigurationStore, FileStore};

use cleanurl_core::{FormatTag, IdentifierForm, ResourceType};
use serde::{Deserialize, Serialize};

/// What to build when a resource (or a required ancestor) has no identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    /// `controller/id`, the host's own route.
    #[default]
    Default,
    /// `generic/id`, without the main path.
    Generic,
    /// `main/generic/id`.
    MainGeneric,
    /// Fail with `ResourceHasNoIdentifier`.
    Exception,
}

/// What to embed when an ancestor has no identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AncestorPolicy {
    /// Give up on the clean url and apply the [`UndefinedPolicy`].
    #[default]
    Default,
    /// Embed the ancestor's numeric id instead.
    ParentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSetSettings {
    #[serde(default = "default_item_set_generic")]
    pub generic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSettings {
    #[serde(default = "default_item_generic")]
    pub generic: String,

    #[serde(default = "default_item_format")]
    pub default_format: FormatTag,

    #[serde(default)]
    pub allowed_formats: Vec<FormatTag>,

    #[serde(default)]
    pub item_set_undefined: AncestorPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSettings {
    #[serde(default = "default_media_generic")]
    pub generic: String,

    #[serde(default = "default_media_format")]
    pub default_format: FormatTag,

    #[serde(default)]
    pub allowed_formats: Vec<FormatTag>,

    #[serde(default)]
    pub item_undefined: AncestorPolicy,

    #[serde(default)]
    pub item_set_undefined: AncestorPolicy,
}

/// Settings snapshot shared by the path builder and the path matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Path prepended to every clean url, `""` or ending with `/`.
    #[serde(default)]
    pub main_path: String,

    /// Prefix of identifiers rendered in their full form.
    #[serde(default)]
    pub identifier_prefix: String,

    #[serde(default)]
    pub identifier_undefined: UndefinedPolicy,

    #[serde(default)]
    pub item_set: ItemSetSettings,

    #[serde(default)]
    pub item: ItemSettings,

    #[serde(default)]
    pub media: MediaSettings,
}

impl Default for ItemSetSettings {
    fn default() -> Self {
        Self {
            generic: default_item_set_generic(),
        }
    }
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            generic: default_item_generic(),
            default_format: default_item_format(),
            allowed_formats: vec![default_item_format()],
            item_set_undefined: AncestorPolicy::Default,
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            generic: default_media_generic(),
            default_format: default_media_format(),
            allowed_formats: vec![default_media_format()],
            item_undefined: AncestorPolicy::Default,
            item_set_undefined: AncestorPolicy::Default,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            main_path: String::new(),
            identifier_prefix: String::new(),
            identifier_undefined: UndefinedPolicy::Default,
            item_set: ItemSetSettings::default(),
            item: ItemSettings::default(),
            media: MediaSettings::default(),
        }
    }
}

fn default_item_set_generic() -> String {
    "collection/".to_string()
}

fn default_item_generic() -> String {
    "item/".to_string()
}

fn default_media_generic() -> String {
    "media/".to_string()
}

fn default_item_format() -> FormatTag {
    FormatTag::GenericItem
}

fn default_media_format() -> FormatTag {
    FormatTag::GenericMedia
}

const ITEM_SET_ALLOWED: &[FormatTag] = &[FormatTag::GenericItemSet];

/// Characters that would break a path or its query once composed into a url.
const RESERVED_PATH_CHARS: &[char] = &['%', '?', '#'];

impl Configuration {
    /// Parse, then sanitize, normalize and validate.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Configuration = toml::from_str(content)?;
        config.prepare()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sanitize, normalize and validate a configuration before it is used.
    pub fn prepare(self) -> Result<Self> {
        let config = self.sanitized().normalized();
        config.validate()?;
        Ok(config)
    }

    /// Trim the identifier prefix; reduce the main path and the generic
    /// prefixes to either `""` or `"segment/"`.
    pub fn sanitized(mut self) -> Self {
        self.identifier_prefix = self.identifier_prefix.trim().to_string();
        self.main_path = sanitize_path(&self.main_path);
        self.item_set.generic = sanitize_path(&self.item_set.generic);
        self.item.generic = sanitize_path(&self.item.generic);
        self.media.generic = sanitize_path(&self.media.generic);
        self
    }

    /// Make sure the default formats are allowed, without duplicates.
    pub fn normalized(mut self) -> Self {
        normalize_allowed(&mut self.item.allowed_formats, self.item.default_format);
        normalize_allowed(&mut self.media.allowed_formats, self.media.default_format);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for resource_type in [ResourceType::Item, ResourceType::Media] {
            let default = self.default_format(resource_type);
            if default.resource_type() != resource_type {
                return Err(ConfigError::Validation(format!(
                    "default format `{default}` does not apply to {}",
                    resource_type.api_name()
                )));
            }
            let allowed = self.allowed_formats(resource_type);
            if let Some(tag) = allowed.iter().find(|tag| tag.resource_type() != resource_type) {
                return Err(ConfigError::Validation(format!(
                    "format `{tag}` is not a format for {}",
                    resource_type.api_name()
                )));
            }
            if !allowed.contains(&default) {
                return Err(ConfigError::Validation(format!(
                    "default format `{default}` must be allowed for {}",
                    resource_type.api_name()
                )));
            }
        }

        let paths = [
            ("main_path", &self.main_path),
            ("item_set.generic", &self.item_set.generic),
            ("item.generic", &self.item.generic),
            ("media.generic", &self.media.generic),
        ];
        for (name, value) in paths {
            if value.contains(RESERVED_PATH_CHARS) {
                return Err(ConfigError::Validation(format!(
                    "`{name}` contains a reserved character: {value}"
                )));
            }
        }

        if self.identifier_prefix.contains('/') || self.identifier_prefix.contains(RESERVED_PATH_CHARS) {
            return Err(ConfigError::Validation(format!(
                "identifier prefix contains a reserved character: {}",
                self.identifier_prefix
            )));
        }

        let generics: Vec<&str> = ResourceType::ALL
            .iter()
            .map(|t| self.generic(*t))
            .filter(|g| !g.is_empty())
            .collect();
        for (i, generic) in generics.iter().enumerate() {
            if generics[i + 1..].contains(generic) {
                return Err(ConfigError::Validation(format!(
                    "generic prefix `{generic}` is used by more than one resource type"
                )));
            }
        }

        Ok(())
    }

    /// Generic prefix of a resource type, `""` or ending with `/`.
    pub fn generic(&self, resource_type: ResourceType) -> &str {
        match resource_type {
            ResourceType::ItemSet => &self.item_set.generic,
            ResourceType::Item => &self.item.generic,
            ResourceType::Media => &self.media.generic,
        }
    }

    pub fn default_format(&self, resource_type: ResourceType) -> FormatTag {
        match resource_type {
            ResourceType::ItemSet => FormatTag::GenericItemSet,
            ResourceType::Item => self.item.default_format,
            ResourceType::Media => self.media.default_format,
        }
    }

    pub fn allowed_formats(&self, resource_type: ResourceType) -> &[FormatTag] {
        match resource_type {
            ResourceType::ItemSet => ITEM_SET_ALLOWED,
            ResourceType::Item => &self.item.allowed_formats,
            ResourceType::Media => &self.media.allowed_formats,
        }
    }

    pub fn is_allowed(&self, format: FormatTag) -> bool {
        self.allowed_formats(format.resource_type()).contains(&format)
    }

    /// Policy applied when the item set embedded in a url of `resource_type`
    /// has no identifier.
    pub fn item_set_undefined(&self, resource_type: ResourceType) -> AncestorPolicy {
        match resource_type {
            ResourceType::ItemSet => AncestorPolicy::Default,
            ResourceType::Item => self.item.item_set_undefined,
            ResourceType::Media => self.media.item_set_undefined,
        }
    }

    /// Whether a url may embed an item set by its numeric id.
    pub fn item_set_ids_in_paths(&self) -> bool {
        self.item.item_set_undefined == AncestorPolicy::ParentId
            || self.media.item_set_undefined == AncestorPolicy::ParentId
    }

    /// Render a bare identifier in the requested form.
    pub fn render_identifier(&self, identifier: &str, form: IdentifierForm) -> String {
        match form {
            IdentifierForm::Short => identifier.to_string(),
            IdentifierForm::Full => format!("{}{}", self.identifier_prefix, identifier),
        }
    }

    /// Inverse of [`render_identifier`](Self::render_identifier): `None` when
    /// a full-form segment does not carry the prefix.
    pub fn bare_identifier<'a>(&self, segment: &'a str, form: IdentifierForm) -> Option<&'a str> {
        let bare = match form {
            IdentifierForm::Short => segment,
            IdentifierForm::Full => segment.strip_prefix(self.identifier_prefix.as_str())?,
        };
        (!bare.is_empty()).then_some(bare)
    }
}

fn sanitize_path(value: &str) -> String {
    let value = value.trim().trim_matches(|c| c == ' ' || c == '/').trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{value}/")
    }
}

fn normalize_allowed(allowed: &mut Vec<FormatTag>, default: FormatTag) {
    allowed.push(default);
    let mut seen = Vec::with_capacity(allowed.len());
    allowed.retain(|tag| {
        if seen.contains(tag) {
            false
        } else {
            seen.push(*tag);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Configuration::default();
        assert_eq!(config.main_path, "");
        assert_eq!(config.generic(ResourceType::Item), "item/");
        assert_eq!(config.default_format(ResourceType::Media), FormatTag::GenericMedia);
        assert_eq!(config.identifier_undefined, UndefinedPolicy::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sanitize_paths() {
        let config = Configuration {
            main_path: " /archives// ".to_string(),
            identifier_prefix: "  doc: ".to_string(),
            item_set: ItemSetSettings {
                generic: "/".to_string(),
            },
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.main_path, "archives/");
        assert_eq!(config.identifier_prefix, "doc:");
        assert_eq!(config.item_set.generic, "");
        assert_eq!(config.item.generic, "item/");
    }

    #[test]
    fn test_default_format_added_to_allowed() {
        let mut config = Configuration::default();
        config.item.default_format = FormatTag::ItemSetItem;
        config.item.allowed_formats = vec![FormatTag::GenericItem, FormatTag::GenericItem];

        let config = config.prepare().unwrap();
        assert_eq!(
            config.item.allowed_formats,
            vec![FormatTag::GenericItem, FormatTag::ItemSetItem]
        );
        assert!(config.is_allowed(FormatTag::ItemSetItem));
        assert!(!config.is_allowed(FormatTag::GenericItemFull));
    }

    #[test]
    fn test_rejects_format_of_wrong_type() {
        let mut config = Configuration::default();
        config.media.allowed_formats.push(FormatTag::GenericItem);

        let err = config.prepare().unwrap_err();
        assert!(err.to_string().contains("generic_item"));
    }

    #[test]
    fn test_rejects_default_of_wrong_type() {
        let mut config = Configuration::default();
        config.item.default_format = FormatTag::GenericMedia;
        assert!(config.prepare().is_err());
    }

    #[test]
    fn test_rejects_reserved_characters() {
        let config = Configuration {
            main_path: "a%20b".to_string(),
            ..Default::default()
        };
        assert!(config.prepare().is_err());

        let config = Configuration {
            identifier_prefix: "ark:/".to_string(),
            ..Default::default()
        };
        assert!(config.prepare().is_err());
    }

    #[test]
    fn test_rejects_shared_generic() {
        let mut config = Configuration::default();
        config.media.generic = "item".to_string();
        assert!(config.prepare().is_err());

        // Several empty generics do not collide.
        let mut config = Configuration::default();
        config.item_set.generic = String::new();
        config.item.generic = String::new();
        assert!(config.prepare().is_ok());
    }

    #[test]
    fn test_item_set_always_generic() {
        let config = Configuration::default();
        assert_eq!(config.allowed_formats(ResourceType::ItemSet), &[FormatTag::GenericItemSet]);
        assert!(config.is_allowed(FormatTag::GenericItemSet));
    }

    #[test]
    fn test_identifier_forms() {
        let config = Configuration {
            identifier_prefix: "doc:".to_string(),
            ..Default::default()
        };
        assert_eq!(config.render_identifier("poem-1", IdentifierForm::Full), "doc:poem-1");
        assert_eq!(config.render_identifier("poem-1", IdentifierForm::Short), "poem-1");
        assert_eq!(config.bare_identifier("doc:poem-1", IdentifierForm::Full), Some("poem-1"));
        assert_eq!(config.bare_identifier("poem-1", IdentifierForm::Full), None);
        assert_eq!(config.bare_identifier("doc:", IdentifierForm::Full), None);
        assert_eq!(config.bare_identifier("poem-1", IdentifierForm::Short), Some("poem-1"));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Configuration::default();
        config.main_path = "archives/".to_string();
        config.media.item_set_undefined = AncestorPolicy::ParentId;
        config.identifier_undefined = UndefinedPolicy::MainGeneric;

        let toml_str = config.to_toml_string().unwrap();
        let parsed = Configuration::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
        assert!(parsed.item_set_ids_in_paths());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Configuration::from_toml_str(
            r#"
            main_path = "/archives"
            identifier_undefined = "exception"

            [item]
            default_format = "item_set_item_full"
            "#,
        )
        .unwrap();

        assert_eq!(config.main_path, "archives/");
        assert_eq!(config.identifier_undefined, UndefinedPolicy::Exception);
        assert_eq!(config.item.generic, "item/");
        assert_eq!(config.item.allowed_formats, vec![FormatTag::ItemSetItemFull]);
        assert_eq!(config.media.allowed_formats, vec![FormatTag::GenericMedia]);
    }
}
