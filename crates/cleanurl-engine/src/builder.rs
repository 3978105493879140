//! Path builder - resource to clean url.
//!
//! The path of a resource is composed from the format table:
//!
//! ```text
//! generic_item               main/ item/ poem-1
//! item_set_item_full         main/ poems/ doc:poem-1
//! generic_item_media         main/ media/ poem-1/ scan-1
//! item_set_item_media_full   main/ poems/ poem-1/ doc:scan-1
//! ```
//!
//! Whenever the resource, or an ancestor the format embeds, has no
//! identifier, the configured no-identifier policy decides the outcome.

use cleanurl_config::{AncestorPolicy, Configuration, UndefinedPolicy};
use cleanurl_core::{
    Error, FormatTag, IdentifierForm, IdentifierResolver, ResourceRef, ResourceType, Result,
    encode_segment, parents_of_type,
};
use tracing::debug;

/// Where the built path is anchored.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Scheme and host for absolute urls, e.g. `https://example.org`.
    pub server_url: Option<String>,
    /// Host base path, e.g. `/s/my-site`.
    pub base_path: String,
    pub with_main_path: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            server_url: None,
            base_path: String::new(),
            with_main_path: true,
        }
    }
}

impl BuildOptions {
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Some(server_url.into());
        self
    }

    pub fn without_main_path(mut self) -> Self {
        self.with_main_path = false;
        self
    }
}

pub struct PathBuilder<'a> {
    config: &'a Configuration,
    resolver: &'a dyn IdentifierResolver,
}

impl<'a> PathBuilder<'a> {
    pub fn new(config: &'a Configuration, resolver: &'a dyn IdentifierResolver) -> Self {
        Self { config, resolver }
    }

    /// Build the clean path of a resource, relative to the site root.
    pub fn build(&self, resource: &ResourceRef, format: Option<FormatTag>) -> Result<String> {
        self.build_with(resource, format, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        resource: &ResourceRef,
        format: Option<FormatTag>,
        options: &BuildOptions,
    ) -> Result<String> {
        let resource_type = resource.resource_type;
        let format = match format {
            None => self.config.default_format(resource_type),
            Some(tag) if tag.resource_type() == resource_type && self.config.is_allowed(tag) => tag,
            Some(tag) => {
                debug!("Format {tag} not allowed for {resource}");
                return self.no_identifier(resource, options);
            }
        };

        match self.compose(resource, format, options) {
            Some(path) => Ok(path),
            None => self.no_identifier(resource, options),
        }
    }

    /// `None` when the format cannot be honoured for lack of identifiers.
    fn compose(&self, resource: &ResourceRef, format: FormatTag, options: &BuildOptions) -> Option<String> {
        let resource_type = resource.resource_type;
        let layout = format.layout();
        let own = self.segment(resource, format.own_form())?;

        // The item the path hangs from: the item itself, or the media's item.
        let item = match resource_type {
            ResourceType::Item => Some(resource.clone()),
            ResourceType::Media if layout.embeds_item || layout.embeds_item_set => {
                parents_of_type(self.resolver, resource, ResourceType::Item)
                    .into_iter()
                    .next()
            }
            _ => None,
        };

        let mut path = self.prefix(options, true);
        if layout.uses_generic {
            path.push_str(self.config.generic(resource_type));
        }

        if layout.embeds_item_set {
            let item = item.as_ref()?;
            let Some(item_set) = parents_of_type(self.resolver, item, ResourceType::ItemSet)
                .into_iter()
                .next()
            else {
                return self.compose_generic(resource, options);
            };
            let policy = self.config.item_set_undefined(resource_type);
            path.push_str(&self.ancestor_segment(&item_set, IdentifierForm::Short, policy)?);
            path.push('/');
        }

        if layout.embeds_item {
            let item = item.as_ref()?;
            let policy = self.config.media.item_undefined;
            path.push_str(&self.ancestor_segment(item, layout.item_form, policy)?);
            path.push('/');
        }

        path.push_str(&own);
        Some(path)
    }

    /// The resource belongs to no item set: use the first allowed generic
    /// format instead.
    fn compose_generic(&self, resource: &ResourceRef, options: &BuildOptions) -> Option<String> {
        let format = FormatTag::generic_fallbacks(resource.resource_type)
            .iter()
            .copied()
            .find(|tag| self.config.is_allowed(*tag))?;
        debug!("{resource} has no item set, using {format}");
        self.compose(resource, format, options)
    }

    /// The encoded identifier of `resource` in the requested form.
    fn segment(&self, resource: &ResourceRef, form: IdentifierForm) -> Option<String> {
        let identifier = self.resolver.identifier_of(resource)?;
        let rendered = self.config.render_identifier(&identifier, form);
        Some(encode_segment(&rendered))
    }

    fn ancestor_segment(
        &self,
        ancestor: &ResourceRef,
        form: IdentifierForm,
        policy: AncestorPolicy,
    ) -> Option<String> {
        match (self.segment(ancestor, form), policy) {
            (Some(segment), _) => Some(segment),
            (None, AncestorPolicy::ParentId) => Some(ancestor.id.to_string()),
            (None, AncestorPolicy::Default) => {
                debug!("Ancestor {ancestor} has no identifier");
                None
            }
        }
    }

    fn prefix(&self, options: &BuildOptions, with_main_path: bool) -> String {
        let mut prefix = options
            .server_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();
        let base_path = options.base_path.trim_end_matches('/');
        if !base_path.is_empty() {
            prefix.push_str(base_path);
            prefix.push('/');
        } else if options.server_url.is_some() {
            prefix.push('/');
        }
        if with_main_path && options.with_main_path {
            prefix.push_str(&self.config.main_path);
        }
        prefix
    }

    fn no_identifier(&self, resource: &ResourceRef, options: &BuildOptions) -> Result<String> {
        let resource_type = resource.resource_type;
        let generic = self.config.generic(resource_type);
        let path = match self.config.identifier_undefined {
            UndefinedPolicy::Default => format!(
                "{}{}/{}",
                self.prefix(options, false),
                resource_type.controller_name(),
                resource.id
            ),
            UndefinedPolicy::Generic => format!("{}{}{}", self.prefix(options, false), generic, resource.id),
            UndefinedPolicy::MainGeneric => {
                format!("{}{}{}", self.prefix(options, true), generic, resource.id)
            }
            UndefinedPolicy::Exception => {
                return Err(Error::ResourceHasNoIdentifier {
                    resource_type,
                    id: resource.id,
                });
            }
        };
        debug!("{resource} has no clean url, using {path}");
        Ok(path)
    }
}

/// Build the clean path of `resource` with default options.
pub fn build_path(
    resource: &ResourceRef,
    config: &Configuration,
    resolver: &dyn IdentifierResolver,
    format: Option<FormatTag>,
) -> Result<String> {
    PathBuilder::new(config, resolver).build(resource, format)
}
