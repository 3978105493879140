//! Routing integration.
//!
//! The host calls [`CleanRouter::route`] before its own routes. A match is
//! turned into the controller, action and id the host dispatches on; no
//! match means the host continues with its default routing.

use std::sync::Arc;

use cleanurl_config::{AncestorPolicy, Configuration, UndefinedPolicy};
use cleanurl_core::{FormatTag, IdentifierChain, IdentifierResolver, ResourceRef, Result};
use cleanurl_index::IndexHandle;
use serde::Serialize;
use tracing::debug;

use crate::builder::{BuildOptions, PathBuilder};
use crate::matcher::{MatchedPattern, MatchedRoute, PathMatcher, is_numeric};

/// Parameters the host router dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub controller: &'static str,
    pub action: &'static str,
    pub id: u64,
    pub resource: ResourceRef,
    /// Format the path was recognised as, `None` for a numeric fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatTag>,
}

impl RouteParams {
    fn show(resource: ResourceRef, format: Option<FormatTag>) -> Self {
        Self {
            controller: resource.resource_type.controller_name(),
            action: "show",
            id: resource.id,
            resource,
            format,
        }
    }
}

/// Shared configuration snapshot plus the published item set index.
#[derive(Debug, Clone)]
pub struct CleanRouter {
    config: Arc<Configuration>,
    index: Arc<IndexHandle>,
}

impl CleanRouter {
    pub fn new(config: Arc<Configuration>, index: Arc<IndexHandle>) -> Self {
        Self { config, index }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn index(&self) -> &Arc<IndexHandle> {
        &self.index
    }

    /// Match `path` without resolving it.
    pub fn match_path(&self, path: &str) -> Option<MatchedRoute> {
        let index = self.index.load();
        PathMatcher::new(&self.config, &index).match_path(path).ok()
    }

    /// Match and resolve `path`. `None` lets the host fall through.
    pub fn route(&self, path: &str, resolver: &dyn IdentifierResolver) -> Option<RouteParams> {
        // One snapshot for the whole request.
        let index = self.index.load();
        let matcher = PathMatcher::new(&self.config, &index);

        if let Ok(matched) = matcher.match_path(path) {
            if let Some(params) = self.resolve(&matched, resolver) {
                return Some(params);
            }
        }

        // The `generic` policy builds its fallback urls without the main path.
        if self.config.identifier_undefined == UndefinedPolicy::Generic && !self.config.main_path.is_empty() {
            let matched = matcher.ignoring_main_path().match_path(path).ok()?;
            return self.resolve_numeric(&matched, resolver);
        }
        None
    }

    /// Try each format hint in order, then the numeric fallback.
    pub fn resolve(&self, matched: &MatchedRoute, resolver: &dyn IdentifierResolver) -> Option<RouteParams> {
        for format in &matched.format_hints {
            let Some(chain) = self.chain_for(*format, &matched.identifiers) else {
                continue;
            };
            if let Some(resource) = resolver.lookup_by_identifier_chain(format.resource_type(), &chain) {
                debug!("Routed to {resource} as {format}");
                return Some(RouteParams::show(resource, Some(*format)));
            }
        }
        self.resolve_numeric(matched, resolver)
    }

    /// `generic/42`, as built by the `generic` and `main_generic` policies.
    fn resolve_numeric(&self, matched: &MatchedRoute, resolver: &dyn IdentifierResolver) -> Option<RouteParams> {
        if matched.pattern == MatchedPattern::ItemSetIdentifier
            || !matches!(
                self.config.identifier_undefined,
                UndefinedPolicy::Generic | UndefinedPolicy::MainGeneric
            )
        {
            return None;
        }
        let [segment] = matched.identifiers.as_slice() else {
            return None;
        };
        if !is_numeric(segment) {
            return None;
        }
        let id = segment.parse().ok()?;
        let resource = resolver.find_by_id(matched.resource_type, id)?;
        debug!("Routed to {resource} by id");
        Some(RouteParams::show(resource, None))
    }

    /// Assign decoded segments to their roles for `format`, stripping the
    /// identifier prefix from full forms. `None` when the segments cannot have
    /// been built with this format.
    pub fn chain_for(&self, format: FormatTag, identifiers: &[String]) -> Option<IdentifierChain> {
        let layout = format.layout();
        if identifiers.len() != layout.ancestor_count() + 1 {
            return None;
        }
        let (own, ancestors) = identifiers.split_last()?;
        let mut ancestors = ancestors.iter();

        let own = self.config.bare_identifier(own, format.own_form())?;
        let mut chain = IdentifierChain::new(own);

        if layout.embeds_item_set {
            chain.item_set = Some(ancestors.next()?.clone());
        }
        if layout.embeds_item {
            let item = ancestors.next()?;
            let bare = match self.config.bare_identifier(item, layout.item_form) {
                Some(bare) => bare,
                // A parent id stands in for an item without identifier.
                None if self.config.media.item_undefined == AncestorPolicy::ParentId && is_numeric(item) => {
                    item.as_str()
                }
                None => return None,
            };
            chain.item = Some(bare.to_string());
        }
        Some(chain)
    }

    /// Build the clean url of a resource with this router's configuration.
    pub fn url_for(
        &self,
        resource: &ResourceRef,
        format: Option<FormatTag>,
        options: &BuildOptions,
        resolver: &dyn IdentifierResolver,
    ) -> Result<String> {
        PathBuilder::new(&self.config, resolver).build_with(resource, format, options)
    }
}
