//! Path matcher - clean url back to a resource type and identifier chain.
//!
//! Patterns are tried in a fixed order, first match wins:
//!
//! 1. generic prefixes that are not empty (item set, item, media)
//! 2. a leading item set identifier from the [`ItemSetIdentifierIndex`]
//! 3. empty generic prefixes
//!
//! The matcher never validates identifiers. Resolving them is the job of
//! the router and its resolver.

use cleanurl_config::{AncestorPolicy, Configuration, UndefinedPolicy};
use cleanurl_core::{FormatTag, ResourceType, decode_segment, normalize_path};
use cleanurl_index::ItemSetIdentifierIndex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// The pattern that recognised a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedPattern {
    ItemSetGeneric,
    ItemGeneric,
    MediaGeneric,
    ItemSetIdentifier,
}

impl MatchedPattern {
    fn generic(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::ItemSet => Self::ItemSetGeneric,
            ResourceType::Item => Self::ItemGeneric,
            ResourceType::Media => Self::MediaGeneric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute {
    /// Type of the first format hint, or of the generic prefix.
    pub resource_type: ResourceType,
    /// Decoded segments in path order, full forms still prefixed.
    pub identifiers: Vec<String>,
    /// Allowed formats that produce this shape of path, in the order the
    /// router should try them.
    pub format_hints: Vec<FormatTag>,
    pub pattern: MatchedPattern,
}

/// The path is not a clean url: the host continues with its own routes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("path does not match a clean url")]
pub struct NoMatch;

pub struct PathMatcher<'a> {
    config: &'a Configuration,
    index: &'a ItemSetIdentifierIndex,
    main_path: &'a str,
}

impl<'a> PathMatcher<'a> {
    pub fn new(config: &'a Configuration, index: &'a ItemSetIdentifierIndex) -> Self {
        Self {
            config,
            index,
            main_path: &config.main_path,
        }
    }

    /// Match paths built without the main path, as the `generic` policy
    /// builds them.
    pub fn ignoring_main_path(mut self) -> Self {
        self.main_path = "";
        self
    }

    pub fn match_path(&self, path: &str) -> Result<MatchedRoute, NoMatch> {
        let path = path.trim_matches('/');
        let rest = self.strip_main_path(path).ok_or(NoMatch)?;
        if rest.is_empty() {
            return Err(NoMatch);
        }

        let (prefixed, unprefixed): (Vec<ResourceType>, Vec<ResourceType>) = ResourceType::ALL
            .into_iter()
            .partition(|t| !self.config.generic(*t).is_empty());

        let matched = prefixed
            .into_iter()
            .find_map(|t| {
                let segments = rest.strip_prefix(self.config.generic(t))?;
                self.match_generic(t, segments)
            })
            .or_else(|| self.match_item_set_identifier(rest))
            .or_else(|| unprefixed.into_iter().find_map(|t| self.match_generic(t, rest)));

        match matched {
            Some(route) => {
                debug!("Matched {path} as {:?} {:?}", route.pattern, route.identifiers);
                Ok(route)
            }
            None => {
                debug!("No clean url for {path}");
                Err(NoMatch)
            }
        }
    }

    fn strip_main_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.main_path.is_empty() {
            return Some(path);
        }
        if path == self.main_path.trim_end_matches('/') {
            return Some("");
        }
        path.strip_prefix(self.main_path)
    }

    fn match_generic(&self, resource_type: ResourceType, rest: &str) -> Option<MatchedRoute> {
        let segments = split_segments(rest)?;
        let hints: Vec<FormatTag> = self
            .config
            .allowed_formats(resource_type)
            .iter()
            .copied()
            .filter(|tag| {
                let layout = tag.layout();
                layout.uses_generic && layout.ancestor_count() + 1 == segments.len()
            })
            .collect();

        // `generic/42` is what the no-identifier fallback builds.
        let numeric_fallback = segments.len() == 1
            && is_numeric(segments[0])
            && matches!(
                self.config.identifier_undefined,
                UndefinedPolicy::Generic | UndefinedPolicy::MainGeneric
            );
        if hints.is_empty() && !numeric_fallback {
            return None;
        }

        Some(MatchedRoute {
            resource_type,
            identifiers: decode_all(&segments)?,
            format_hints: hints,
            pattern: MatchedPattern::generic(resource_type),
        })
    }

    fn match_item_set_identifier(&self, rest: &str) -> Option<MatchedRoute> {
        // The index holds identifiers spelled the way the builder writes them.
        let rest = normalize_path(rest);
        let rest = rest.as_str();
        let (item_set, tail, by_id) = match self.index.match_prefix(rest) {
            Some((item_set, tail)) => (item_set, tail, false),
            None if self.config.item_set_ids_in_paths() => {
                let (first, tail) = rest.split_once('/').unwrap_or((rest, ""));
                if !is_numeric(first) {
                    return None;
                }
                (first, tail, true)
            }
            None => return None,
        };

        let tail = if tail.is_empty() {
            Vec::new()
        } else {
            split_segments(tail)?
        };

        let hints: Vec<FormatTag> = if tail.is_empty() {
            // A bare item set identifier only when item sets have no generic.
            if by_id || !self.config.item_set.generic.is_empty() {
                return None;
            }
            vec![FormatTag::GenericItemSet]
        } else {
            [ResourceType::Item, ResourceType::Media]
                .into_iter()
                .filter(|t| !by_id || self.config.item_set_undefined(*t) == AncestorPolicy::ParentId)
                .flat_map(|t| self.config.allowed_formats(t).iter().copied())
                .filter(|tag| {
                    let layout = tag.layout();
                    layout.embeds_item_set && layout.ancestor_count() == tail.len()
                })
                .collect()
        };
        let resource_type = hints.first()?.resource_type();

        let mut identifiers = decode_all(&[item_set])?;
        identifiers.extend(decode_all(&tail)?);

        Some(MatchedRoute {
            resource_type,
            identifiers,
            format_hints: hints,
            pattern: MatchedPattern::ItemSetIdentifier,
        })
    }
}

/// `None` when a segment is empty (`a//b`).
fn split_segments(rest: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = rest.split('/').collect();
    segments.iter().all(|s| !s.is_empty()).then_some(segments)
}

fn decode_all(segments: &[&str]) -> Option<Vec<String>> {
    segments
        .iter()
        .map(|segment| decode_segment(segment))
        .collect()
}

pub(crate) fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
