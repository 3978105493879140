//! Format tags: which ancestors a clean url embeds and in which form.
//!
//! Every tag maps to a fixed [`FormatLayout`], so path composition and path
//! matching read the table instead of branching on tag names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, ResourceType};

/// How an identifier segment is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierForm {
    /// The bare identifier value.
    Short,
    /// The identifier preceded by the configured identifier prefix.
    Full,
}

/// Shape of a clean url for one format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatLayout {
    /// The path starts with the resource type's generic prefix.
    pub uses_generic: bool,
    pub embeds_item_set: bool,
    /// Only meaningful for media.
    pub embeds_item: bool,
    /// Form of the item segment, whether the item is the resource or its parent.
    pub item_form: IdentifierForm,
    pub media_form: IdentifierForm,
}

impl FormatLayout {
    const fn new(
        uses_generic: bool,
        embeds_item_set: bool,
        embeds_item: bool,
        item_full: bool,
        media_full: bool,
    ) -> Self {
        Self {
            uses_generic,
            embeds_item_set,
            embeds_item,
            item_form: if item_full { IdentifierForm::Full } else { IdentifierForm::Short },
            media_form: if media_full { IdentifierForm::Full } else { IdentifierForm::Short },
        }
    }

    /// Number of ancestor segments before the resource's own identifier.
    pub fn ancestor_count(&self) -> usize {
        usize::from(self.embeds_item_set) + usize::from(self.embeds_item)
    }
}

/// Closed set of clean url formats, grouped by resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    GenericItemSet,

    GenericItem,
    GenericItemFull,
    ItemSetItem,
    ItemSetItemFull,

    GenericMedia,
    GenericMediaFull,
    GenericItemMedia,
    GenericItemFullMedia,
    GenericItemMediaFull,
    GenericItemFullMediaFull,
    ItemSetMedia,
    ItemSetMediaFull,
    ItemSetItemMedia,
    ItemSetItemFullMedia,
    ItemSetItemMediaFull,
    ItemSetItemFullMediaFull,
}

const ITEM_SET_FORMATS: &[FormatTag] = &[FormatTag::GenericItemSet];

const ITEM_FORMATS: &[FormatTag] = &[
    FormatTag::GenericItem,
    FormatTag::GenericItemFull,
    FormatTag::ItemSetItem,
    FormatTag::ItemSetItemFull,
];

const MEDIA_FORMATS: &[FormatTag] = &[
    FormatTag::GenericMedia,
    FormatTag::GenericMediaFull,
    FormatTag::GenericItemMedia,
    FormatTag::GenericItemFullMedia,
    FormatTag::GenericItemMediaFull,
    FormatTag::GenericItemFullMediaFull,
    FormatTag::ItemSetMedia,
    FormatTag::ItemSetMediaFull,
    FormatTag::ItemSetItemMedia,
    FormatTag::ItemSetItemFullMedia,
    FormatTag::ItemSetItemMediaFull,
    FormatTag::ItemSetItemFullMediaFull,
];

const ITEM_GENERIC_FALLBACKS: &[FormatTag] = &[FormatTag::GenericItem, FormatTag::GenericItemFull];

const MEDIA_GENERIC_FALLBACKS: &[FormatTag] = &[
    FormatTag::GenericItemMedia,
    FormatTag::GenericItemFullMedia,
    FormatTag::GenericItemMediaFull,
    FormatTag::GenericItemFullMediaFull,
    FormatTag::GenericMedia,
    FormatTag::GenericMediaFull,
];

impl FormatTag {
    /// All tags available for a resource type, in declaration order.
    pub fn for_type(resource_type: ResourceType) -> &'static [FormatTag] {
        match resource_type {
            ResourceType::ItemSet => ITEM_SET_FORMATS,
            ResourceType::Item => ITEM_FORMATS,
            ResourceType::Media => MEDIA_FORMATS,
        }
    }

    /// Generic formats to retry, in order, when an item-set format cannot be
    /// built because the item belongs to no item set.
    pub fn generic_fallbacks(resource_type: ResourceType) -> &'static [FormatTag] {
        match resource_type {
            ResourceType::ItemSet => &[],
            ResourceType::Item => ITEM_GENERIC_FALLBACKS,
            ResourceType::Media => MEDIA_GENERIC_FALLBACKS,
        }
    }

    pub fn resource_type(self) -> ResourceType {
        use FormatTag::*;
        match self {
            GenericItemSet => ResourceType::ItemSet,
            GenericItem | GenericItemFull | ItemSetItem | ItemSetItemFull => ResourceType::Item,
            _ => ResourceType::Media,
        }
    }

    pub fn layout(self) -> FormatLayout {
        use FormatTag::*;
        match self {
            //                              generic, item set, item,  item full, media full
            GenericItemSet => FormatLayout::new(true, false, false, false, false),

            GenericItem => FormatLayout::new(true, false, false, false, false),
            GenericItemFull => FormatLayout::new(true, false, false, true, false),
            ItemSetItem => FormatLayout::new(false, true, false, false, false),
            ItemSetItemFull => FormatLayout::new(false, true, false, true, false),

            GenericMedia => FormatLayout::new(true, false, false, false, false),
            GenericMediaFull => FormatLayout::new(true, false, false, false, true),
            GenericItemMedia => FormatLayout::new(true, false, true, false, false),
            GenericItemFullMedia => FormatLayout::new(true, false, true, true, false),
            GenericItemMediaFull => FormatLayout::new(true, false, true, false, true),
            GenericItemFullMediaFull => FormatLayout::new(true, false, true, true, true),
            ItemSetMedia => FormatLayout::new(false, true, false, false, false),
            ItemSetMediaFull => FormatLayout::new(false, true, false, false, true),
            ItemSetItemMedia => FormatLayout::new(false, true, true, false, false),
            ItemSetItemFullMedia => FormatLayout::new(false, true, true, true, false),
            ItemSetItemMediaFull => FormatLayout::new(false, true, true, false, true),
            ItemSetItemFullMediaFull => FormatLayout::new(false, true, true, true, true),
        }
    }

    /// Form of the resource's own identifier segment.
    pub fn own_form(self) -> IdentifierForm {
        let layout = self.layout();
        match self.resource_type() {
            ResourceType::ItemSet => IdentifierForm::Short,
            ResourceType::Item => layout.item_form,
            ResourceType::Media => layout.media_form,
        }
    }

    pub fn as_str(self) -> &'static str {
        use FormatTag::*;
        match self {
            GenericItemSet => "generic_item_set",
            GenericItem => "generic_item",
            GenericItemFull => "generic_item_full",
            ItemSetItem => "item_set_item",
            ItemSetItemFull => "item_set_item_full",
            GenericMedia => "generic_media",
            GenericMediaFull => "generic_media_full",
            GenericItemMedia => "generic_item_media",
            GenericItemFullMedia => "generic_item_full_media",
            GenericItemMediaFull => "generic_item_media_full",
            GenericItemFullMediaFull => "generic_item_full_media_full",
            ItemSetMedia => "item_set_media",
            ItemSetMediaFull => "item_set_media_full",
            ItemSetItemMedia => "item_set_item_media",
            ItemSetItemFullMedia => "item_set_item_full_media",
            ItemSetItemMediaFull => "item_set_item_media_full",
            ItemSetItemFullMediaFull => "item_set_item_full_media_full",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .iter()
            .flat_map(|t| FormatTag::for_type(*t))
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tags() -> impl Iterator<Item = FormatTag> {
        ResourceType::ALL
            .into_iter()
            .flat_map(|t| FormatTag::for_type(t).iter().copied())
    }

    #[test]
    fn test_tag_names_round_trip() {
        for tag in all_tags() {
            assert_eq!(tag.as_str().parse::<FormatTag>().unwrap(), tag);
        }
        assert!("item_set_page".parse::<FormatTag>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for tag in all_tags() {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }

    #[test]
    fn test_tags_grouped_by_type() {
        for resource_type in ResourceType::ALL {
            for tag in FormatTag::for_type(resource_type) {
                assert_eq!(tag.resource_type(), resource_type);
            }
        }
        assert_eq!(FormatTag::for_type(ResourceType::Media).len(), 12);
    }

    #[test]
    fn test_layout_reflects_name() {
        // The table must agree with the naming scheme of the tags.
        for tag in all_tags() {
            let name = tag.as_str();
            let layout = tag.layout();
            assert_eq!(layout.uses_generic, name.starts_with("generic_"), "{name}");
            assert_eq!(layout.embeds_item_set, name.starts_with("item_set_"), "{name}");
            if tag.resource_type() == ResourceType::Media {
                let without_set = name.trim_start_matches("item_set_");
                assert_eq!(layout.embeds_item, without_set.contains("item_"), "{name}");
                assert_eq!(
                    layout.media_form == IdentifierForm::Full,
                    name.ends_with("media_full"),
                    "{name}"
                );
            }
            assert_eq!(layout.item_form == IdentifierForm::Full, name.contains("item_full"), "{name}");
        }
    }

    #[test]
    fn test_ancestor_count() {
        assert_eq!(FormatTag::GenericItem.layout().ancestor_count(), 0);
        assert_eq!(FormatTag::ItemSetItem.layout().ancestor_count(), 1);
        assert_eq!(FormatTag::GenericItemMedia.layout().ancestor_count(), 1);
        assert_eq!(FormatTag::ItemSetItemFullMediaFull.layout().ancestor_count(), 2);
    }

    #[test]
    fn test_own_form() {
        assert_eq!(FormatTag::GenericItemFull.own_form(), IdentifierForm::Full);
        assert_eq!(FormatTag::GenericItemFullMedia.own_form(), IdentifierForm::Short);
        assert_eq!(FormatTag::ItemSetMediaFull.own_form(), IdentifierForm::Full);
        assert_eq!(FormatTag::GenericItemSet.own_form(), IdentifierForm::Short);
    }
}
