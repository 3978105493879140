use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use cleanurl_core::{
    EventKind, IdentifierChain, IdentifierResolver, ResourceEvent, ResourceObserver, ResourceRef,
    ResourceType,
};
use tracing::debug;

use crate::{CatalogData, CatalogError, ItemRecord, ItemSetRecord, MediaRecord, Result};

/// Item sets, items and media with their identifiers, keyed by id.
#[derive(Default)]
pub struct Catalog {
    item_sets: BTreeMap<u64, ItemSetRecord>,
    items: BTreeMap<u64, ItemRecord>,
    media: BTreeMap<u64, MediaRecord>,
    observers: Vec<Arc<dyn ResourceObserver>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: CatalogData) -> Result<Self> {
        let mut catalog = Self::new();
        for record in data.item_sets {
            let resource = ResourceRef::item_set(record.id);
            if catalog.item_sets.insert(record.id, record).is_some() {
                return Err(CatalogError::DuplicateResource(resource));
            }
        }
        for record in data.items {
            catalog.check_item_sets(&record)?;
            let resource = ResourceRef::item(record.id);
            if catalog.items.insert(record.id, record).is_some() {
                return Err(CatalogError::DuplicateResource(resource));
            }
        }
        for record in data.media {
            catalog.check_item(&record)?;
            let resource = ResourceRef::media(record.id);
            if catalog.media.insert(record.id, record).is_some() {
                return Err(CatalogError::DuplicateResource(resource));
            }
        }
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_data(serde_json::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|err| CatalogError::Io(path.to_path_buf(), err))?;
        Self::from_json_str(&content)
    }

    /// Register an observer for every subsequent change.
    pub fn subscribe(&mut self, observer: Arc<dyn ResourceObserver>) {
        self.observers.push(observer);
    }

    pub fn save_item_set(&mut self, record: ItemSetRecord) -> ResourceEvent {
        let resource = ResourceRef::item_set(record.id);
        let kind = match self.item_sets.insert(record.id, record) {
            Some(_) => EventKind::Updated,
            None => EventKind::Created,
        };
        self.emit(ResourceEvent::new(kind, resource))
    }

    /// Remove an item set and detach its items.
    pub fn delete_item_set(&mut self, id: u64) -> Option<ResourceEvent> {
        self.item_sets.remove(&id)?;
        for item in self.items.values_mut() {
            item.item_sets.retain(|item_set| *item_set != id);
        }
        Some(self.emit(ResourceEvent::new(EventKind::Deleted, ResourceRef::item_set(id))))
    }

    pub fn save_item(&mut self, record: ItemRecord) -> Result<ResourceEvent> {
        self.check_item_sets(&record)?;
        let resource = ResourceRef::item(record.id);
        let kind = match self.items.insert(record.id, record) {
            Some(_) => EventKind::Updated,
            None => EventKind::Created,
        };
        Ok(self.emit(ResourceEvent::new(kind, resource)))
    }

    pub fn save_media(&mut self, record: MediaRecord) -> Result<ResourceEvent> {
        self.check_item(&record)?;
        let resource = ResourceRef::media(record.id);
        let kind = match self.media.insert(record.id, record) {
            Some(_) => EventKind::Updated,
            None => EventKind::Created,
        };
        Ok(self.emit(ResourceEvent::new(kind, resource)))
    }

    fn emit(&self, event: ResourceEvent) -> ResourceEvent {
        debug!("{} {:?}", event.resource, event.kind);
        for observer in &self.observers {
            observer.on_resource_event(&event, self);
        }
        event
    }

    fn check_item_sets(&self, record: &ItemRecord) -> Result<()> {
        match record.item_sets.iter().find(|id| !self.item_sets.contains_key(id)) {
            Some(missing) => Err(CatalogError::MissingParent {
                child: ResourceRef::item(record.id),
                parent: ResourceRef::item_set(*missing),
            }),
            None => Ok(()),
        }
    }

    fn check_item(&self, record: &MediaRecord) -> Result<()> {
        if self.items.contains_key(&record.item) {
            Ok(())
        } else {
            Err(CatalogError::MissingParent {
                child: ResourceRef::media(record.id),
                parent: ResourceRef::item(record.item),
            })
        }
    }

    fn resource(&self, resource_type: ResourceType, id: u64) -> Option<ResourceRef> {
        let identifier = match resource_type {
            ResourceType::ItemSet => self.item_sets.get(&id)?.identifier.as_ref(),
            ResourceType::Item => self.items.get(&id)?.identifier.as_ref(),
            ResourceType::Media => self.media.get(&id)?.identifier.as_ref(),
        };
        let resource = ResourceRef::new(resource_type, id);
        Some(match identifier.filter(|identifier| !identifier.is_empty()) {
            Some(identifier) => resource.with_identifier(identifier.clone()),
            None => resource,
        })
    }

    /// Whether a path segment designates `resource`: by identifier, or by id
    /// when the resource has no identifier.
    fn segment_designates(&self, segment: &str, resource: &ResourceRef) -> bool {
        match self.identifier_of(resource) {
            Some(identifier) => identifier == segment,
            None => resource.id.to_string() == segment,
        }
    }

    fn item_in_sets(&self, item: u64, item_set_segment: &str) -> bool {
        self.items.get(&item).is_some_and(|record| {
            record
                .item_sets
                .iter()
                .any(|id| self.segment_designates(item_set_segment, &ResourceRef::item_set(*id)))
        })
    }
}

fn non_empty<'a, I>(identifiers: I) -> Vec<String>
where
    I: Iterator<Item = &'a Option<String>>,
{
    identifiers
        .flatten()
        .filter(|identifier| !identifier.is_empty())
        .cloned()
        .collect()
}

impl IdentifierResolver for Catalog {
    fn identifier_of(&self, resource: &ResourceRef) -> Option<String> {
        self.resource(resource.resource_type, resource.id)?.identifier
    }

    fn parents_of(&self, resource: &ResourceRef) -> Vec<ResourceRef> {
        match resource.resource_type {
            ResourceType::ItemSet => Vec::new(),
            ResourceType::Item => self
                .items
                .get(&resource.id)
                .map(|record| {
                    record
                        .item_sets
                        .iter()
                        .filter_map(|id| self.resource(ResourceType::ItemSet, *id))
                        .collect()
                })
                .unwrap_or_default(),
            ResourceType::Media => self
                .media
                .get(&resource.id)
                .and_then(|record| self.resource(ResourceType::Item, record.item))
                .into_iter()
                .collect(),
        }
    }

    fn lookup_by_identifier_chain(
        &self,
        resource_type: ResourceType,
        chain: &IdentifierChain,
    ) -> Option<ResourceRef> {
        let own = Some(chain.own.as_str());
        match resource_type {
            ResourceType::ItemSet => self
                .item_sets
                .values()
                .find(|record| record.identifier.as_deref() == own)
                .and_then(|record| self.resource(ResourceType::ItemSet, record.id)),
            ResourceType::Item => self
                .items
                .values()
                .filter(|record| record.identifier.as_deref() == own)
                .find(|record| {
                    chain
                        .item_set
                        .as_deref()
                        .is_none_or(|segment| self.item_in_sets(record.id, segment))
                })
                .and_then(|record| self.resource(ResourceType::Item, record.id)),
            ResourceType::Media => self
                .media
                .values()
                .filter(|record| record.identifier.as_deref() == own)
                .find(|record| {
                    let item_ok = chain.item.as_deref().is_none_or(|segment| {
                        self.segment_designates(segment, &ResourceRef::item(record.item))
                    });
                    let item_set_ok = chain
                        .item_set
                        .as_deref()
                        .is_none_or(|segment| self.item_in_sets(record.item, segment));
                    item_ok && item_set_ok
                })
                .and_then(|record| self.resource(ResourceType::Media, record.id)),
        }
    }

    fn find_by_id(&self, resource_type: ResourceType, id: u64) -> Option<ResourceRef> {
        self.resource(resource_type, id)
    }

    fn identifiers_of_type(&self, resource_type: ResourceType) -> cleanurl_core::Result<Vec<String>> {
        Ok(match resource_type {
            ResourceType::ItemSet => non_empty(self.item_sets.values().map(|r| &r.identifier)),
            ResourceType::Item => non_empty(self.items.values().map(|r| &r.identifier)),
            ResourceType::Media => non_empty(self.media.values().map(|r| &r.identifier)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const CATALOG: &str = r#"{
        "item_sets": [
            { "id": 1, "identifier": "poems" },
            { "id": 2 }
        ],
        "items": [
            { "id": 10, "identifier": "poem-1", "item_sets": [1] },
            { "id": 11, "identifier": "poem-1", "item_sets": [2] },
            { "id": 12, "item_sets": [2, 1] }
        ],
        "media": [
            { "id": 100, "identifier": "scan-1", "item": 10 },
            { "id": 101, "identifier": "scan-1", "item": 12 }
        ]
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_json_str(CATALOG).unwrap()
    }

    #[test]
    fn test_identifiers() {
        let catalog = catalog();
        assert_eq!(catalog.identifier_of(&ResourceRef::item(10)), Some("poem-1".to_string()));
        assert_eq!(catalog.identifier_of(&ResourceRef::item_set(2)), None);
        assert_eq!(catalog.identifier_of(&ResourceRef::item(99)), None);
        assert_eq!(
            catalog.identifiers_of_type(ResourceType::ItemSet).unwrap(),
            vec!["poems".to_string()]
        );
    }

    #[test]
    fn test_parents_keep_insertion_order() {
        let catalog = catalog();
        let parents = catalog.parents_of(&ResourceRef::item(12));
        assert_eq!(parents, vec![ResourceRef::item_set(2), ResourceRef::item_set(1)]);
        assert_eq!(parents[1].identifier.as_deref(), Some("poems"));

        assert_eq!(catalog.parents_of(&ResourceRef::media(100)), vec![ResourceRef::item(10)]);
        assert!(catalog.parents_of(&ResourceRef::item_set(1)).is_empty());
    }

    #[test]
    fn test_lookup_disambiguates_by_ancestors() {
        let catalog = catalog();

        let in_poems = IdentifierChain::new("poem-1").with_item_set("poems");
        assert_eq!(
            catalog.lookup_by_identifier_chain(ResourceType::Item, &in_poems),
            Some(ResourceRef::item(10))
        );

        // Item set 2 has no identifier: it is designated by its id.
        let in_two = IdentifierChain::new("poem-1").with_item_set("2");
        assert_eq!(
            catalog.lookup_by_identifier_chain(ResourceType::Item, &in_two),
            Some(ResourceRef::item(11))
        );

        let by_item_id = IdentifierChain::new("scan-1").with_item("12");
        assert_eq!(
            catalog.lookup_by_identifier_chain(ResourceType::Media, &by_item_id),
            Some(ResourceRef::media(101))
        );

        let wrong_set = IdentifierChain::new("scan-1").with_item_set("2").with_item("poem-1");
        assert_eq!(catalog.lookup_by_identifier_chain(ResourceType::Media, &wrong_set), None);
    }

    #[test]
    fn test_rejects_missing_parent() {
        let err = Catalog::from_json_str(r#"{ "media": [{ "id": 1, "item": 5 }] }"#).err().unwrap();
        assert!(matches!(err, CatalogError::MissingParent { .. }));

        let err = Catalog::from_json_str(r#"{ "item_sets": [{ "id": 1 }, { "id": 1 }] }"#).err().unwrap();
        assert!(matches!(err, CatalogError::DuplicateResource(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = Catalog::from_path(&path).unwrap();
        assert!(catalog.find_by_id(ResourceType::Media, 101).is_some());
        assert!(Catalog::from_path(&dir.path().join("missing.json")).is_err());
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ResourceEvent>>);

    impl ResourceObserver for Recorder {
        fn on_resource_event(&self, event: &ResourceEvent, _resolver: &dyn IdentifierResolver) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_changes_notify_observers() {
        let mut catalog = catalog();
        let recorder = Arc::new(Recorder::default());
        catalog.subscribe(recorder.clone());

        catalog.save_item_set(ItemSetRecord {
            id: 3,
            identifier: Some("letters".to_string()),
        });
        catalog.save_item_set(ItemSetRecord {
            id: 3,
            identifier: Some("mail".to_string()),
        });
        catalog.delete_item_set(1);
        assert!(catalog.delete_item_set(1).is_none());

        let kinds: Vec<EventKind> = recorder.0.lock().unwrap().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Created, EventKind::Updated, EventKind::Deleted]);
        assert_eq!(catalog.parents_of(&ResourceRef::item(10)), Vec::<ResourceRef>::new());
    }

    #[test]
    fn test_save_checks_parents() {
        let mut catalog = catalog();
        let err = catalog
            .save_item(ItemRecord {
                id: 20,
                identifier: None,
                item_sets: vec![7],
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingParent { .. }));

        catalog
            .save_media(MediaRecord {
                id: 200,
                identifier: Some("scan-9".to_string()),
                item: 12,
            })
            .unwrap();
        assert_eq!(catalog.identifier_of(&ResourceRef::media(200)), Some("scan-9".to_string()));
    }
}
