use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventFilter, PopularTag, Tag, UpdateEvent};

/// Persistence for events and their tag associations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events matching every supplied filter field, by `start` then `id`.
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>>;

    /// Inserts the event and links its tags, creating unknown tag names.
    async fn create(&self, input: CreateEvent) -> EventResult<Event>;

    /// Applies the supplied fields; a present `tags` replaces the whole set.
    ///
    /// Fails with `NotFound` when the event does not exist.
    async fn update(&self, id: i32, input: UpdateEvent) -> EventResult<Event>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> EventResult<bool>;
}

/// Read access to the tag catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every tag, ordered by name.
    async fn list(&self) -> EventResult<Vec<Tag>>;

    /// Tags by event count (descending, ties by name), at most `limit`.
    async fn popular(&self, limit: u64) -> EventResult<Vec<PopularTag>>;
}

#[derive(Debug, Default)]
struct Store {
    events: HashMap<i32, Event>,
    /// name -> id; tags are never removed
    tags: BTreeMap<String, i32>,
    last_event_id: i32,
    last_tag_id: i32,
}

impl Store {
    fn upsert_tags(&mut self, names: &[String]) {
        for name in names {
            if !self.tags.contains_key(name) {
                self.last_tag_id += 1;
                self.tags.insert(name.clone(), self.last_tag_id);
            }
        }
    }
}

/// In-memory implementation of both repositories (for development/testing).
///
/// Clones share the same store, so one instance can back both services.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let store = self.store.read().await;

        let mut events: Vec<Event> = store
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));

        tracing::debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>> {
        let store = self.store.read().await;
        Ok(store.events.get(&id).cloned())
    }

    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let mut store = self.store.write().await;

        store.last_event_id += 1;
        let event = Event::new(store.last_event_id, input);
        store.upsert_tags(&event.tags);
        store.events.insert(event.id, event.clone());

        tracing::info!(event_id = %event.id, tags = event.tags.len(), "Created event");
        Ok(event)
    }

    async fn update(&self, id: i32, input: UpdateEvent) -> EventResult<Event> {
        let mut store = self.store.write().await;

        let mut event = store
            .events
            .get(&id)
            .cloned()
            .ok_or(EventError::NotFound(id))?;
        let replaces_tags = input.tags.is_some();
        event.apply_update(input);

        if replaces_tags {
            store.upsert_tags(&event.tags);
        }
        store.events.insert(id, event.clone());

        tracing::info!(event_id = %id, replaces_tags, "Updated event");
        Ok(event)
    }

    async fn delete(&self, id: i32) -> EventResult<bool> {
        let mut store = self.store.write().await;
        let deleted = store.events.remove(&id).is_some();

        if deleted {
            tracing::info!(event_id = %id, "Deleted event");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl TagRepository for InMemoryEventRepository {
    async fn list(&self) -> EventResult<Vec<Tag>> {
        let store = self.store.read().await;

        Ok(store
            .tags
            .iter()
            .map(|(name, id)| Tag {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn popular(&self, limit: u64) -> EventResult<Vec<PopularTag>> {
        let store = self.store.read().await;

        let mut counts: Vec<PopularTag> = store
            .tags
            .iter()
            .map(|(name, id)| {
                let carrying = store
                    .events
                    .values()
                    .filter(|event| event.tags.contains(name))
                    .count();
                PopularTag {
                    id: *id,
                    name: name.clone(),
                    event_count: i64::try_from(carrying).unwrap_or(i64::MAX),
                }
            })
            .collect();

        counts.sort_by(|a, b| b.event_count.cmp(&a.event_count).then(a.name.cmp(&b.name)));
        counts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(counts)
    }
}
