use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, DEFAULT_POPULAR_LIMIT, Event, EventFilter, MAX_POPULAR_LIMIT, PopularTag, Tag,
    UpdateEvent,
};
use crate::repository::{EventRepository, TagRepository};

const END_BEFORE_START: &str = "Event end date must be after start date";

fn ensure_end_after_start(start: DateTime<Utc>, end: DateTime<Utc>) -> EventResult<()> {
    if end <= start {
        return Err(EventError::Validation(END_BEFORE_START.to_string()));
    }
    Ok(())
}

/// Service layer for event business logic
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.repository.list(filter).await
    }

    pub async fn get_event(&self, id: i32) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// Validates the payload and date order before anything is written.
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;
        ensure_end_after_start(input.start, input.end)?;

        self.repository.create(input).await
    }

    /// Date order is only checked when the update carries both `start` and `end`.
    pub async fn update_event(&self, id: i32, input: UpdateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;
        if let (Some(start), Some(end)) = (input.start, input.end) {
            ensure_end_after_start(start, end)?;
        }

        self.repository.update(id, input).await
    }

    pub async fn delete_event(&self, id: i32) -> EventResult<()> {
        if !self.repository.delete(id).await? {
            return Err(EventError::NotFound(id));
        }
        Ok(())
    }
}

/// Service layer for the tag catalogue
#[derive(Clone)]
pub struct TagService<R: TagRepository> {
    repository: Arc<R>,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_tags(&self) -> EventResult<Vec<Tag>> {
        self.repository.list().await
    }

    /// `limit` defaults to 10 and must lie in `1..=100`.
    pub async fn popular_tags(&self, limit: Option<u64>) -> EventResult<Vec<PopularTag>> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
        if !(1..=MAX_POPULAR_LIMIT).contains(&limit) {
            return Err(EventError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_POPULAR_LIMIT
            )));
        }

        self.repository.popular(limit).await
    }
}
