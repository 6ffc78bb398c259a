//! Events Domain
//!
//! Calendar events with free-form tags, stored in PostgreSQL through SeaORM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /events and /tags endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Input validation, date ordering, popular-tag limits
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← EventRepository / TagRepository (Postgres + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Entities   │  ← events, tags, event_tags
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{EventService, InMemoryEventRepository, TagService, handlers};
//!
//! let repository = InMemoryEventRepository::new();
//! let events = handlers::events::router(EventService::new(repository.clone()));
//! let tags = handlers::tags::router(TagService::new(repository));
//!
//! let router = axum::Router::new().nest("/events", events).nest("/tags", tags);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, DeleteEventResponse, Event, EventFilter, PopularTag, PopularTagsQuery, Tag,
    UpdateEvent,
};
pub use postgres::{PgEventRepository, PgTagRepository};
pub use repository::{EventRepository, InMemoryEventRepository, TagRepository};
pub use service::{EventService, TagService};
