//! HTTP endpoints for events and tags.
//!
//! Each submodule exposes a `router` that carries its own service state;
//! the app nests them under `/events` and `/tags`.

pub mod events;
pub mod tags;

use utoipa::OpenApi;

/// OpenAPI documentation for the events domain
#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/events", api = events::EventsApiDoc),
        (path = "/tags", api = tags::TagsApiDoc)
    ),
    tags(
        (name = events::TAG, description = "Calendar event management"),
        (name = tags::TAG, description = "Tag catalogue")
    )
)]
pub struct ApiDoc;
