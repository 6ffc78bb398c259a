//! API routes module

pub mod events;
pub mod health;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .nest("/tags", tags::router(state))
}

/// `/ready`, backed by a real database probe.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
