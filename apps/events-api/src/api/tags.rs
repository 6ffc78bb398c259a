use axum::Router;
use domain_events::{PgTagRepository, TagService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgTagRepository::new(state.db.clone());
    let service = TagService::new(repository);
    handlers::tags::router(service)
}
