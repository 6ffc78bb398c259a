//! SeaORM entities for `events`, `tags` and the `event_tags` join table.

pub mod event;
pub mod event_tag;
pub mod tag;
