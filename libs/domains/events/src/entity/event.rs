use crate::models::CreateEvent;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub host: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    pub start: DateTimeWithTimeZone,
    pub end: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,
    pub featured: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event_tag::Entity")]
    EventTag,
}

impl Related<super::event_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_tag::Relation::Event.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain view of this row with its (already resolved) tag names.
    pub fn into_event(self, mut tags: Vec<String>) -> crate::models::Event {
        tags.sort();

        crate::models::Event {
            id: self.id,
            title: self.title,
            host: self.host,
            contact: self.contact,
            summary: self.summary,
            url: self.url,
            start: self.start.into(),
            end: self.end.into(),
            location: self.location,
            featured: self.featured,
            tags,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

// Tags are written separately; see `postgres::PgEventRepository::create`.
impl From<&CreateEvent> for ActiveModel {
    fn from(input: &CreateEvent) -> Self {
        let now = chrono::Utc::now();

        ActiveModel {
            id: NotSet,
            title: Set(input.title.clone()),
            host: Set(input.host.clone()),
            contact: Set(input.contact.clone()),
            summary: Set(input.summary.clone()),
            url: Set(input.url.clone()),
            start: Set(input.start.into()),
            end: Set(input.end.into()),
            location: Set(input.location.clone()),
            featured: Set(input.featured),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
