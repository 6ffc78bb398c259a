use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
    Select, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::entity::{event, event_tag, tag};
use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, Event, EventFilter, PopularTag, Tag, UpdateEvent, normalize_tag_names,
};
use crate::repository::{EventRepository, TagRepository};

const LIKE_ESCAPE: char = '\\';

/// Escapes `LIKE` metacharacters so `needle` matches literally.
fn like_literal(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Tag names in byte order, independent of the database collation.
fn tag_name_bytewise() -> Expr {
    Expr::cust(r#""tags"."name" COLLATE "C""#)
}

/// PostgreSQL implementation of [`EventRepository`]
#[derive(Clone)]
pub struct PgEventRepository {
    db: DatabaseConnection,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translates a filter into a `SELECT` over `events`.
///
/// The tag predicate is an `IN (subquery)` over `event_tags ⨝ tags`, so an
/// event never appears twice.
pub fn list_query(filter: &EventFilter) -> Select<event::Entity> {
    let mut query = event::Entity::find();

    if let Some(name) = &filter.tag {
        let tagged = event_tag::Entity::find()
            .select_only()
            .column(event_tag::Column::EventId)
            .inner_join(tag::Entity)
            .filter(tag::Column::Name.eq(name.as_str()))
            .into_query();
        query = query.filter(event::Column::Id.in_subquery(tagged));
    }
    if let Some(host) = &filter.host {
        let pattern = LikeExpr::new(format!("%{}%", like_literal(host))).escape(LIKE_ESCAPE);
        query = query.filter(event::Column::Host.like(pattern));
    }
    if let Some(from) = filter.start_date {
        query = query.filter(event::Column::Start.gte(from));
    }
    if let Some(until) = filter.end_date {
        query = query.filter(event::Column::End.lte(until));
    }
    if let Some(featured) = filter.featured {
        query = query.filter(event::Column::Featured.eq(featured));
    }

    query
        .order_by_asc(event::Column::Start)
        .order_by_asc(event::Column::Id)
}

/// Tag names per event id. Events without tags are absent from the map.
async fn tag_names<C: ConnectionTrait>(
    conn: &C,
    event_ids: &[i32],
) -> EventResult<HashMap<i32, Vec<String>>> {
    if event_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = event_tag::Entity::find()
        .filter(event_tag::Column::EventId.is_in(event_ids.iter().copied()))
        .find_also_related(tag::Entity)
        .all(conn)
        .await?;

    let mut names: HashMap<i32, Vec<String>> = HashMap::new();
    for (link, tag) in rows {
        if let Some(tag) = tag {
            names.entry(link.event_id).or_default().push(tag.name);
        }
    }
    Ok(names)
}

/// Upserts `names` and links each to `event_id`. Returns the linked names.
///
/// `names` must already be de-duplicated.
async fn link_tags<C: ConnectionTrait>(
    conn: &C,
    event_id: i32,
    names: &[String],
) -> EventResult<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    tag::Entity::insert_many(names.iter().map(|name| tag::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    }))
    .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await?;

    let tags = tag::Entity::find()
        .filter(tag::Column::Name.is_in(names.iter().cloned()))
        .all(conn)
        .await?;

    // ON CONFLICT DO NOTHING takes no lock, so another session may remove a
    // pre-existing tag before the select above.
    if tags.len() != names.len() {
        return Err(EventError::Internal(format!(
            "Expected {} tags after upsert, found {}",
            names.len(),
            tags.len()
        )));
    }

    event_tag::Entity::insert_many(tags.iter().map(|tag| event_tag::ActiveModel {
        event_id: Set(event_id),
        tag_id: Set(tag.id),
    }))
    .exec_without_returning(conn)
    .await?;

    Ok(tags.into_iter().map(|tag| tag.name).collect())
}

fn apply_update(active: &mut event::ActiveModel, input: &UpdateEvent) {
    if let Some(title) = &input.title {
        active.title = Set(title.clone());
    }
    if let Some(host) = &input.host {
        active.host = Set(host.clone());
    }
    if let Some(contact) = &input.contact {
        active.contact = Set(Some(contact.clone()));
    }
    if let Some(summary) = &input.summary {
        active.summary = Set(Some(summary.clone()));
    }
    if let Some(url) = &input.url {
        active.url = Set(Some(url.clone()));
    }
    if let Some(start) = input.start {
        active.start = Set(start.into());
    }
    if let Some(end) = input.end {
        active.end = Set(end.into());
    }
    if let Some(location) = &input.location {
        active.location = Set(Some(location.clone()));
    }
    if let Some(featured) = input.featured {
        active.featured = Set(featured);
    }
    active.updated_at = Set(chrono::Utc::now().into());
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let models = list_query(&filter).all(&self.db).await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut names = tag_names(&self.db, &ids).await?;

        debug!(count = models.len(), "Listed events");
        Ok(models
            .into_iter()
            .map(|model| {
                let tags = names.remove(&model.id).unwrap_or_default();
                model.into_event(tags)
            })
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>> {
        let Some(model) = event::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let tags = tag_names(&self.db, &[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(model.into_event(tags)))
    }

    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let names = normalize_tag_names(&input.tags);

        let txn = self.db.begin().await?;
        let model = event::ActiveModel::from(&input).insert(&txn).await?;
        let tags = link_tags(&txn, model.id, &names).await?;
        txn.commit().await?;

        info!(event_id = %model.id, tags = tags.len(), "Created event");
        Ok(model.into_event(tags))
    }

    async fn update(&self, id: i32, input: UpdateEvent) -> EventResult<Event> {
        let txn = self.db.begin().await?;

        let existing = event::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(EventError::NotFound(id))?;

        let mut active: event::ActiveModel = existing.into();
        apply_update(&mut active, &input);
        let model = active.update(&txn).await?;

        let tags = match &input.tags {
            Some(names) => {
                event_tag::Entity::delete_many()
                    .filter(event_tag::Column::EventId.eq(id))
                    .exec(&txn)
                    .await?;
                link_tags(&txn, id, &normalize_tag_names(names)).await?
            }
            None => tag_names(&txn, &[id])
                .await?
                .remove(&id)
                .unwrap_or_default(),
        };

        txn.commit().await?;

        info!(event_id = %id, replaces_tags = input.tags.is_some(), "Updated event");
        Ok(model.into_event(tags))
    }

    async fn delete(&self, id: i32) -> EventResult<bool> {
        let result = event::Entity::delete_by_id(id).exec(&self.db).await?;
        let deleted = result.rows_affected > 0;

        if deleted {
            info!(event_id = %id, "Deleted event");
        }
        Ok(deleted)
    }
}

/// PostgreSQL implementation of [`TagRepository`]
#[derive(Clone)]
pub struct PgTagRepository {
    db: DatabaseConnection,
}

impl PgTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct PopularTagRow {
    id: i32,
    name: String,
    event_count: i64,
}

impl From<PopularTagRow> for PopularTag {
    fn from(row: PopularTagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            event_count: row.event_count,
        }
    }
}

/// Tags with their event counts; tags without events count as zero.
pub fn popular_query(limit: u64) -> Select<tag::Entity> {
    tag::Entity::find()
        .select_only()
        .column(tag::Column::Id)
        .column(tag::Column::Name)
        .column_as(event_tag::Column::EventId.count(), "event_count")
        .join(JoinType::LeftJoin, tag::Relation::EventTag.def())
        .group_by(tag::Column::Id)
        .group_by(tag::Column::Name)
        .order_by_desc(event_tag::Column::EventId.count())
        .order_by_asc(tag_name_bytewise())
        .limit(limit)
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> EventResult<Vec<Tag>> {
        let tags = tag::Entity::find()
            .order_by_asc(tag_name_bytewise())
            .all(&self.db)
            .await?;

        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn popular(&self, limit: u64) -> EventResult<Vec<PopularTag>> {
        let rows = popular_query(limit)
            .into_model::<PopularTagRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(PopularTag::from).collect())
    }
}
