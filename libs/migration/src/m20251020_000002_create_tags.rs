use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251020_000001_create_events::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_auto(Tags::Id))
                    .col(string_len_uniq(Tags::Name, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventTags::Table)
                    .if_not_exists()
                    .col(integer(EventTags::EventId))
                    .col(integer(EventTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_event_tags")
                            .col(EventTags::EventId)
                            .col(EventTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_tags_event_id")
                            .from(EventTags::Table, EventTags::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_tags_tag_id")
                            .from(EventTags::Table, EventTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite PK covers lookups by event; popular-tag counts go by tag.
        manager
            .create_index(
                Index::create()
                    .name("idx_event_tags_tag_id")
                    .table(EventTags::Table)
                    .col(EventTags::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum EventTags {
    Table,
    EventId,
    TagId,
}
