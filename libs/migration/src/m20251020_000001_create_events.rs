use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(string_len(Events::Title, 255))
                    .col(text(Events::Host))
                    .col(text_null(Events::Contact))
                    .col(text_null(Events::Summary))
                    .col(text_null(Events::Url))
                    .col(timestamp_with_time_zone(Events::Start))
                    .col(timestamp_with_time_zone(Events::End))
                    .col(text_null(Events::Location))
                    .col(boolean(Events::Featured).default(false))
                    .col(
                        timestamp_with_time_zone(Events::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Events::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always ordered by start; host/featured filters are common.
        manager
            .create_index(
                Index::create()
                    .name("idx_events_start")
                    .table(Events::Table)
                    .col(Events::Start)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_featured")
                    .table(Events::Table)
                    .col(Events::Featured)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER events_touch_updated_at
                    BEFORE UPDATE ON events
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS events_touch_updated_at ON events")
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Events {
    Table,
    Id,
    Title,
    Host,
    Contact,
    Summary,
    Url,
    Start,
    End,
    Location,
    Featured,
    CreatedAt,
    UpdatedAt,
}
