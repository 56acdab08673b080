use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601150005_create_events"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("events"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("academy_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("event_type"))
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("title")).string().not_null())
                    .col(ColumnDef::new(Alias::new("event_date")).date().not_null())
                    .col(
                        ColumnDef::new(Alias::new("start_time"))
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("end_time"))
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("recurring"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alias::new("weekdays")).json().null())
                    .col(ColumnDef::new(Alias::new("series_end_date")).date().null())
                    .col(ColumnDef::new(Alias::new("parent_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("opponent")).string().null())
                    .col(ColumnDef::new(Alias::new("venue")).string().null())
                    .col(ColumnDef::new(Alias::new("goals_for")).integer().null())
                    .col(ColumnDef::new(Alias::new("goals_against")).integer().null())
                    .col(ColumnDef::new(Alias::new("outcome")).string_len(10).null())
                    .col(
                        ColumnDef::new(Alias::new("created_by"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("events"), Alias::new("academy_id"))
                            .to(Alias::new("academies"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("events"), Alias::new("parent_id"))
                            .to(Alias::new("events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_academy_type")
                    .table(Alias::new("events"))
                    .col(Alias::new("academy_id"))
                    .col(Alias::new("event_type"))
                    .to_owned(),
            )
            .await?;

        // One persisted occurrence per (parent rule, date); repeated
        // materialization must collide here instead of duplicating.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_events_parent_date")
                    .table(Alias::new("events"))
                    .col(Alias::new("parent_id"))
                    .col(Alias::new("event_date"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("events")).to_owned())
            .await
    }
}
