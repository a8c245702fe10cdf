use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tasks table
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Tasks::Title))
                    .col(ColumnDef::new(Tasks::Description).string_len(1000).null())
                    .col(timestamp_null(Tasks::DueDate))
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string()
                            .not_null()
                            .default("TODO"),
                    )
                    .col(ColumnDef::new(Tasks::Remarks).string_len(500).null())
                    .col(timestamp(Tasks::CreatedOn))
                    .col(timestamp(Tasks::LastUpdatedOn))
                    .col(string(Tasks::CreatedBy))
                    .col(string(Tasks::LastUpdatedBy))
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_status")
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_title")
                    .table(Tasks::Table)
                    .col(Tasks::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    DueDate,
    Status,
    Remarks,
    CreatedOn,
    LastUpdatedOn,
    CreatedBy,
    LastUpdatedBy,
}
