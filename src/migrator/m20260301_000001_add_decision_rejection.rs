use sea_orm_migration::prelude::*;

// The reject-decision path writes `rejected`/`rejected_at`; these columns
// were missing from the first schema revision.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(FeedingDecisions::Table)
                    .add_column(
                        ColumnDef::new(FeedingDecisions::Rejected)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(FeedingDecisions::Table)
                    .add_column(ColumnDef::new(FeedingDecisions::RejectedAt).date_time())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(FeedingDecisions::Table)
                    .drop_column(FeedingDecisions::RejectedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(FeedingDecisions::Table)
                    .drop_column(FeedingDecisions::Rejected)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum FeedingDecisions {
    Table,
    Rejected,
    RejectedAt,
}
