use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Ponds
        manager
            .create_table(
                Table::create()
                    .table(Ponds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ponds::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ponds::Name).string().not_null())
                    .col(ColumnDef::new(Ponds::Area).double().not_null())
                    .col(ColumnDef::new(Ponds::Species).string().not_null())
                    .col(ColumnDef::new(Ponds::UserId).integer().not_null())
                    .col(ColumnDef::new(Ponds::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pond-user_id")
                            .from(Ponds::Table, Ponds::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Water quality samples
        manager
            .create_table(
                Table::create()
                    .table(WaterQuality::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaterQuality::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WaterQuality::PondId).integer().not_null())
                    .col(ColumnDef::new(WaterQuality::Temperature).double().not_null())
                    .col(ColumnDef::new(WaterQuality::Ph).double().not_null())
                    .col(
                        ColumnDef::new(WaterQuality::DissolvedOxygen)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WaterQuality::Ammonia).double().not_null())
                    .col(ColumnDef::new(WaterQuality::Turbidity).double())
                    .col(ColumnDef::new(WaterQuality::Conductivity).double())
                    .col(ColumnDef::new(WaterQuality::WaterLevel).double())
                    .col(ColumnDef::new(WaterQuality::Cod).double())
                    .col(ColumnDef::new(WaterQuality::HeavyMetals).double())
                    .col(ColumnDef::new(WaterQuality::ResidualChlorine).double())
                    .col(ColumnDef::new(WaterQuality::TotalPhosphorus).double())
                    .col(ColumnDef::new(WaterQuality::TotalNitrogen).double())
                    .col(ColumnDef::new(WaterQuality::Coliform).double())
                    .col(ColumnDef::new(WaterQuality::Algae).double())
                    .col(ColumnDef::new(WaterQuality::Biotoxicity).double())
                    .col(ColumnDef::new(WaterQuality::Timestamp).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-water_quality-pond_id")
                            .from(WaterQuality::Table, WaterQuality::PondId)
                            .to(Ponds::Table, Ponds::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-water_quality-pond_id-timestamp")
                    .table(WaterQuality::Table)
                    .col(WaterQuality::PondId)
                    .col(WaterQuality::Timestamp)
                    .to_owned(),
            )
            .await?;

        // Feeding records
        manager
            .create_table(
                Table::create()
                    .table(FeedingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedingRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedingRecords::PondId).integer().not_null())
                    .col(ColumnDef::new(FeedingRecords::Amount).double().not_null())
                    .col(ColumnDef::new(FeedingRecords::Time).date_time().not_null())
                    .col(ColumnDef::new(FeedingRecords::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-feeding_record-pond_id")
                            .from(FeedingRecords::Table, FeedingRecords::PondId)
                            .to(Ponds::Table, Ponds::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-feeding_records-pond_id-time")
                    .table(FeedingRecords::Table)
                    .col(FeedingRecords::PondId)
                    .col(FeedingRecords::Time)
                    .to_owned(),
            )
            .await?;

        // Alerts
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::PondId).integer().not_null())
                    .col(ColumnDef::new(Alerts::Level).string().not_null())
                    .col(ColumnDef::new(Alerts::Title).string().not_null())
                    .col(ColumnDef::new(Alerts::Message).text().not_null())
                    .col(ColumnDef::new(Alerts::Timestamp).date_time().not_null())
                    .col(
                        ColumnDef::new(Alerts::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-alert-pond_id")
                            .from(Alerts::Table, Alerts::PondId)
                            .to(Ponds::Table, Ponds::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Feeding decisions
        manager
            .create_table(
                Table::create()
                    .table(FeedingDecisions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedingDecisions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedingDecisions::PondId).integer().not_null())
                    .col(
                        ColumnDef::new(FeedingDecisions::RecommendedAmount)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeedingDecisions::Reasoning).text().not_null())
                    .col(
                        ColumnDef::new(FeedingDecisions::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeedingDecisions::Applied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-feeding_decision-pond_id")
                            .from(FeedingDecisions::Table, FeedingDecisions::PondId)
                            .to(Ponds::Table, Ponds::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeedingDecisions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedingRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WaterQuality::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ponds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ponds {
    Table,
    Id,
    Name,
    Area,
    Species,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WaterQuality {
    Table,
    Id,
    PondId,
    Temperature,
    Ph,
    DissolvedOxygen,
    Ammonia,
    Turbidity,
    Conductivity,
    WaterLevel,
    Cod,
    HeavyMetals,
    ResidualChlorine,
    TotalPhosphorus,
    TotalNitrogen,
    Coliform,
    Algae,
    Biotoxicity,
    Timestamp,
}

#[derive(DeriveIden)]
enum FeedingRecords {
    Table,
    Id,
    PondId,
    Amount,
    Time,
    Notes,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    PondId,
    Level,
    Title,
    Message,
    Timestamp,
    Status,
}

#[derive(DeriveIden)]
enum FeedingDecisions {
    Table,
    Id,
    PondId,
    RecommendedAmount,
    Reasoning,
    CreatedAt,
    Applied,
}
