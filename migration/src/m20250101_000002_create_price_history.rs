use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PriceHistory::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(PriceHistory::Symbol).string().not_null())
                    .col(ColumnDef::new(PriceHistory::Timeframe).string().not_null())
                    .col(ColumnDef::new(PriceHistory::OpenPrice).double().not_null())
                    .col(ColumnDef::new(PriceHistory::HighPrice).double().not_null())
                    .col(ColumnDef::new(PriceHistory::LowPrice).double().not_null())
                    .col(ColumnDef::new(PriceHistory::ClosePrice).double().not_null())
                    .col(ColumnDef::new(PriceHistory::Volume).double().not_null())
                    .col(ColumnDef::new(PriceHistory::Timestamp).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PriceHistory::CreatedAt).timestamp_with_time_zone().default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_symbol_timeframe")
                    .table(PriceHistory::Table)
                    .col(PriceHistory::Symbol)
                    .col(PriceHistory::Timeframe)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Candles are insert-or-ignore on this triple
        manager
            .create_index(
                Index::create()
                    .name("idx_unique_price")
                    .table(PriceHistory::Table)
                    .col(PriceHistory::Symbol)
                    .col(PriceHistory::Timeframe)
                    .col(PriceHistory::Timestamp)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceHistory {
    Table,
    Id,
    Symbol,
    Timeframe,
    OpenPrice,
    HighPrice,
    LowPrice,
    ClosePrice,
    Volume,
    Timestamp,
    CreatedAt,
}
