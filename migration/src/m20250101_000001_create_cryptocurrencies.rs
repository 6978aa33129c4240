use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cryptocurrencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cryptocurrencies::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Cryptocurrencies::Symbol).string().not_null())
                    .col(ColumnDef::new(Cryptocurrencies::Name).string().not_null())
                    .col(ColumnDef::new(Cryptocurrencies::MarketType).string().not_null().default("Spot"))
                    .col(ColumnDef::new(Cryptocurrencies::ImageUrl).text().null())
                    .col(ColumnDef::new(Cryptocurrencies::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Cryptocurrencies::CreatedAt).timestamp_with_time_zone().default(Expr::current_timestamp()))
                    .col(ColumnDef::new(Cryptocurrencies::UpdatedAt).timestamp_with_time_zone().default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Conflict target of the registry upsert
        manager
            .create_index(
                Index::create()
                    .name("idx_cryptocurrencies_symbol")
                    .table(Cryptocurrencies::Table)
                    .col(Cryptocurrencies::Symbol)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cryptocurrencies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
    Symbol,
    Name,
    MarketType,
    ImageUrl,
    Active,
    CreatedAt,
    UpdatedAt,
}
