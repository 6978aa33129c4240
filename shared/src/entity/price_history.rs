//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub symbol: String,
    pub timeframe: String,
    #[sea_orm(column_type = "Double")]
    pub open_price: f64,
    #[sea_orm(column_type = "Double")]
    pub high_price: f64,
    #[sea_orm(column_type = "Double")]
    pub low_price: f64,
    #[sea_orm(column_type = "Double")]
    pub close_price: f64,
    #[sea_orm(column_type = "Double")]
    pub volume: f64,
    /// Candle open time
    pub timestamp: DateTimeUtc,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
