//! `SeaORM` Entity, @generated manually

pub mod cryptocurrencies;
pub mod price_history;
