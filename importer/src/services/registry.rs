//! Asset registry writer

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait, TransactionTrait};
use shared::entity::cryptocurrencies;
use shared::{AssetListing, SPOT_MARKET};
use tracing::{error, info};

use crate::ImportError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub upserted: usize,
    /// Symbols whose upsert failed; their stored metadata is left as it was
    pub failed: Vec<String>,
}

/// Upserts every listing keyed on `symbol`.
///
/// New symbols are inserted as active spot assets. Existing ones get `name`,
/// `image_url` and `active` refreshed while every other column is kept. Each
/// upsert runs in its own savepoint so a failure is contained to that asset.
pub async fn reconcile<C>(db: &C, listings: &[AssetListing]) -> ReconcileReport
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut report = ReconcileReport::default();

    for listing in listings {
        match upsert_asset(db, listing).await {
            Ok(()) => report.upserted += 1,
            Err(e) => {
                error!("{}", e.display_chain());
                report.failed.push(listing.symbol.clone());
            }
        }
    }

    info!(
        "Reconciled {} assets ({} failed)",
        report.upserted,
        report.failed.len()
    );
    report
}

async fn upsert_asset<C>(db: &C, listing: &AssetListing) -> Result<(), ImportError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let failure = |source: DbErr| ImportError::RegistryWriteFailure {
        symbol: listing.symbol.clone(),
        source,
    };

    // Timestamps only land on insert; an existing row keeps its own
    let now = Utc::now();
    let asset = cryptocurrencies::ActiveModel {
        symbol: ActiveValue::Set(listing.symbol.clone()),
        name: ActiveValue::Set(listing.name.clone()),
        market_type: ActiveValue::Set(SPOT_MARKET.to_string()),
        image_url: ActiveValue::Set(Some(listing.image_url.clone())),
        active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(Some(now)),
        updated_at: ActiveValue::Set(Some(now)),
        ..Default::default()
    };

    let savepoint = db.begin().await.map_err(failure)?;
    let result = cryptocurrencies::Entity::insert(asset)
        .on_conflict(
            OnConflict::column(cryptocurrencies::Column::Symbol)
                .update_columns([
                    cryptocurrencies::Column::Name,
                    cryptocurrencies::Column::ImageUrl,
                    cryptocurrencies::Column::Active,
                ])
                .to_owned(),
        )
        .exec_without_returning(&savepoint)
        .await;

    match result {
        Ok(_) => savepoint.commit().await.map_err(failure),
        Err(e) => {
            savepoint.rollback().await.ok();
            Err(failure(e))
        }
    }
}
