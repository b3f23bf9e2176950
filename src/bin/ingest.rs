// src/bin/ingest.rs
// DOCUMENTATION: Ingestion job entry point
// PURPOSE: Refresh the mosques table from Google Places and write the CSV export

use anyhow::{bail, Context};
use dotenv::dotenv;
use nyc_mosques::config;
use nyc_mosques::db::PgMosqueStore;
use nyc_mosques::services::{export, GooglePlacesClient, IngestService, RetryPolicy};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = nyc_mosques::load_config().map_err(anyhow::Error::msg)?;

    if config.google_places_api_key.is_empty() {
        bail!("GOOGLE_PLACES_API_KEY must be set to run ingestion");
    }

    let pool = config::init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;
    config::ensure_schema(&pool)
        .await
        .context("Failed to prepare database schema")?;

    let store = PgMosqueStore::new(pool);
    let client = GooglePlacesClient::new(config.google_places_api_key.clone());
    let retry = RetryPolicy::new(
        config.ingest_max_attempts,
        Duration::from_millis(config.ingest_backoff_ms),
    );

    let outcome = IngestService::run(&store, &client, &config.ingest_queries, &retry).await;

    log::info!(
        "Inserted/updated {} mosques with top 3 reviews",
        outcome.stats.places_inserted + outcome.stats.places_updated
    );

    export::write_csv(&config.export_path, &outcome.records)
        .with_context(|| format!("Failed to write {}", config.export_path))?;

    if !outcome.stats.is_clean() {
        for error in &outcome.stats.errors {
            log::error!("{}", error);
        }
        log::error!(
            "Ingestion finished with {} errors{}",
            outcome.stats.errors.len(),
            if outcome.stats.aborted { " (aborted)" } else { "" }
        );
        process::exit(1);
    }

    Ok(())
}
