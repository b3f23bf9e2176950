// src/services/ingest_service.rs
// DOCUMENTATION: Google Places ingestion
// PURPOSE: Search each region, fetch details, upsert normalized mosques

use crate::db::MosqueStore;
use crate::errors::MosqueError;
use crate::models::{IngestedMosque, UpsertOutcome};
use crate::services::google_places_client::{to_ingested_mosque, PlacesApi};
use crate::services::RetryPolicy;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Ingestion statistics
/// DOCUMENTATION: Tracks results of one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Region queries that were searched successfully
    pub queries_run: u32,
    /// Logical API calls made (retries not counted)
    pub api_requests: u32,
    /// Candidates returned by text search
    pub places_retrieved: u32,
    /// New records written
    pub places_inserted: u32,
    /// Existing records overwritten
    pub places_updated: u32,
    /// Candidates skipped because a call or the upsert failed
    pub places_failed: u32,
    /// Set when a rate limit survived retries and the run stopped early
    pub aborted: bool,
    /// Error messages encountered
    pub errors: Vec<String>,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self {
            queries_run: 0,
            api_requests: 0,
            places_retrieved: 0,
            places_inserted: 0,
            places_updated: 0,
            places_failed: 0,
            aborted: false,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Mark run as completed
    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }

    /// True when every candidate was stored and no region was skipped
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.errors.is_empty()
    }

    fn record_error(&mut self, message: String) {
        log::warn!("{}", message);
        self.errors.push(message);
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a run: statistics plus every transformed record, in the
/// order it was produced, for the flat-file export
#[derive(Debug)]
pub struct IngestOutcome {
    pub stats: IngestStats,
    pub records: Vec<IngestedMosque>,
}

/// Ingestion service
/// DOCUMENTATION: Strictly sequential: one region at a time, one details
/// call at a time
pub struct IngestService;

impl IngestService {
    /// Run ingestion over the given region queries
    ///
    /// Process:
    /// 1. Text search for each query
    /// 2. Place details for each candidate
    /// 3. Transform (first three reviews kept)
    /// 4. Upsert keyed on place_id
    ///
    /// Each external call runs under `retry`. A failure that survives
    /// retries skips the region or the candidate and is recorded in the
    /// stats; a rate limit that survives retries stops the run.
    pub async fn run(
        store: &dyn MosqueStore,
        api: &dyn PlacesApi,
        queries: &[String],
        retry: &RetryPolicy,
    ) -> IngestOutcome {
        let start_time = Instant::now();
        let mut stats = IngestStats::new();
        let mut records = Vec::new();

        log::info!("Starting ingestion for {} region queries", queries.len());

        'regions: for (idx, query) in queries.iter().enumerate() {
            stats.api_requests += 1;
            let candidates = match retry
                .run("text search", || api.text_search(query))
                .await
            {
                Ok(candidates) => candidates,
                Err(e) => {
                    let rate_limited = matches!(e, MosqueError::RateLimitExceeded);
                    stats.record_error(format!("Search failed for {:?}: {}", query, e));
                    if rate_limited {
                        log::error!("Rate limit exceeded, stopping ingestion");
                        stats.aborted = true;
                        break 'regions;
                    }
                    continue;
                }
            };

            stats.queries_run += 1;
            stats.places_retrieved += candidates.len() as u32;
            log::info!(
                "Region {}/{} {:?}: {} candidates",
                idx + 1,
                queries.len(),
                query,
                candidates.len()
            );

            for candidate in candidates {
                let Some(place_id) = candidate.place_id else {
                    log::warn!(
                        "Skipping search result without place_id: {:?}",
                        candidate.name
                    );
                    continue;
                };

                stats.api_requests += 1;
                let details = match retry
                    .run("place details", || api.place_details(&place_id))
                    .await
                {
                    Ok(details) => details,
                    Err(e) => {
                        stats.places_failed += 1;
                        let rate_limited = matches!(e, MosqueError::RateLimitExceeded);
                        stats.record_error(format!("Details failed for {}: {}", place_id, e));
                        if rate_limited {
                            log::error!("Rate limit exceeded, stopping ingestion");
                            stats.aborted = true;
                            break 'regions;
                        }
                        continue;
                    }
                };

                let mosque = to_ingested_mosque(&details, &place_id);
                log::debug!(
                    "Transformed {} ({} reviews)",
                    mosque.place_id,
                    mosque.reviews.len()
                );

                match store.upsert(&mosque).await {
                    Ok(UpsertOutcome::Inserted) => stats.places_inserted += 1,
                    Ok(UpsertOutcome::Updated) => stats.places_updated += 1,
                    Err(e) => {
                        stats.places_failed += 1;
                        stats.record_error(format!("Failed to store {}: {}", mosque.place_id, e));
                    }
                }

                records.push(mosque);
            }
        }

        let duration = start_time.elapsed().as_secs();
        stats.complete(duration);

        log::info!(
            "Ingestion completed: {} inserted, {} updated, {} failed in {}s",
            stats.places_inserted,
            stats.places_updated,
            stats.places_failed,
            duration
        );

        IngestOutcome { stats, records }
    }
}
