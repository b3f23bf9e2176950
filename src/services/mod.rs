// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod export;
pub mod google_places_client;
pub mod ingest_service;
pub mod mosque_service;
pub mod retry;

pub use google_places_client::{GooglePlacesClient, PlacesApi};
pub use ingest_service::{IngestOutcome, IngestService, IngestStats};
pub use mosque_service::MosqueService;
pub use retry::RetryPolicy;
