// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Text search and place details calls used by the ingestion job

use crate::errors::MosqueError;
use crate::models::{truncate_reviews, IngestedMosque, Review};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Field mask requested from the details endpoint
pub const DETAILS_FIELDS: &str = "name,formatted_address,geometry,place_id,reviews";

/// The two upstream operations ingestion depends on
/// DOCUMENTATION: Implemented by GooglePlacesClient; tests substitute a fake
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Free-text search, e.g. "mosques in Queens, NYC"
    async fn text_search(&self, query: &str) -> Result<Vec<GooglePlaceSummary>, MosqueError>;

    /// Details for one place, restricted to DETAILS_FIELDS
    async fn place_details(&self, place_id: &str) -> Result<GooglePlaceDetails, MosqueError>;
}

/// Google Places API client
/// DOCUMENTATION: Handles authentication and API calls to Google Places
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API
    base_url: String,
}

/// Response from Google Places Text Search
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    #[serde(default)]
    pub results: Vec<GooglePlaceSummary>,
    pub status: String,
    pub error_message: Option<String>,
}

/// Search result entry; only the identifier is used
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GooglePlaceSummary {
    pub place_id: Option<String>,
    pub name: Option<String>,
}

/// Response from Google Place Details
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub result: Option<GooglePlaceDetails>,
    pub status: String,
    pub error_message: Option<String>,
}

/// Place details restricted to DETAILS_FIELDS
/// DOCUMENTATION: Every field is optional; a missing field becomes an
/// absent value on the record, never an error
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GooglePlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<GoogleGeometry>,
    #[serde(default)]
    pub reviews: Vec<GoogleReview>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GoogleGeometry {
    pub location: Option<GoogleLocation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GoogleLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Review from Google Places
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GoogleReview {
    pub author_name: Option<String>,
    pub rating: Option<i32>,
    pub text: Option<String>,
    /// Relative time description (e.g., "a month ago")
    pub relative_time_description: Option<String>,
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://maps.googleapis.com/maps/api/place".to_string())
    }

    /// Client pointed at another host serving the same API
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// GET a Places endpoint and decode the JSON body
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MosqueError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Places {} request failed: {}", endpoint, e);
                MosqueError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Places API error {}: {}", status, body);
            return Err(MosqueError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to parse Google Places {} response: {}", endpoint, e);
            MosqueError::ExternalApiError(format!("Parse error: {}", e))
        })
    }
}

/// Map an upstream status string to success or a classified error
/// DOCUMENTATION: OVER_QUERY_LIMIT is retryable, requests the service
/// refuses are not, anything unknown is treated as transient
pub fn check_status(status: &str, error_message: Option<String>) -> Result<(), MosqueError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => {
            log::error!("Google Places API quota exceeded");
            Err(MosqueError::RateLimitExceeded)
        }
        "REQUEST_DENIED" | "INVALID_REQUEST" | "NOT_FOUND" => {
            let msg = error_message.unwrap_or_else(|| status.to_string());
            log::error!("Google Places API request rejected: {}", msg);
            Err(MosqueError::ExternalApiRejected(msg))
        }
        other => {
            let msg = error_message.unwrap_or_else(|| format!("Unknown status: {}", other));
            log::error!("Google Places API unexpected status: {}", msg);
            Err(MosqueError::ExternalApiError(msg))
        }
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn text_search(&self, query: &str) -> Result<Vec<GooglePlaceSummary>, MosqueError> {
        log::debug!("Google Places text search: {}", query);

        let response: TextSearchResponse =
            self.get_json("textsearch", &[("query", query)]).await?;
        check_status(&response.status, response.error_message)?;

        log::info!(
            "Text search {:?} returned {} results",
            query,
            response.results.len()
        );
        Ok(response.results)
    }

    async fn place_details(&self, place_id: &str) -> Result<GooglePlaceDetails, MosqueError> {
        log::debug!("Google Places details lookup: place_id={}", place_id);

        let response: DetailsResponse = self
            .get_json(
                "details",
                &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
            )
            .await?;
        check_status(&response.status, response.error_message)?;

        response.result.ok_or_else(|| {
            MosqueError::ExternalApiRejected(format!("No details returned for {}", place_id))
        })
    }
}

/// Convert a details payload into the record the ingestion job upserts
/// DOCUMENTATION: Keeps the first three reviews; falls back to the search
/// candidate's identifier when details omit place_id
pub fn to_ingested_mosque(details: &GooglePlaceDetails, candidate_place_id: &str) -> IngestedMosque {
    let location = details
        .geometry
        .as_ref()
        .and_then(|geometry| geometry.location.as_ref());

    let reviews = details
        .reviews
        .iter()
        .map(|review| Review {
            author: review.author_name.clone(),
            rating: review.rating,
            text: review.text.clone(),
            time: review.relative_time_description.clone(),
        })
        .collect();

    IngestedMosque {
        place_id: details
            .place_id
            .clone()
            .unwrap_or_else(|| candidate_place_id.to_string()),
        name: details.name.clone(),
        address: details.formatted_address.clone(),
        lat: location.and_then(|l| l.lat),
        lng: location.and_then(|l| l.lng),
        reviews: truncate_reviews(reviews),
    }
}
