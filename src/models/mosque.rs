// src/models/mosque.rs
// DOCUMENTATION: Core data structures for mosque records
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::review::Review;

/// Represents a complete mosque record from the database
/// DOCUMENTATION: Maps directly to the mosques table in PostgreSQL
/// Never serialized to callers as-is; see MosqueResponse
#[derive(Debug, Clone, FromRow)]
pub struct Mosque {
    /// Internal store identifier, not exposed through the API
    pub id: Uuid,

    /// Google Places identifier - the key for every lookup and upsert
    pub place_id: String,

    /// Mosque name (may be missing for ingested records)
    pub name: Option<String>,

    /// Formatted street address
    pub address: Option<String>,

    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    pub lat: Option<f64>,
    pub lng: Option<f64>,

    /// Up to MAX_REVIEWS review summaries, stored as JSONB
    pub reviews: Json<Vec<Review>>,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Canonical response DTO
/// DOCUMENTATION: Absent optional fields serialize as null
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MosqueResponse {
    pub place_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub reviews: Vec<Review>,
}

impl Mosque {
    /// Convert Mosque to MosqueResponse for API
    pub fn to_response(&self) -> MosqueResponse {
        MosqueResponse {
            place_id: self.place_id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            lat: self.lat,
            lng: self.lng,
            reviews: self.reviews.0.clone(),
        }
    }
}

/// Request DTO for POST /mosque
/// DOCUMENTATION: Only `name` is required. When `place_id` is omitted the
/// service generates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateMosqueRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub place_id: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,

    #[serde(default)]
    #[validate(length(max = 3))]
    pub reviews: Vec<Review>,
}

/// Request DTO for PATCH /mosque/{place_id}
/// DOCUMENTATION: Merge semantics - only fields present (and non-null)
/// in the body are written; everything else on the record is kept.
/// `place_id` cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMosqueRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,

    #[validate(length(max = 3))]
    pub reviews: Option<Vec<Review>>,
}

impl UpdateMosqueRequest {
    /// True when the body names no field at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
            && self.lat.is_none()
            && self.lng.is_none()
            && self.reviews.is_none()
    }

    /// Merge the supplied fields onto a record
    pub fn apply_to(&self, mosque: &mut Mosque) {
        if let Some(name) = &self.name {
            mosque.name = Some(name.clone());
        }
        if let Some(address) = &self.address {
            mosque.address = Some(address.clone());
        }
        if let Some(city) = &self.city {
            mosque.city = Some(city.clone());
        }
        if let Some(state) = &self.state {
            mosque.state = Some(state.clone());
        }
        if let Some(zip_code) = &self.zip_code {
            mosque.zip_code = Some(zip_code.clone());
        }
        if let Some(lat) = self.lat {
            mosque.lat = Some(lat);
        }
        if let Some(lng) = self.lng {
            mosque.lng = Some(lng);
        }
        if let Some(reviews) = &self.reviews {
            mosque.reviews = Json(reviews.clone());
        }
        mosque.updated_at = Utc::now();
    }
}

/// Record produced by the ingestion job from a Place Details response
/// DOCUMENTATION: Exactly the fields an upsert overwrites; city, state
/// and zip_code are never touched by ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedMosque {
    pub place_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub reviews: Vec<Review>,
}

/// Result of an upsert keyed on place_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Projection used by GET /reviews/{place_id}
#[derive(Debug, Clone, FromRow)]
pub struct MosqueReviews {
    pub name: Option<String>,
    pub reviews: Json<Vec<Review>>,
}

/// Query parameters for GET /mosques
/// DOCUMENTATION: `name` and `city` match case-insensitive substrings,
/// `state` and `zip_code` match exactly. Present fields are AND-combined.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MosqueFilter {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl MosqueFilter {
    /// Filter on name only, used by GET /search
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Drop empty parameters so `?city=` imposes no constraint
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            name: keep(self.name),
            city: keep(self.city),
            state: keep(self.state),
            zip_code: keep(self.zip_code),
        }
    }

    /// Evaluate the filter against an in-memory record
    pub fn matches(&self, mosque: &Mosque) -> bool {
        contains_ignore_case(mosque.name.as_deref(), self.name.as_deref())
            && contains_ignore_case(mosque.city.as_deref(), self.city.as_deref())
            && equals(mosque.state.as_deref(), self.state.as_deref())
            && equals(mosque.zip_code.as_deref(), self.zip_code.as_deref())
    }
}

fn contains_ignore_case(stored: Option<&str>, needle: Option<&str>) -> bool {
    match (stored, needle) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(stored), Some(needle)) => stored.to_lowercase().contains(&needle.to_lowercase()),
    }
}

fn equals(stored: Option<&str>, expected: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => stored == Some(expected),
    }
}

/// Query parameters for GET /search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// Response for list and search endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MosqueListResponse {
    pub count: usize,
    pub data: Vec<MosqueResponse>,
}

impl MosqueListResponse {
    pub fn from_mosques(mosques: &[Mosque]) -> Self {
        Self {
            count: mosques.len(),
            data: mosques.iter().map(Mosque::to_response).collect(),
        }
    }
}
