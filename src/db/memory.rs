// src/db/memory.rs
// DOCUMENTATION: In-process MosqueStore
// PURPOSE: Same filter, upsert and merge semantics as PgMosqueStore without a database

use crate::db::MosqueStore;
use crate::errors::MosqueError;
use crate::models::*;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records kept in insertion order behind an async lock
#[derive(Default)]
pub struct MemoryMosqueStore {
    mosques: RwLock<Vec<Mosque>>,
}

impl MemoryMosqueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MosqueStore for MemoryMosqueStore {
    async fn find(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, MosqueError> {
        let mosques = self.mosques.read().await;
        Ok(mosques.iter().filter(|m| filter.matches(m)).cloned().collect())
    }

    async fn find_by_place_id(&self, place_id: &str) -> Result<Option<Mosque>, MosqueError> {
        let mosques = self.mosques.read().await;
        Ok(mosques.iter().find(|m| m.place_id == place_id).cloned())
    }

    async fn find_reviews(&self, place_id: &str) -> Result<Option<MosqueReviews>, MosqueError> {
        let mosques = self.mosques.read().await;
        Ok(mosques
            .iter()
            .find(|m| m.place_id == place_id)
            .map(|m| MosqueReviews {
                name: m.name.clone(),
                reviews: m.reviews.clone(),
            }))
    }

    async fn insert(&self, place_id: &str, req: &CreateMosqueRequest) -> Result<(), MosqueError> {
        let mut mosques = self.mosques.write().await;
        if mosques.iter().any(|m| m.place_id == place_id) {
            return Err(MosqueError::AlreadyExists(place_id.to_string()));
        }

        let now = Utc::now();
        mosques.push(Mosque {
            id: Uuid::new_v4(),
            place_id: place_id.to_string(),
            name: Some(req.name.clone()),
            address: req.address.clone(),
            city: req.city.clone(),
            state: req.state.clone(),
            zip_code: req.zip_code.clone(),
            lat: req.lat,
            lng: req.lng,
            reviews: Json(req.reviews.clone()),
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn upsert(&self, mosque: &IngestedMosque) -> Result<UpsertOutcome, MosqueError> {
        let mut mosques = self.mosques.write().await;
        let now = Utc::now();

        if let Some(existing) = mosques.iter_mut().find(|m| m.place_id == mosque.place_id) {
            existing.name = mosque.name.clone();
            existing.address = mosque.address.clone();
            existing.lat = mosque.lat;
            existing.lng = mosque.lng;
            existing.reviews = Json(mosque.reviews.clone());
            existing.updated_at = now;
            return Ok(UpsertOutcome::Updated);
        }

        mosques.push(Mosque {
            id: Uuid::new_v4(),
            place_id: mosque.place_id.clone(),
            name: mosque.name.clone(),
            address: mosque.address.clone(),
            city: None,
            state: None,
            zip_code: None,
            lat: mosque.lat,
            lng: mosque.lng,
            reviews: Json(mosque.reviews.clone()),
            created_at: now,
            updated_at: now,
        });
        Ok(UpsertOutcome::Inserted)
    }

    async fn update(&self, place_id: &str, req: &UpdateMosqueRequest) -> Result<bool, MosqueError> {
        let mut mosques = self.mosques.write().await;
        match mosques.iter_mut().find(|m| m.place_id == place_id) {
            Some(existing) => {
                req.apply_to(existing);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, place_id: &str) -> Result<bool, MosqueError> {
        let mut mosques = self.mosques.write().await;
        let before = mosques.len();
        mosques.retain(|m| m.place_id != place_id);
        Ok(mosques.len() < before)
    }

    async fn count(&self) -> Result<i64, MosqueError> {
        Ok(self.mosques.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingested(place_id: &str, name: &str) -> IngestedMosque {
        IngestedMosque {
            place_id: place_id.to_string(),
            name: Some(name.to_string()),
            address: Some("1 Main St".to_string()),
            lat: Some(40.7),
            lng: Some(-73.9),
            reviews: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = MemoryMosqueStore::new();

        let outcome = store.upsert(&ingested("p1", "First")).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let outcome = store.upsert(&ingested("p1", "Renamed")).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.find_by_place_id("p1").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_upsert_leaves_service_only_fields_untouched() {
        let store = MemoryMosqueStore::new();
        store.upsert(&ingested("p1", "First")).await.unwrap();
        store
            .update(
                "p1",
                &UpdateMosqueRequest {
                    city: Some("Queens".to_string()),
                    zip_code: Some("11432".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        store.upsert(&ingested("p1", "Again")).await.unwrap();

        let stored = store.find_by_place_id("p1").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Again"));
        assert_eq!(stored.city.as_deref(), Some("Queens"));
        assert_eq!(stored.zip_code.as_deref(), Some("11432"));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_place_id() {
        let store = MemoryMosqueStore::new();
        let req = CreateMosqueRequest {
            name: "Masjid".to_string(),
            ..Default::default()
        };

        store.insert("dup", &req).await.unwrap();
        let err = store.insert("dup", &req).await.unwrap_err();
        assert!(matches!(err, MosqueError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_records() {
        let store = MemoryMosqueStore::new();
        store.upsert(&ingested("keep", "Keep")).await.unwrap();

        assert!(!store.delete("missing").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.delete("keep").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
