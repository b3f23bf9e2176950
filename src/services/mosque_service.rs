// src/services/mosque_service.rs
// DOCUMENTATION: Business logic for mosque records
// PURPOSE: Intermediary between handlers and the store

use crate::db::MosqueStore;
use crate::errors::MosqueError;
use crate::models::{
    CreateMosqueRequest, MosqueFilter, MosqueListResponse, MosqueResponse, ReviewsResponse,
    UpdateMosqueRequest,
};
use uuid::Uuid;
use validator::Validate;

pub struct MosqueService;

impl MosqueService {
    /// List mosques matching every supplied filter
    pub async fn list(
        store: &dyn MosqueStore,
        filter: MosqueFilter,
    ) -> Result<MosqueListResponse, MosqueError> {
        let filter = filter.normalized();
        let mosques = store.find(&filter).await?;
        log::debug!("List query matched {} mosques", mosques.len());
        Ok(MosqueListResponse::from_mosques(&mosques))
    }

    /// Case-insensitive substring search on name
    pub async fn search_by_name(
        store: &dyn MosqueStore,
        name: &str,
    ) -> Result<MosqueListResponse, MosqueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MosqueError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }

        let mosques = store.find(&MosqueFilter::by_name(name)).await?;
        Ok(MosqueListResponse::from_mosques(&mosques))
    }

    pub async fn get(store: &dyn MosqueStore, place_id: &str) -> Result<MosqueResponse, MosqueError> {
        store
            .find_by_place_id(place_id)
            .await?
            .map(|mosque| mosque.to_response())
            .ok_or_else(|| MosqueError::NotFound(place_id.to_string()))
    }

    pub async fn reviews(
        store: &dyn MosqueStore,
        place_id: &str,
    ) -> Result<ReviewsResponse, MosqueError> {
        let projection = store
            .find_reviews(place_id)
            .await?
            .ok_or_else(|| MosqueError::NotFound(place_id.to_string()))?;

        Ok(ReviewsResponse::new(
            place_id,
            projection.name,
            projection.reviews.0,
        ))
    }

    /// Create a mosque; returns its place_id
    /// DOCUMENTATION: A place_id is generated when the caller omits one
    pub async fn create(
        store: &dyn MosqueStore,
        req: CreateMosqueRequest,
    ) -> Result<String, MosqueError> {
        req.validate()
            .map_err(|e| MosqueError::ValidationError(e.to_string()))?;

        let place_id = req
            .place_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        store.insert(&place_id, &req).await?;
        Ok(place_id)
    }

    /// Merge the supplied fields onto an existing mosque
    pub async fn update(
        store: &dyn MosqueStore,
        place_id: &str,
        req: UpdateMosqueRequest,
    ) -> Result<(), MosqueError> {
        if req.is_empty() {
            return Err(MosqueError::ValidationError(
                "update body names no fields".to_string(),
            ));
        }
        req.validate()
            .map_err(|e| MosqueError::ValidationError(e.to_string()))?;

        if !store.update(place_id, &req).await? {
            log::warn!("Update for unknown mosque: {}", place_id);
            return Err(MosqueError::NotFound(place_id.to_string()));
        }
        Ok(())
    }

    pub async fn delete(store: &dyn MosqueStore, place_id: &str) -> Result<(), MosqueError> {
        if !store.delete(place_id).await? {
            log::warn!("Delete for unknown mosque: {}", place_id);
            return Err(MosqueError::NotFound(place_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryMosqueStore;
    use crate::models::Review;

    fn create_request(name: &str, city: &str) -> CreateMosqueRequest {
        CreateMosqueRequest {
            name: name.to_string(),
            address: Some("1 Main St".to_string()),
            city: Some(city.to_string()),
            state: Some("NY".to_string()),
            zip_code: Some("11217".to_string()),
            lat: Some(40.68),
            lng: Some(-73.97),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_supplied_fields() {
        let store = MemoryMosqueStore::new();
        let req = CreateMosqueRequest {
            name: "Masjid At-Taqwa".to_string(),
            place_id: Some("taqwa".to_string()),
            city: Some("Brooklyn".to_string()),
            ..Default::default()
        };

        let place_id = MosqueService::create(&store, req).await.unwrap();
        assert_eq!(place_id, "taqwa");

        let mosque = MosqueService::get(&store, "taqwa").await.unwrap();
        assert_eq!(mosque.name.as_deref(), Some("Masjid At-Taqwa"));
        assert_eq!(mosque.city.as_deref(), Some("Brooklyn"));
        assert!(mosque.address.is_none());
        assert!(mosque.state.is_none());
        assert!(mosque.lat.is_none());
        assert!(mosque.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_create_generates_place_id() {
        let store = MemoryMosqueStore::new();
        let place_id = MosqueService::create(&store, create_request("Masjid", "Queens"))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&place_id).is_ok());
        assert!(MosqueService::get(&store, &place_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let store = MemoryMosqueStore::new();
        let err = MosqueService::create(&store, create_request("", "Queens"))
            .await
            .unwrap_err();
        assert!(matches!(err, MosqueError::ValidationError(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_case_insensitively() {
        let store = MemoryMosqueStore::new();
        MosqueService::create(&store, create_request("Masjid Al-Farooq", "Brooklyn"))
            .await
            .unwrap();
        MosqueService::create(&store, create_request("Jamaica Muslim Center", "Queens"))
            .await
            .unwrap();

        for city in ["brooklyn", "BROOK"] {
            let result = MosqueService::list(
                &store,
                MosqueFilter {
                    city: Some(city.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            assert_eq!(result.count, 1);
            assert_eq!(result.data[0].name.as_deref(), Some("Masjid Al-Farooq"));
        }

        let all = MosqueService::list(&store, MosqueFilter::default()).await.unwrap();
        assert_eq!(all.count, 2);
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let store = MemoryMosqueStore::new();
        MosqueService::create(&store, create_request("Masjid Al-Farooq", "Brooklyn"))
            .await
            .unwrap();

        let found = MosqueService::search_by_name(&store, "farooq").await.unwrap();
        assert_eq!(found.count, 1);

        let err = MosqueService::search_by_name(&store, "  ").await.unwrap_err();
        assert!(matches!(err, MosqueError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = MemoryMosqueStore::new();
        let place_id = MosqueService::create(&store, create_request("Old", "Bronx"))
            .await
            .unwrap();

        MosqueService::update(
            &store,
            &place_id,
            UpdateMosqueRequest {
                name: Some("New".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mosque = MosqueService::get(&store, &place_id).await.unwrap();
        assert_eq!(mosque.name.as_deref(), Some("New"));
        assert_eq!(mosque.address.as_deref(), Some("1 Main St"));
        assert_eq!(mosque.lat, Some(40.68));
        assert_eq!(mosque.lng, Some(-73.97));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_report_not_found() {
        let store = MemoryMosqueStore::new();
        MosqueService::create(&store, create_request("Keep", "Bronx"))
            .await
            .unwrap();

        let err = MosqueService::update(
            &store,
            "missing",
            UpdateMosqueRequest {
                city: Some("Queens".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MosqueError::NotFound(_)));

        let err = MosqueService::delete(&store, "missing").await.unwrap_err();
        assert!(matches!(err, MosqueError::NotFound(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reviews_projection() {
        let store = MemoryMosqueStore::new();
        let mut req = create_request("Masjid", "Queens");
        req.place_id = Some("rev".to_string());
        req.reviews = vec![
            Review {
                author: Some("Yusuf".to_string()),
                rating: Some(5),
                text: Some("Welcoming".to_string()),
                time: Some("3 months ago".to_string()),
            };
            2
        ];
        MosqueService::create(&store, req).await.unwrap();

        let reviews = MosqueService::reviews(&store, "rev").await.unwrap();
        assert_eq!(reviews.mosque.as_deref(), Some("Masjid"));
        assert_eq!(reviews.place_id, "rev");
        assert_eq!(reviews.review_count, 2);

        let err = MosqueService::reviews(&store, "none").await.unwrap_err();
        assert!(matches!(err, MosqueError::NotFound(_)));
    }
}
