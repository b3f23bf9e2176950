// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries
// PURPOSE: Abstract store operations from business logic

use crate::errors::MosqueError;
use crate::models::*;
use async_trait::async_trait;
use sqlx::postgres::Postgres;
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Store operations used by the service and the ingestion job
/// DOCUMENTATION: Every method is a single atomic statement against the
/// store; there are no multi-statement transactions
#[async_trait]
pub trait MosqueStore: Send + Sync {
    /// Filtered find, in insertion order
    async fn find(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, MosqueError>;

    /// Exact match on place_id
    async fn find_by_place_id(&self, place_id: &str) -> Result<Option<Mosque>, MosqueError>;

    /// Name and reviews only
    async fn find_reviews(&self, place_id: &str) -> Result<Option<MosqueReviews>, MosqueError>;

    /// Insert a new record; fails with AlreadyExists on a duplicate place_id
    async fn insert(&self, place_id: &str, req: &CreateMosqueRequest) -> Result<(), MosqueError>;

    /// Insert, or overwrite the ingested fields of the record with the same place_id
    async fn upsert(&self, mosque: &IngestedMosque) -> Result<UpsertOutcome, MosqueError>;

    /// Merge the supplied fields; returns false when nothing matched
    async fn update(&self, place_id: &str, req: &UpdateMosqueRequest) -> Result<bool, MosqueError>;

    /// Returns false when nothing matched
    async fn delete(&self, place_id: &str) -> Result<bool, MosqueError>;

    async fn count(&self) -> Result<i64, MosqueError>;
}

const SELECT_MOSQUES: &str = r#"
    SELECT id, place_id, name, address, city, state, zip_code,
           lat, lng, reviews, created_at, updated_at
    FROM mosques
"#;

/// PostgreSQL implementation of MosqueStore
pub struct PgMosqueStore {
    pool: PgPool,
}

impl PgMosqueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wrap a user-supplied string for ILIKE so it matches as a literal substring
/// DOCUMENTATION: Escapes the LIKE metacharacters (backslash is the
/// default escape character in PostgreSQL)
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl MosqueStore for PgMosqueStore {
    async fn find(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, MosqueError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_MOSQUES);
        query.push(" WHERE TRUE");

        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(city) = &filter.city {
            query.push(" AND city ILIKE ").push_bind(like_pattern(city));
        }
        if let Some(state) = &filter.state {
            query.push(" AND state = ").push_bind(state.clone());
        }
        if let Some(zip_code) = &filter.zip_code {
            query.push(" AND zip_code = ").push_bind(zip_code.clone());
        }
        query.push(" ORDER BY created_at, place_id");

        log::debug!("Executing mosque query: {}", query.sql());

        let mosques = query
            .build_query_as::<Mosque>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Mosque query error: {}", e);
                MosqueError::DatabaseError(e.to_string())
            })?;

        Ok(mosques)
    }

    async fn find_by_place_id(&self, place_id: &str) -> Result<Option<Mosque>, MosqueError> {
        let sql = format!("{} WHERE place_id = $1", SELECT_MOSQUES);

        sqlx::query_as::<_, Mosque>(&sql)
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to get mosque {}: {}", place_id, e);
                MosqueError::DatabaseError(e.to_string())
            })
    }

    async fn find_reviews(&self, place_id: &str) -> Result<Option<MosqueReviews>, MosqueError> {
        sqlx::query_as::<_, MosqueReviews>("SELECT name, reviews FROM mosques WHERE place_id = $1")
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to get reviews for {}: {}", place_id, e);
                MosqueError::DatabaseError(e.to_string())
            })
    }

    async fn insert(&self, place_id: &str, req: &CreateMosqueRequest) -> Result<(), MosqueError> {
        sqlx::query(
            r#"
            INSERT INTO mosques (
                id, place_id, name, address, city, state, zip_code,
                lat, lng, reviews, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
            "#,
        )
        .bind(Uuid::new_v4()) // $1
        .bind(place_id) // $2
        .bind(&req.name) // $3
        .bind(&req.address) // $4
        .bind(&req.city) // $5
        .bind(&req.state) // $6
        .bind(&req.zip_code) // $7
        .bind(req.lat) // $8
        .bind(req.lng) // $9
        .bind(Json(&req.reviews)) // $10
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                log::warn!("Duplicate place_id on insert: {}", place_id);
                MosqueError::AlreadyExists(place_id.to_string())
            }
            e => {
                log::error!("Failed to create mosque {}: {}", place_id, e);
                MosqueError::DatabaseError(e.to_string())
            }
        })?;

        log::info!("Created mosque: {}", place_id);
        Ok(())
    }

    async fn upsert(&self, mosque: &IngestedMosque) -> Result<UpsertOutcome, MosqueError> {
        // xmax is zero only for a freshly inserted row version
        let (inserted,): (bool,) = sqlx::query_as(
            r#"
            INSERT INTO mosques (
                id, place_id, name, address, lat, lng, reviews,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            ON CONFLICT (place_id) DO UPDATE
            SET name = EXCLUDED.name,
                address = EXCLUDED.address,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                reviews = EXCLUDED.reviews,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&mosque.place_id)
        .bind(&mosque.name)
        .bind(&mosque.address)
        .bind(mosque.lat)
        .bind(mosque.lng)
        .bind(Json(&mosque.reviews))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert mosque {}: {}", mosque.place_id, e);
            MosqueError::DatabaseError(e.to_string())
        })?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn update(&self, place_id: &str, req: &UpdateMosqueRequest) -> Result<bool, MosqueError> {
        let rows = sqlx::query(
            r#"
            UPDATE mosques
            SET name = COALESCE($1, name),
                address = COALESCE($2, address),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                zip_code = COALESCE($5, zip_code),
                lat = COALESCE($6, lat),
                lng = COALESCE($7, lng),
                reviews = COALESCE($8, reviews),
                updated_at = NOW()
            WHERE place_id = $9
            "#,
        )
        .bind(&req.name)
        .bind(&req.address)
        .bind(&req.city)
        .bind(&req.state)
        .bind(&req.zip_code)
        .bind(req.lat)
        .bind(req.lng)
        .bind(req.reviews.as_ref().map(Json))
        .bind(place_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for mosque {}: {}", place_id, e);
            MosqueError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows > 0 {
            log::info!("Updated mosque: {}", place_id);
        }
        Ok(rows > 0)
    }

    async fn delete(&self, place_id: &str) -> Result<bool, MosqueError> {
        let rows = sqlx::query("DELETE FROM mosques WHERE place_id = $1")
            .bind(place_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for mosque {}: {}", place_id, e);
                MosqueError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows > 0 {
            log::info!("Deleted mosque: {}", place_id);
        }
        Ok(rows > 0)
    }

    async fn count(&self) -> Result<i64, MosqueError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM mosques")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
