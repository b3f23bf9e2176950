// src/handlers/mosques.rs
// DOCUMENTATION: HTTP handlers for mosque operations
// PURPOSE: Parse requests, call services, return responses

use crate::db::MosqueStore;
use crate::errors::MosqueError;
use crate::models::{CreateMosqueRequest, MosqueFilter, SearchQuery, UpdateMosqueRequest};
use crate::services::MosqueService;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// GET /mosques
/// List mosques, optionally filtered by name, city, state, zip_code
pub async fn list_mosques(
    store: web::Data<dyn MosqueStore>,
    query: web::Query<MosqueFilter>,
) -> Result<impl Responder, MosqueError> {
    let result = MosqueService::list(store.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /search?name=
pub async fn search_mosques(
    store: web::Data<dyn MosqueStore>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, MosqueError> {
    let result = MosqueService::search_by_name(store.get_ref(), &query.name).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /mosque/{place_id}
pub async fn get_mosque(
    store: web::Data<dyn MosqueStore>,
    path: web::Path<String>,
) -> Result<impl Responder, MosqueError> {
    let mosque = MosqueService::get(store.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(mosque))
}

/// GET /reviews/{place_id}
pub async fn get_reviews(
    store: web::Data<dyn MosqueStore>,
    path: web::Path<String>,
) -> Result<impl Responder, MosqueError> {
    let reviews = MosqueService::reviews(store.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /mosque
pub async fn create_mosque(
    store: web::Data<dyn MosqueStore>,
    req: web::Json<CreateMosqueRequest>,
) -> Result<impl Responder, MosqueError> {
    let place_id = MosqueService::create(store.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Mosque added successfully",
        "place_id": place_id,
    })))
}

/// PATCH /mosque/{place_id}
pub async fn update_mosque(
    store: web::Data<dyn MosqueStore>,
    path: web::Path<String>,
    req: web::Json<UpdateMosqueRequest>,
) -> Result<impl Responder, MosqueError> {
    MosqueService::update(store.get_ref(), &path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Mosque updated successfully" })))
}

/// DELETE /mosque/{place_id}
pub async fn delete_mosque(
    store: web::Data<dyn MosqueStore>,
    path: web::Path<String>,
) -> Result<impl Responder, MosqueError> {
    MosqueService::delete(store.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Mosque deleted successfully" })))
}

/// Body and query-string parse failures get the same JSON error shape as
/// every other 4xx
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON body on {}: {}", req.path(), err);
    MosqueError::InvalidInput(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query string on {}: {}", req.path(), err);
    MosqueError::InvalidInput(err.to_string()).into()
}

/// Configuration for mosque routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));

    cfg.route("/mosques", web::get().to(list_mosques))
        .route("/search", web::get().to(search_mosques))
        .route("/reviews/{place_id}", web::get().to(get_reviews))
        .route("/mosque", web::post().to(create_mosque))
        .service(
            web::resource("/mosque/{place_id}")
                .route(web::get().to(get_mosque))
                .route(web::patch().to(update_mosque))
                .route(web::delete().to(delete_mosque)),
        );
}
