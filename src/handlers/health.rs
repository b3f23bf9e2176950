// src/handlers/health.rs
// DOCUMENTATION: Health check and landing handlers
// PURPOSE: Simple endpoints to verify service status

use crate::db::MosqueStore;
use crate::errors::MosqueError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Welcome to NYC Mosques API" }))
}

/// Reports the record count, which also proves the store is reachable
pub async fn health_check(
    store: web::Data<dyn MosqueStore>,
) -> Result<impl Responder, MosqueError> {
    let mosques = store.count().await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "nyc-mosques",
        "version": env!("CARGO_PKG_VERSION"),
        "mosques": mosques
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health_check));
}
