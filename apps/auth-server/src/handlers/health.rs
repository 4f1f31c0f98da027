//! Health check handler.

use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// GET /api/health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
