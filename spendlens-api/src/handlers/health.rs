use actix_web::{web, HttpResponse};

use crate::state::AppState;

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    if state.cache.is_healthy().await {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "cache": "connected"
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "cache": "disconnected"
        }))
    }
}
