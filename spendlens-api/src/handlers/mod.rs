use actix_web::http::Method;
use actix_web::{web, HttpResponse};

use crate::error::ApiError;

pub mod health;
pub mod refresh;
pub mod transactions;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/transactions")
            .route(web::get().to(transactions::get_transactions))
            .route(web::method(Method::OPTIONS).to(transactions::preflight))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/refresh")
            .route(web::get().to(refresh::refresh_cache))
            .route(web::post().to(refresh::refresh_cache))
            .route(web::method(Method::OPTIONS).to(refresh::preflight))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(web::resource("/health").route(web::get().to(health::health)))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::InvalidRequest(err.to_string()).into()
    }));
}

/// Blank or absent tokens are rejected before any other work.
fn require_token(access_token: Option<&str>) -> Result<&str, ApiError> {
    match access_token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::MissingToken),
    }
}

fn preflight_response(allowed_methods: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Methods", allowed_methods))
        .insert_header(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
        .finish()
}

async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
