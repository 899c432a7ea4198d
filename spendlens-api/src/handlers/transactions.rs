use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{Period, TransactionsResponse};

use super::{preflight_response, require_token};
use crate::error::ApiError;
use crate::state::AppState;
use crate::summary::summarize;

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    filter: Option<String>,
    access_token: Option<String>,
}

pub async fn get_transactions(
    state: web::Data<AppState>,
    query: web::Query<TransactionsQuery>,
) -> Result<HttpResponse, ApiError> {
    let access_token = require_token(query.access_token.as_deref())?;

    let period = match query.filter.as_deref().map(str::trim) {
        None | Some("") => Period::All,
        Some(filter) => filter.parse::<Period>().map_err(|e| {
            tracing::warn!("Rejecting request: {}", e);
            ApiError::InvalidRequest("Invalid filter".to_string())
        })?,
    };

    if let Some(cached) = state.cache.lookup(period).await {
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(cached));
    }

    let outcome = state
        .fetcher(access_token)
        .fetch(period.lookback_days())
        .await?;
    let summary = summarize(&outcome.parsed, period)?;

    let response = TransactionsResponse {
        summary,
        details: outcome.parsed,
    };
    state.cache.store(period, &response, state.on_demand_ttl).await;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn preflight() -> HttpResponse {
    preflight_response("GET")
}
