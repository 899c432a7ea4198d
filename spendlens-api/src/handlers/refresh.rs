use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{Period, RefreshResponse, TransactionsResponse};

use super::{preflight_response, require_token};
use crate::error::ApiError;
use crate::state::AppState;
use crate::summary::summarize;

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    access_token: Option<String>,
}

/// Re-fetches the daily, weekly and monthly windows one after another and
/// caches each under its own key. The first failure aborts the rest.
pub async fn refresh_cache(
    state: web::Data<AppState>,
    query: web::Query<RefreshQuery>,
) -> Result<HttpResponse, ApiError> {
    let access_token = require_token(query.access_token.as_deref())?;
    let fetcher = state.fetcher(access_token);

    for period in Period::REFRESHED {
        let outcome = fetcher.fetch(period.lookback_days()).await?;
        let summary = summarize(&outcome.parsed, period)?;

        let response = TransactionsResponse {
            summary,
            details: outcome.parsed,
        };
        state.cache.store(period, &response, state.refresh_ttl).await;
        tracing::info!("Refreshed {} transactions", period);
    }

    Ok(HttpResponse::Ok().json(RefreshResponse { success: true }))
}

pub async fn preflight() -> HttpResponse {
    preflight_response("GET,POST")
}
