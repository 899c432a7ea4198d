use anyhow::{Context, Result};
use async_trait::async_trait;
use extractors::MessagePart;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GmailConfig;

/// Upper bound on list pages read for one search (Gmail pages hold up to 100 ids).
const MAX_LIST_PAGES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {message}")]
    Unauthorized { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProviderError {
    /// 401 and 403 both mean the token is unusable for reading mail.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProviderError::Unauthorized { status, message },
            _ => ProviderError::Status { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderError::Unauthorized { .. })
    }
}

/// Read access to one user's mailbox
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Ids of all messages matching a provider search query, in provider order.
    async fn list_message_ids(&self, query: &str) -> Result<Vec<String>, ProviderError>;

    /// Full message including its MIME payload.
    async fn get_message(&self, id: &str) -> Result<GmailMessage, ProviderError>;
}

/// Builds a mailbox client for the access token a request carries
pub trait MailProviderFactory: Send + Sync {
    fn for_token(&self, access_token: &str) -> Arc<dyn MailProvider>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// Gmail REST client bound to a single bearer token
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), error_message(status, &body)));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_message_ids(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/users/me/messages", self.base_url);
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages_read = 0;

        loop {
            let page: ListMessagesResponse = {
                let mut params = vec![("q", query)];
                if let Some(token) = page_token.as_deref() {
                    params.push(("pageToken", token));
                }
                self.get_json(&url, &params).await?
            };
            ids.extend(page.messages.into_iter().map(|m| m.id));
            pages_read += 1;

            match next_page_token(page_token.as_deref(), page.next_page_token, pages_read) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Gmail search {:?} matched {} messages", query, ids.len());
        Ok(ids)
    }

    async fn get_message(&self, id: &str) -> Result<GmailMessage, ProviderError> {
        let url = format!("{}/users/me/messages/{}", self.base_url, id);
        self.get_json(&url, &[("format", "full")]).await
    }
}

/// Shares one HTTP connection pool across the per-request Gmail clients
pub struct GmailClientFactory {
    http: reqwest::Client,
    base_url: String,
}

impl GmailClientFactory {
    pub fn new(config: &GmailConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build Gmail HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }
}

impl MailProviderFactory for GmailClientFactory {
    fn for_token(&self, access_token: &str) -> Arc<dyn MailProvider> {
        Arc::new(GmailClient::new(self.http.clone(), &self.base_url, access_token))
    }
}

/// Token for the next list page, or `None` once listing should stop.
///
/// Stops on a missing or repeated token and after `MAX_LIST_PAGES` pages.
fn next_page_token(current: Option<&str>, next: Option<String>, pages_read: usize) -> Option<String> {
    let next = next.filter(|token| !token.is_empty())?;
    if current == Some(next.as_str()) {
        tracing::warn!("Gmail returned the same page token twice, stopping");
        return None;
    }
    if pages_read >= MAX_LIST_PAGES {
        tracing::warn!("Gmail search exceeded {} pages, truncating", MAX_LIST_PAGES);
        return None;
    }
    Some(next)
}

/// Pulls `error.message` out of a Google API error body, falling back to the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_are_unauthorized() {
        assert!(ProviderError::from_status(401, "Invalid Credentials").is_unauthorized());
        assert!(ProviderError::from_status(403, "Insufficient Permission").is_unauthorized());
        assert!(!ProviderError::from_status(500, "Backend Error").is_unauthorized());
        assert!(!ProviderError::from_status(429, "Rate Limit Exceeded").is_unauthorized());
    }

    #[test]
    fn test_google_error_body_message() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, body),
            "Request had invalid authentication credentials."
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>"), "Bad Gateway");
    }

    #[test]
    fn test_list_page_deserialization() {
        let json = r#"{
            "messages": [{"id": "18c1", "threadId": "18c1"}, {"id": "18c0", "threadId": "18bf"}],
            "nextPageToken": "abc",
            "resultSizeEstimate": 2
        }"#;
        let page: ListMessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.messages.len(), 2);
        assert_eq!(page.messages[0].id, "18c1");
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let empty: ListMessagesResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(empty.messages.is_empty());
        assert!(empty.next_page_token.is_none());
    }

    #[test]
    fn test_full_message_deserialization() {
        let json = r#"{
            "id": "18c1",
            "threadId": "18c1",
            "snippet": "Rs. 250 debited",
            "internalDate": "1709600000000",
            "payload": {
                "partId": "",
                "mimeType": "multipart/alternative",
                "body": {"size": 0},
                "parts": [
                    {"partId": "0", "mimeType": "text/plain", "body": {"size": 23, "data": "UnMuIDI1MCBvbiAwNS0wMy0yNA=="}}
                ]
            }
        }"#;
        let message: GmailMessage = serde_json::from_str(json).unwrap();
        let payload = message.payload.unwrap();
        assert_eq!(payload.parts.len(), 1);
        assert_eq!(
            extractors::extract_message_content(&payload),
            "Rs. 250 on 05-03-24"
        );
    }

    #[test]
    fn test_pagination_stops() {
        assert_eq!(next_page_token(None, Some("p2".to_string()), 1).as_deref(), Some("p2"));
        assert_eq!(next_page_token(Some("p2"), Some("p3".to_string()), 2).as_deref(), Some("p3"));

        assert_eq!(next_page_token(Some("p1"), None, 1), None);
        assert_eq!(next_page_token(Some("p1"), Some(String::new()), 1), None);
        assert_eq!(next_page_token(Some("p2"), Some("p2".to_string()), 2), None);
        assert_eq!(
            next_page_token(Some("p19"), Some("p20".to_string()), MAX_LIST_PAGES),
            None
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = GmailClient::new(reqwest::Client::new(), "http://localhost:9/gmail/v1/", "t");
        assert_eq!(client.base_url, "http://localhost:9/gmail/v1");
    }
}
