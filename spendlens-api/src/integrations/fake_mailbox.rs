//! In-memory mailbox used by tests in place of Gmail.

use async_trait::async_trait;
use extractors::mime_content::{MessagePart, TEXT_HTML, TEXT_PLAIN};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::gmail_client::{GmailMessage, MailProvider, MailProviderFactory, ProviderError};

enum FakeMessage {
    Payload(MessagePart),
    FetchFails(u16),
}

#[derive(Default)]
pub struct FakeMailbox {
    messages: Vec<(String, FakeMessage)>,
    list_status: Option<u16>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plain(mut self, id: &str, body: &str) -> Self {
        self.messages
            .push((id.to_string(), FakeMessage::Payload(MessagePart::leaf(TEXT_PLAIN, body))));
        self
    }

    pub fn with_html(mut self, id: &str, body: &str) -> Self {
        let payload = MessagePart::multipart(
            "multipart/alternative",
            vec![MessagePart::leaf(TEXT_HTML, body)],
        );
        self.messages.push((id.to_string(), FakeMessage::Payload(payload)));
        self
    }

    pub fn with_failing_message(mut self, id: &str, status: u16) -> Self {
        self.messages.push((id.to_string(), FakeMessage::FetchFails(status)));
        self
    }

    /// Makes the search call itself fail with `status`.
    pub fn failing_list(mut self, status: u16) -> Self {
        self.list_status = Some(status);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailProvider for FakeMailbox {
    async fn list_message_ids(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        if let Some(status) = self.list_status {
            return Err(ProviderError::from_status(status, "list failed"));
        }

        Ok(self.messages.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn get_message(&self, id: &str) -> Result<GmailMessage, ProviderError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        let (_, message) = self
            .messages
            .iter()
            .find(|(message_id, _)| message_id == id)
            .ok_or_else(|| ProviderError::from_status(404, "Requested entity was not found."))?;

        match message {
            FakeMessage::Payload(payload) => Ok(GmailMessage {
                id: id.to_string(),
                payload: Some(payload.clone()),
            }),
            FakeMessage::FetchFails(status) => {
                Err(ProviderError::from_status(*status, "get failed"))
            }
        }
    }
}

/// Hands out the same mailbox for every token and records the tokens seen.
pub struct FakeProviderFactory {
    pub mailbox: Arc<FakeMailbox>,
    tokens: Mutex<Vec<String>>,
}

impl FakeProviderFactory {
    pub fn new(mailbox: FakeMailbox) -> Self {
        Self {
            mailbox: Arc::new(mailbox),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl MailProviderFactory for FakeProviderFactory {
    fn for_token(&self, access_token: &str) -> Arc<dyn MailProvider> {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(access_token.to_string());
        }
        self.mailbox.clone()
    }
}
