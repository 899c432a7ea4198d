pub mod gmail_client;

#[cfg(test)]
pub mod fake_mailbox;

pub use gmail_client::{
    GmailClient, GmailClientFactory, GmailMessage, MailProvider, MailProviderFactory,
    ProviderError,
};
