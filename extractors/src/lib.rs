//! Extractors Crate
//!
//! Turns raw provider messages into spending transactions. It has no network
//! or storage concerns so the pipeline can be tested on fixed payloads.
//!
//! # Pipeline
//!
//! - `mime_content`: walks a message's MIME tree and decodes the first readable body
//! - `markup`: reduces HTML to its text content
//! - `transaction_patterns`: pulls amount and date out of the text with a configurable pattern set
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::TransactionExtractor;
//!
//! let extractor = TransactionExtractor::default();
//! let transaction = extractor.extract_from_message(&message.payload)?;
//! ```

pub mod markup;
pub mod mime_content;
pub mod transaction_patterns;

// Re-export commonly used types
pub use mime_content::{extract_message_content, MessagePart, MessagePartBody};
pub use markup::strip_markup;
pub use transaction_patterns::{PatternConfig, TransactionExtractor, TransactionPatterns};
