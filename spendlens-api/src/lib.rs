pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod integrations;
pub mod jobs;
pub mod state;
pub mod summary;

pub use state::AppState;
