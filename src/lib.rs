// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notifications;

// Re-export specific items for convenience
pub use api::{FeedApi, HttpApiClient};
pub use error::AppError;
pub use feed::FeedStore;
pub use notifications::NotificationRouter;
