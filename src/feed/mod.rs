// src/feed/mod.rs

pub mod merge;
pub mod state;
pub mod store;

pub use state::{FeedState, FetchOutcome, LOAD_FAILED, LikeOutcome};
pub use store::FeedStore;
