use serde::Serialize;

use crate::models::post::{Post, PostId};

/// Generic message surfaced when a page could not be loaded.
pub const LOAD_FAILED: &str = "Failed to load feed";

/// What a feed screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedState {
    pub posts: Vec<Post>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            is_loading: false,
            is_refreshing: false,
            has_more: true,
            error: None,
        }
    }
}

impl FeedState {
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }
}

/// Result of a page fetch, for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page arrived; `accepted` items were new to the list.
    Loaded { accepted: usize },
    /// Another fetch was already in flight; no request was made.
    Skipped,
    /// `load_more` was called with no pages left; no request was made.
    Exhausted,
    /// The request failed; `FeedState::error` is set and the list is untouched.
    Failed,
    /// The feed was closed before the page arrived.
    Cancelled,
}

/// Result of a like/unlike. Failures are reported here, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Applied,
    /// A like/unlike for the same post is still pending.
    Busy,
    Failed,
    Cancelled,
}
