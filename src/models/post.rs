use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::user::Author;

pub type PostId = i64;
pub type MediaId = i64;

/// Who can see a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Followers,
    Private,
}

/// An attachment already stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// One feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user: Author,
    pub content: String,

    #[serde(default)]
    pub media: Vec<Media>,

    #[serde(default)]
    pub likes_count: i64,

    /// Whether the current viewer has liked this post.
    #[serde(default)]
    pub is_liked: bool,

    #[serde(default)]
    pub visibility: Visibility,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Pagination metadata returned next to every feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
}

impl PageMeta {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of the feed, in reverse-chronological server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub data: Vec<Post>,
    pub meta: PageMeta,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(
            min = 1,
            max = 10000,
            message = "Content length must be between 1 and 10000 chars"
        ),
        custom(function = "not_blank")
    )]
    pub content: String,

    pub visibility: Visibility,
}

fn not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Content must not be blank".into());
        return Err(err);
    }
    Ok(())
}
