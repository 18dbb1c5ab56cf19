// src/api/mod.rs

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        media::MediaUpload,
        post::{CreatePostRequest, FeedPage, Media, Post, PostId},
    },
};

pub use self::http::HttpApiClient;

/// Everything the feed needs from the backend.
///
/// `HttpApiClient` is the production implementation; tests plug in their own.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Fetches one page of the viewer's feed (1-based).
    async fn get_feed(&self, page: u32) -> Result<FeedPage, AppError>;

    async fn get_post(&self, id: PostId) -> Result<Post, AppError>;

    async fn like_post(&self, id: PostId) -> Result<(), AppError>;

    async fn unlike_post(&self, id: PostId) -> Result<(), AppError>;

    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, AppError>;

    async fn upload_post_media(
        &self,
        post_id: PostId,
        media: &MediaUpload,
    ) -> Result<Media, AppError>;

    async fn delete_post(&self, id: PostId) -> Result<(), AppError>;
}
