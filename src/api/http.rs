// src/api/http.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Method, RequestBuilder, Response, header,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use url::Url;

use super::FeedApi;
use crate::{
    config::Config,
    error::AppError,
    models::{
        media::MediaUpload,
        post::{CreatePostRequest, FeedPage, Media, Post, PostId},
    },
};

/// REST client for the feed backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let mut base = config.api_base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        Ok(Self {
            http,
            base_url,
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = check_status(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), AppError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into an `AppError`.
///
/// The backend reports failures as `{"error": "..."}`; anything else is kept verbatim.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body);

    Err(AppError::from_status(status.as_u16(), message))
}

#[async_trait]
impl FeedApi for HttpApiClient {
    async fn get_feed(&self, page: u32) -> Result<FeedPage, AppError> {
        let mut url = self.endpoint("api/feed")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        self.send_json(self.request(Method::GET, url)).await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, AppError> {
        let url = self.endpoint(&format!("api/posts/{}", id))?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn like_post(&self, id: PostId) -> Result<(), AppError> {
        let url = self.endpoint(&format!("api/posts/{}/like", id))?;
        self.send_empty(self.request(Method::POST, url)).await
    }

    async fn unlike_post(&self, id: PostId) -> Result<(), AppError> {
        let url = self.endpoint(&format!("api/posts/{}/like", id))?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, AppError> {
        let url = self.endpoint("api/posts")?;
        self.send_json(self.request(Method::POST, url).json(request)).await
    }

    async fn upload_post_media(
        &self,
        post_id: PostId,
        media: &MediaUpload,
    ) -> Result<Media, AppError> {
        let url = self.endpoint(&format!("api/posts/{}/media", post_id))?;

        let part = Part::bytes(media.bytes.clone())
            .file_name(media.file_name.clone())
            .mime_str(&media.mime_type)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let form = Form::new().part("media", part);

        self.send_json(self.request(Method::POST, url).multipart(form)).await
    }

    async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        let url = self.endpoint(&format!("api/posts/{}", id))?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }
}
