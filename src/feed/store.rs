// src/feed/store.rs

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::{
    merge::{merge_page, prepend_post, replace_page, with_like, with_post_replaced, without_post},
    state::{FeedState, FetchOutcome, LOAD_FAILED, LikeOutcome},
};
use crate::{
    api::FeedApi,
    config::Config,
    error::AppError,
    models::{
        media::MediaUpload,
        post::{CreatePostRequest, Post, PostId, Visibility},
    },
};

const DEFAULT_RECONCILE_AFTER: u32 = 3;

/// Single source of truth for the viewer's feed.
///
/// * Published state lives in a watch channel; every mutation computes the
///   next list and commits it in one `send_modify`.
/// * The in-flight flag, the page cursor and the per-post like locks are kept
///   out of band so toggling them never notifies subscribers.
/// * Fetches and likes are bound to a cancellation scope that ends with
///   `close()` or when the store is dropped.
pub struct FeedStore {
    api: Arc<dyn FeedApi>,
    state: watch::Sender<FeedState>,
    in_flight: AtomicBool,
    next_page: AtomicU32,
    pending_likes: Mutex<HashSet<PostId>>,
    like_failures: Mutex<HashMap<PostId, u32>>,
    reconcile_after: u32,
    scope: CancellationToken,
}

impl FeedStore {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        let (state, _) = watch::channel(FeedState::default());

        Self {
            api,
            state,
            in_flight: AtomicBool::new(false),
            next_page: AtomicU32::new(1),
            pending_likes: Mutex::new(HashSet::new()),
            like_failures: Mutex::new(HashMap::new()),
            reconcile_after: DEFAULT_RECONCILE_AFTER,
            scope: CancellationToken::new(),
        }
    }

    pub fn from_config(api: Arc<dyn FeedApi>, config: &Config) -> Self {
        Self::new(api).with_reconcile_after(config.like_reconcile_after)
    }

    /// Consecutive like/unlike failures on one post before it is re-fetched.
    /// Zero disables reconciliation.
    pub fn with_reconcile_after(mut self, failures: u32) -> Self {
        self.reconcile_after = failures;
        self
    }

    /// Ties the store to a view-level scope: cancelling `parent` cancels the store.
    pub fn with_scope(mut self, parent: &CancellationToken) -> Self {
        self.scope = parent.child_token();
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Tears the feed down. Pending requests are abandoned and their results discarded.
    pub fn close(&self) {
        self.scope.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Loads one page: page 1 replacing the list when `reset`, otherwise the
    /// cursor page merged after the existing items.
    pub async fn fetch_page(&self, reset: bool) -> FetchOutcome {
        if self.is_closed() {
            return FetchOutcome::Cancelled;
        }

        let Some(_in_flight) = InFlight::acquire(&self.in_flight, &self.state) else {
            tracing::debug!("Feed fetch already in flight, skipping");
            return FetchOutcome::Skipped;
        };

        let page = if reset {
            1
        } else {
            self.next_page.load(Ordering::Acquire)
        };

        self.state.send_modify(|s| {
            if reset {
                s.is_refreshing = true;
            } else {
                s.is_loading = true;
            }
            s.error = None;
        });

        let result = tokio::select! {
            biased;
            _ = self.scope.cancelled() => {
                tracing::debug!("Feed closed while loading page {}", page);
                return FetchOutcome::Cancelled;
            }
            result = self.api.get_feed(page) => result,
        };

        match result {
            Ok(feed) => {
                let has_more = feed.meta.has_more();
                let mut accepted = 0;

                self.state.send_modify(|s| {
                    if reset {
                        let next = replace_page(feed.data);
                        accepted = next.len();
                        s.posts = next;
                    } else {
                        let (next, n) = merge_page(&s.posts, feed.data);
                        accepted = n;
                        s.posts = next;
                    }
                    s.has_more = has_more;
                });
                self.next_page.store(page + 1, Ordering::Release);

                tracing::info!(page, accepted, has_more, "Feed page loaded");
                FetchOutcome::Loaded { accepted }
            }
            Err(e) => {
                tracing::error!("Failed to load feed page {}: {}", page, e);
                self.state
                    .send_modify(|s| s.error = Some(LOAD_FAILED.to_string()));
                FetchOutcome::Failed
            }
        }
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch_page(true).await
    }

    /// Requests the next page, unless the last one has already been seen.
    pub async fn load_more(&self) -> FetchOutcome {
        let has_more = self.state.borrow().has_more;
        if !has_more {
            return FetchOutcome::Exhausted;
        }
        self.fetch_page(false).await
    }

    pub async fn like(&self, id: PostId) -> LikeOutcome {
        self.set_liked(id, true).await
    }

    pub async fn unlike(&self, id: PostId) -> LikeOutcome {
        self.set_liked(id, false).await
    }

    /// Likes or unlikes depending on the flag of `post` as passed in.
    pub async fn toggle_like(&self, post: &Post) -> LikeOutcome {
        if post.is_liked {
            self.unlike(post.id).await
        } else {
            self.like(post.id).await
        }
    }

    async fn set_liked(&self, id: PostId, liked: bool) -> LikeOutcome {
        if self.is_closed() {
            return LikeOutcome::Cancelled;
        }

        let Some(_pending) = PendingLike::acquire(&self.pending_likes, id) else {
            tracing::debug!(post_id = id, "Like already pending, ignoring");
            return LikeOutcome::Busy;
        };

        let request = async {
            if liked {
                self.api.like_post(id).await
            } else {
                self.api.unlike_post(id).await
            }
        };

        let result = tokio::select! {
            biased;
            _ = self.scope.cancelled() => return LikeOutcome::Cancelled,
            result = request => result,
        };

        match result {
            Ok(()) => {
                lock(&self.like_failures).remove(&id);
                self.state
                    .send_modify(|s| s.posts = with_like(&s.posts, id, liked));
                LikeOutcome::Applied
            }
            Err(e) => {
                let action = if liked { "like" } else { "unlike" };
                tracing::warn!(post_id = id, "Failed to {} post: {}", action, e);

                if self.record_like_failure(id) {
                    self.reconcile(id).await;
                }
                LikeOutcome::Failed
            }
        }
    }

    /// Counts a failure; true once the threshold is reached (the counter restarts).
    fn record_like_failure(&self, id: PostId) -> bool {
        if self.reconcile_after == 0 {
            return false;
        }

        let mut failures = lock(&self.like_failures);
        let count = failures.entry(id).or_insert(0);
        *count += 1;

        if *count >= self.reconcile_after {
            failures.remove(&id);
            true
        } else {
            false
        }
    }

    async fn reconcile(&self, id: PostId) {
        tracing::info!(post_id = id, "Re-fetching post after repeated like failures");

        let result = tokio::select! {
            biased;
            _ = self.scope.cancelled() => return,
            result = self.api.get_post(id) => result,
        };

        match result {
            Ok(fresh) => self
                .state
                .send_modify(|s| s.posts = with_post_replaced(&s.posts, fresh)),
            Err(e) => tracing::warn!(post_id = id, "Failed to re-fetch post: {}", e),
        }
    }

    /// Creates a post, then uploads its attachments one by one.
    ///
    /// A failed upload is logged and skipped; the post is kept with whatever
    /// attachments made it. Failure to create the post itself is returned.
    pub async fn create_post(
        &self,
        content: impl Into<String>,
        media: &[MediaUpload],
        visibility: Visibility,
    ) -> Result<Post, AppError> {
        let request = CreatePostRequest {
            content: content.into(),
            visibility,
        };
        request.validate()?;

        let mut post = self.api.create_post(&request).await?;

        for (index, item) in media.iter().enumerate() {
            match self.api.upload_post_media(post.id, item).await {
                Ok(uploaded) => post.media.push(uploaded),
                Err(e) => tracing::warn!(
                    post_id = post.id,
                    "Failed to upload attachment {} ({}): {}",
                    index + 1,
                    item.file_name,
                    e
                ),
            }
        }

        tracing::info!(
            post_id = post.id,
            attachments = post.media.len(),
            requested = media.len(),
            "Post created"
        );

        let created = post.clone();
        self.state
            .send_modify(|s| s.posts = prepend_post(&s.posts, post));

        Ok(created)
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        self.api.delete_post(id).await?;

        self.state
            .send_modify(|s| s.posts = without_post(&s.posts, id));
        tracing::info!(post_id = id, "Post deleted");

        Ok(())
    }
}

impl Drop for FeedStore {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held for the duration of one page fetch.
/// Dropping it releases the flag and clears both loading indicators,
/// whether the fetch finished, failed or was abandoned mid-await.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<FeedState>,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a watch::Sender<FeedState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.is_refreshing = false;
        });
        self.flag.store(false, Ordering::Release);
    }
}

/// Per-post lock: a second like/unlike on the same post is rejected while the first is pending.
struct PendingLike<'a> {
    pending: &'a Mutex<HashSet<PostId>>,
    id: PostId,
}

impl<'a> PendingLike<'a> {
    fn acquire(pending: &'a Mutex<HashSet<PostId>>, id: PostId) -> Option<Self> {
        let inserted = lock(pending).insert(id);
        inserted.then(|| Self { pending, id })
    }
}

impl Drop for PendingLike<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.id);
    }
}
