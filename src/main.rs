// src/main.rs

use std::sync::Arc;

use feedsync::{
    HttpApiClient,
    config::Config,
    error::AppError,
    feed::{FeedStore, FetchOutcome},
    models::{media::MediaUpload, notification::NotificationPayload, post::Visibility},
    notifications::derive_target,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (.env included)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "feedsync.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("feedsync failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // `--notification <file>`: resolve a saved payload instead of loading the feed
    if let Some(pos) = args.iter().position(|arg| arg == "--notification") {
        let path = args
            .get(pos + 1)
            .ok_or_else(|| AppError::Config("--notification needs a file path".to_string()))?;
        return route_notification(path).await;
    }

    let api = Arc::new(HttpApiClient::new(&config)?);
    tracing::info!("Using feed API at {}", api.base_url());

    let store = FeedStore::from_config(api, &config);

    // `--post <content> [files...]`: publish a post with attachments
    if let Some(pos) = args.iter().position(|arg| arg == "--post") {
        let content = args
            .get(pos + 1)
            .ok_or_else(|| AppError::Config("--post needs the post content".to_string()))?;
        return publish(&store, content, &args[pos + 2..]).await;
    }

    match store.refresh().await {
        FetchOutcome::Loaded { accepted } => {
            let state = store.snapshot();
            tracing::info!(
                posts = accepted,
                has_more = state.has_more,
                "Feed refreshed"
            );
            for post in &state.posts {
                tracing::info!(
                    "#{} @{} ({} likes{}): {}",
                    post.id,
                    post.user.username,
                    post.likes_count,
                    if post.is_liked { ", liked" } else { "" },
                    post.content
                );
            }
            Ok(())
        }
        other => {
            let error = store.snapshot().error.unwrap_or_default();
            Err(AppError::Network(format!("{:?} {}", other, error)))
        }
    }
}

async fn publish(store: &FeedStore, content: &str, files: &[String]) -> Result<(), AppError> {
    let mut media = Vec::with_capacity(files.len());
    for file in files {
        let upload = MediaUpload::from_path(file).await?;
        tracing::info!(file = %file, mime_type = %upload.mime_type, "Attaching media");
        media.push(upload);
    }

    let post = store
        .create_post(content.to_string(), &media, Visibility::Public)
        .await?;
    tracing::info!(
        post_id = post.id,
        attached = post.media.len(),
        requested = media.len(),
        "Post published"
    );

    Ok(())
}

async fn route_notification(path: &str) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Config(format!("{}: {}", path, e)))?;

    let payload = NotificationPayload::from_json(&raw)?;

    match derive_target(&payload) {
        Some(intent) => {
            let json = serde_json::to_string(&intent)?;
            tracing::info!("Notification opens {}", json);
        }
        None => tracing::info!("Notification does not navigate anywhere"),
    }

    Ok(())
}
