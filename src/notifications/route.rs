// src/notifications/route.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::{
    error::AppError,
    models::notification::{LikeableType, NotificationPayload},
};

static DEEP_LINK_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(posts|activities)/(\d+)/?$").expect("deep link pattern is valid")
});

/// Screens a notification can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    PostDetail,
    ActivityDetail,
}

impl Screen {
    fn likeable_type(self) -> LikeableType {
        match self {
            Screen::PostDetail => LikeableType::Post,
            Screen::ActivityDetail => LikeableType::Activity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub id: i64,
}

/// `{"screen": "PostDetail", "params": {"id": 123}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationIntent {
    pub screen: Screen,
    pub params: RouteParams,
}

/// Text of the in-app banner shown for a notification received in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub title: String,
    pub body: String,
}

/// Parses `/posts/{id}` or `/activities/{id}`.
///
/// Absolute links (`app://open/posts/12`, `https://host/activities/3`) are
/// accepted when their path has one of those shapes.
pub fn parse_deep_link(link: &str) -> Result<NavigationIntent, AppError> {
    let link = link.trim();
    let invalid = || AppError::InvalidDeepLink(link.to_string());

    let path = if link.starts_with('/') {
        link.split(['?', '#']).next().unwrap_or(link).to_string()
    } else {
        Url::parse(link).map_err(|_| invalid())?.path().to_string()
    };

    let captures = DEEP_LINK_PATH.captures(&path).ok_or_else(invalid)?;

    let screen = match &captures[1] {
        "posts" => Screen::PostDetail,
        _ => Screen::ActivityDetail,
    };
    let id = captures[2].parse::<i64>().map_err(|_| invalid())?;

    Ok(NavigationIntent {
        screen,
        params: RouteParams { id },
    })
}

/// Decides where a notification should take the user, if anywhere.
///
/// Only `url` picks the destination; `type` just gates whether navigating is
/// attempted. Never fails: problems are logged and mean "stay where you are".
pub fn derive_target(payload: &NotificationPayload) -> Option<NavigationIntent> {
    let kind = payload.kind.trim();

    let Some(link) = payload.deep_link() else {
        if kind.is_empty() {
            tracing::debug!("Notification has neither type nor url, not navigating");
        } else {
            tracing::info!(kind, "Notification has no url, skipping navigation");
        }
        return None;
    };

    let intent = match parse_deep_link(link) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::warn!(kind, "Skipping navigation for notification: {}", e);
            return None;
        }
    };

    if let Some(likeable) = payload.likeable_type {
        if likeable != LikeableType::Other && likeable != intent.screen.likeable_type() {
            tracing::warn!(
                url = link,
                "Notification url does not match likeable_type {:?}, following the url",
                likeable
            );
        }
    }

    Some(intent)
}

pub fn banner_for(payload: &NotificationPayload) -> Banner {
    let actor = payload
        .actor_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .or(payload.actor_username.as_deref())
        .unwrap_or("Someone");

    let body = match (payload.kind.as_str(), payload.likeable_type) {
        ("likes", Some(LikeableType::Activity)) => format!("{} liked your activity", actor),
        ("likes", _) => format!("{} liked your post", actor),
        _ => "You have a new notification".to_string(),
    };

    Banner {
        title: actor.to_string(),
        body,
    }
}
