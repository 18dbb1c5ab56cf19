// src/notifications/mod.rs

pub mod route;
pub mod router;

pub use route::{
    Banner, NavigationIntent, RouteParams, Screen, banner_for, derive_target, parse_deep_link,
};
pub use router::{AppLifecycle, Navigator, NotificationRouter, RouteOutcome};
