// src/notifications/router.rs

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use super::route::{Banner, NavigationIntent, banner_for, derive_target};
use crate::models::notification::NotificationPayload;

/// App state in which the user tapped a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    /// App visible, notification shown as an in-app banner.
    Foreground,
    /// App suspended, notification tapped from the system tray.
    Background,
    /// Process launched by the tap.
    ColdStart,
}

/// The navigation subsystem notifications hand their intents to.
pub trait Navigator: Send + Sync {
    fn navigate(&self, intent: &NavigationIntent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Navigated(NavigationIntent),
    /// Navigation is not ready yet; the intent runs on `mark_ready`.
    Queued(NavigationIntent),
    /// Nothing to navigate to (no url, or one we cannot parse).
    Skipped,
    /// The cold-start notification was already handled.
    Duplicate,
}

#[derive(Debug, Default)]
struct RouterState {
    ready: bool,
    pending: VecDeque<NavigationIntent>,
    cold_start_handled: bool,
}

/// Routes notification taps to the navigator across all three entry points.
///
/// Intents that arrive before the navigator is ready are queued and delivered,
/// in order, the first time `mark_ready` is called.
pub struct NotificationRouter<N: Navigator> {
    navigator: N,
    state: Mutex<RouterState>,
}

impl<N: Navigator> NotificationRouter<N> {
    pub fn new(navigator: N) -> Self {
        Self {
            navigator,
            state: Mutex::new(RouterState::default()),
        }
    }

    /// A notification arrived while the app is visible: build its banner, do not navigate.
    pub fn on_foreground_notification(&self, payload: &NotificationPayload) -> Banner {
        tracing::debug!(kind = %payload.kind, "Notification received in foreground");
        banner_for(payload)
    }

    pub fn on_notification_tapped(
        &self,
        payload: &NotificationPayload,
        lifecycle: AppLifecycle,
    ) -> RouteOutcome {
        let mut state = self.lock();

        if lifecycle == AppLifecycle::ColdStart {
            if state.cold_start_handled {
                tracing::debug!("Cold start notification already handled");
                return RouteOutcome::Duplicate;
            }
            state.cold_start_handled = true;
        }

        let Some(intent) = derive_target(payload) else {
            return RouteOutcome::Skipped;
        };

        if state.ready {
            drop(state);
            tracing::info!(?lifecycle, ?intent, "Navigating from notification");
            self.navigator.navigate(&intent);
            RouteOutcome::Navigated(intent)
        } else {
            tracing::debug!(?lifecycle, ?intent, "Navigation not ready, queueing intent");
            state.pending.push_back(intent);
            RouteOutcome::Queued(intent)
        }
    }

    /// Signals that the navigator can accept intents. Returns how many queued
    /// intents were delivered; repeated signals deliver nothing.
    pub fn mark_ready(&self) -> usize {
        let pending: Vec<NavigationIntent> = {
            let mut state = self.lock();
            if state.ready {
                return 0;
            }
            state.ready = true;
            state.pending.drain(..).collect()
        };

        for intent in &pending {
            tracing::info!(?intent, "Replaying queued notification intent");
            self.navigator.navigate(intent);
        }
        pending.len()
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<N: Navigator> Drop for NotificationRouter<N> {
    fn drop(&mut self) {
        let state = self.lock();
        if !state.pending.is_empty() {
            tracing::warn!(
                dropped = state.pending.len(),
                "Navigation never became ready, dropping queued notification intents"
            );
        }
    }
}
