//! # Return-To Navigation
//!
//! Remembers where the user was headed when a login detour interrupted
//! them, and resolves where to go once they are signed in.
//!
//! Resolution order after login:
//! 1. `from` carried in the in-memory [`NavigationState`] of the redirect
//! 2. the target persisted in session-scoped storage (read once, then deleted)
//! 3. the default destination
//!
//! When (1) wins the persisted target is left in place.

use crate::routes::{Routes, DEFAULT_DESTINATION};
use bridge_traits::{KeyValueStore, NavigationState, Navigator};
use core_runtime::events::{CoreEvent, EventBus, NavigationEvent, RedirectReason};
use std::sync::Arc;
use tracing::{debug, warn};

pub const RETURN_TO_KEY: &str = "auth.returnTo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Destination may be rendered
    Allow,
    /// User was sent to the login surface
    RedirectedToLogin { from: String },
}

pub struct ReturnToNavigator {
    session_store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    routes: Routes,
    events: EventBus,
}

impl ReturnToNavigator {
    pub fn new(
        session_store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        routes: Routes,
        events: EventBus,
    ) -> Self {
        Self {
            session_store,
            navigator,
            routes,
            events,
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Protected-route check. Unauthenticated users are redirected to the
    /// login surface carrying `destination` as `from`.
    pub fn guard(&self, is_authenticated: bool, destination: &str) -> GuardOutcome {
        if is_authenticated {
            return GuardOutcome::Allow;
        }

        let from = self.routes.strip_base(destination);
        let target = self.routes.login();
        self.navigate(
            &target,
            Some(NavigationState::from_path(&from)),
            RedirectReason::LoginRequired,
        );
        GuardOutcome::RedirectedToLogin { from }
    }

    /// Persists `path` (app-relative or full location) as the return target.
    pub async fn remember(&self, path: &str) {
        let path = self.routes.strip_base(path);
        if let Err(e) = self.session_store.set(RETURN_TO_KEY, &path).await {
            warn!(error = %e, "Failed to persist return target");
            return;
        }
        debug!(path = %path, "Remembered return target");
    }

    /// Persisted target without consuming it.
    pub async fn peek(&self) -> Option<String> {
        match self.session_store.get(RETURN_TO_KEY).await {
            Ok(value) => value.filter(|p| is_safe_target(p)),
            Err(e) => {
                warn!(error = %e, "Failed to read return target");
                None
            }
        }
    }

    /// App-relative post-login destination.
    pub async fn resolve(&self, state: Option<&NavigationState>) -> String {
        if let Some(from) = state
            .and_then(|s| s.from.as_deref())
            .map(|from| self.routes.strip_base(from))
            .filter(|from| is_safe_target(from) && !self.routes.is_login_surface(from))
        {
            return from;
        }

        let persisted = self.peek().await;
        if let Err(e) = self.session_store.remove(RETURN_TO_KEY).await {
            warn!(error = %e, "Failed to clear return target");
        }

        persisted
            .filter(|p| !self.routes.is_login_surface(p))
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string())
    }

    /// Resolves the destination and navigates there. Returns the full location.
    pub async fn complete_login(&self, state: Option<&NavigationState>) -> String {
        let target = self.routes.href(&self.resolve(state).await);
        self.navigate(&target, None, RedirectReason::LoginCompleted);
        target
    }

    fn navigate(&self, target: &str, state: Option<NavigationState>, reason: RedirectReason) {
        let from = self.navigator.current_path();
        self.navigator.redirect(target, state);
        let _ = self
            .events
            .emit(CoreEvent::Navigation(NavigationEvent::Redirected {
                from,
                to: target.to_string(),
                reason,
            }));
    }
}

/// Only same-origin absolute paths are followed.
fn is_safe_target(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}
