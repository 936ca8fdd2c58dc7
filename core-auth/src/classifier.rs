//! # Error Classifier
//!
//! Turns a failed request into a [`Classification`] and performs the side
//! effects that go with it:
//!
//! | Failure                         | Effect                                             |
//! |---------------------------------|----------------------------------------------------|
//! | no response                     | redirect to the network-error view                 |
//! | 401/403, local mode             | none                                               |
//! | 401/403, opt-out header         | none, left to the caller                           |
//! | 401/403                         | clear credentials and session, remember the path, redirect to login (expired) |
//! | 404, 409, 418, 429, 5xx         | redirect to `/error/{status}`                      |
//! | anything else                   | none                                               |
//!
//! The opt-out header only affects auth failures. A request carrying it
//! still lands on the network or error view when those apply.
//!
//! Reading the current path and redirecting happen under one lock. N
//! requests failing at once therefore produce at most one navigation: the
//! first moves the user, the rest find them already on the target view.

use crate::credential_store::CredentialStore;
use crate::return_to::ReturnToNavigator;
use crate::routes::{is_recognized_error_status, Routes};
use crate::session::SessionHandle;
use crate::types::AuthMode;
use bridge_traits::Navigator;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus, NavigationEvent, RedirectReason};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Header marking a request whose caller handles failures itself.
pub const SUPPRESS_AUTH_REDIRECT_HEADER: &str = "X-Suppress-Auth-Redirect";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No response was received
    NetworkUnavailable,
    /// The server rejected the session; credentials were cleared
    SessionInvalidated,
    /// A dedicated error view exists for this status
    ErrorView(u16),
    /// Left to the caller
    Propagate,
}

pub struct ErrorClassifier {
    mode: AuthMode,
    navigator: Arc<dyn Navigator>,
    credentials: CredentialStore,
    return_to: Arc<ReturnToNavigator>,
    session: SessionHandle,
    routes: Routes,
    events: EventBus,
    nav_lock: Mutex<()>,
}

impl ErrorClassifier {
    pub fn new(
        mode: AuthMode,
        navigator: Arc<dyn Navigator>,
        credentials: CredentialStore,
        return_to: Arc<ReturnToNavigator>,
        session: SessionHandle,
        events: EventBus,
    ) -> Self {
        let routes = return_to.routes().clone();
        Self {
            mode,
            navigator,
            credentials,
            return_to,
            session,
            routes,
            events,
            nav_lock: Mutex::new(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn classify_transport_failure(&self) -> Classification {
        let target = self.routes.network_error();
        self.navigate_unless(
            |routes, current| routes.is_network_error(current),
            &target,
            RedirectReason::NetworkUnavailable,
        )
        .await;
        Classification::NetworkUnavailable
    }

    #[instrument(skip(self))]
    pub async fn classify_status(&self, status: u16, suppress_redirect: bool) -> Classification {
        match status {
            401 | 403 if !self.mode.sends_credentials() => {
                debug!("Auth failure ignored in local mode");
                Classification::Propagate
            }
            401 | 403 if suppress_redirect => Classification::Propagate,
            401 | 403 => {
                self.invalidate_session(status).await;
                Classification::SessionInvalidated
            }
            s if is_recognized_error_status(s) => {
                let family = s / 100;
                let target = self.routes.error_view(s);
                self.navigate_unless(
                    |routes, current| routes.error_family(current) == Some(family),
                    &target,
                    RedirectReason::ErrorStatus,
                )
                .await;
                Classification::ErrorView(s)
            }
            _ => Classification::Propagate,
        }
    }

    async fn invalidate_session(&self, status: u16) {
        self.credentials.clear().await;
        self.session.reset().await;

        let _guard = self.nav_lock.lock().await;
        let current = self.routes.strip_base(&self.navigator.current_path());

        let _ = self
            .events
            .emit(CoreEvent::Auth(AuthEvent::SessionInvalidated {
                status,
                path: current.clone(),
            }));

        if self.routes.is_whitelisted(&current) || self.routes.is_login_surface(&current) {
            debug!(path = %current, "Session invalidated on whitelisted path");
            return;
        }

        warn!(status, path = %current, "Session invalidated by server");
        self.return_to.remember(&current).await;
        let target = self.routes.login_expired();
        self.redirect(&current, &target, RedirectReason::SessionExpired);
    }

    async fn navigate_unless<F>(&self, already_there: F, target: &str, reason: RedirectReason)
    where
        F: Fn(&Routes, &str) -> bool,
    {
        let _guard = self.nav_lock.lock().await;
        let current = self.routes.strip_base(&self.navigator.current_path());
        if already_there(&self.routes, &current) {
            debug!(path = %current, "Already on target view");
            return;
        }
        self.redirect(&current, target, reason);
    }

    fn redirect(&self, from: &str, target: &str, reason: RedirectReason) {
        info!(from, to = target, ?reason, "Redirecting");
        self.navigator.redirect(target, None);
        let _ = self
            .events
            .emit(CoreEvent::Navigation(NavigationEvent::Redirected {
                from: from.to_string(),
                to: target.to_string(),
                reason,
            }));
    }
}
