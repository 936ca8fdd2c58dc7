//! # Auth Manager
//!
//! Wires the session core together from a [`CoreConfig`] and exposes the
//! operations the UI needs: bootstrap, login, logout, post-login redirect
//! and the protected-route guard.
//!
//! ```text
//! bootstrap ──> ModeStrategy::init ──> CredentialStore::read
//!                                  └─> ApiClient ──> RequestInterceptor
//!                                                └─> ErrorClassifier ──> ReturnToNavigator
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::AuthManager;
//! use core_runtime::config::{CoreConfig, SessionSettings};
//!
//! let config = CoreConfig::builder()
//!     .settings(SessionSettings::from_env()?)
//!     .durable_store(store)
//!     .build()?;
//! let auth = AuthManager::new(config)?;
//!
//! let state = auth.bootstrap().await;
//! if !state.is_authenticated() {
//!     auth.login("archmagos", "omnissiah", true).await?;
//!     auth.complete_login_redirect(None).await;
//! }
//! let posts = auth.client().get("posts").await?;
//! ```

use crate::classifier::ErrorClassifier;
use crate::client::{ApiClient, ApiClientConfig};
use crate::credential_store::{CredentialStore, RetentionPolicy};
use crate::error::Result;
use crate::interceptor::RequestInterceptor;
use crate::return_to::{GuardOutcome, ReturnToNavigator};
use crate::routes::Routes;
use crate::session::SessionHandle;
use crate::strategy::{self, ModeStrategy, StrategyContext};
use crate::types::{AuthMode, LoginRequest, SessionState};
use bridge_traits::NavigationState;
use core_runtime::config::{CoreConfig, SessionSettings};
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub struct AuthManager {
    settings: SessionSettings,
    strategy: Arc<dyn ModeStrategy>,
    client: Arc<ApiClient>,
    session: SessionHandle,
    return_to: Arc<ReturnToNavigator>,
    events: EventBus,
    /// Set once bootstrap has run
    bootstrapped: Mutex<bool>,
}

impl AuthManager {
    /// Builds every component for the configured mode.
    ///
    /// # Errors
    ///
    /// Fails when the API base URL cannot be used.
    pub fn new(config: CoreConfig) -> Result<Self> {
        let CoreConfig {
            settings,
            http_client,
            durable_store,
            session_store,
            navigator,
            clock,
            event_bus,
            retry_policy,
        } = config;
        let mode = settings.auth_mode;

        let credentials = CredentialStore::new(durable_store, clock);
        let session = SessionHandle::new(mode);
        let return_to = Arc::new(ReturnToNavigator::new(
            session_store,
            navigator.clone(),
            Routes::new(&settings.base_path),
            event_bus.clone(),
        ));
        let classifier = Arc::new(ErrorClassifier::new(
            mode,
            navigator,
            credentials.clone(),
            return_to.clone(),
            session.clone(),
            event_bus.clone(),
        ));
        let client = Arc::new(ApiClient::new(
            http_client,
            ApiClientConfig::from_settings(&settings, retry_policy),
            RequestInterceptor::new(mode, credentials.clone()),
            classifier,
        )?);
        let strategy = strategy::for_mode(
            mode,
            StrategyContext {
                client: client.clone(),
                credentials,
                retention: RetentionPolicy::from_settings(&settings),
            },
        );

        info!(mode = %mode, base_path = %settings.base_path, "Session core ready");

        Ok(Self {
            settings,
            strategy,
            client,
            session,
            return_to,
            events: event_bus,
            bootstrapped: Mutex::new(false),
        })
    }

    pub fn mode(&self) -> AuthMode {
        self.strategy.mode()
    }

    /// Shared HTTP client, already wired to the interceptor and classifier.
    pub fn client(&self) -> Arc<ApiClient> {
        self.client.clone()
    }

    pub fn return_to(&self) -> Arc<ReturnToNavigator> {
        self.return_to.clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn state(&self) -> SessionState {
        self.session.snapshot().await
    }

    /// Restores the persisted session. Runs once; later calls return the
    /// current state.
    ///
    /// When nothing could be restored and seed credentials are configured,
    /// signs in with them. Failures leave the session unauthenticated and
    /// are never surfaced.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub async fn bootstrap(&self) -> SessionState {
        let mut bootstrapped = self.bootstrapped.lock().await;
        if *bootstrapped {
            return self.session.snapshot().await;
        }
        *bootstrapped = true;

        self.session.begin().await;
        if let Some(profile) = self.strategy.init().await {
            info!(profile_id = profile.id, "Session restored");
            self.emit(AuthEvent::SessionRestored {
                identity: profile.name.clone(),
            });
            return self.session.succeed(profile).await;
        }

        let state = self.session.reset().await;
        let Some(seed) = self.settings.seed.clone() else {
            debug!("No persisted session");
            return state;
        };

        info!(identity = %seed.identity, "Signing in with seed credentials");
        match self
            .sign_in(LoginRequest::new(seed.identity, seed.secret, true))
            .await
        {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Seed credentials were rejected");
                self.session.reset().await
            }
        }
    }

    /// Signs in through the configured mode.
    ///
    /// # Errors
    ///
    /// [`AuthError::AuthenticationFailed`](crate::AuthError::AuthenticationFailed);
    /// the session is left in `Failed` with the same message.
    pub async fn login(
        &self,
        identity: &str,
        secret: &str,
        remember: bool,
    ) -> Result<SessionState> {
        self.sign_in(LoginRequest::new(identity, secret, remember))
            .await
    }

    async fn sign_in(&self, request: LoginRequest) -> Result<SessionState> {
        self.session.begin().await;
        match self.strategy.login(&request).await {
            Ok(outcome) => {
                self.emit(AuthEvent::SignedIn {
                    identity: request.trimmed_identity().to_string(),
                    mode: self.mode().to_string(),
                    fell_back_to_local: outcome.fell_back_to_local,
                });
                Ok(self.session.succeed(outcome.profile).await)
            }
            Err(e) => {
                self.session.fail(e.to_string()).await;
                self.emit(AuthEvent::LoginFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> SessionState {
        self.strategy.logout().await;
        let state = self.session.reset().await;
        self.emit(AuthEvent::SignedOut);
        info!("Signed out");
        state
    }

    /// Navigates to the post-login destination and returns it.
    pub async fn complete_login_redirect(&self, state: Option<&NavigationState>) -> String {
        self.return_to.complete_login(state).await
    }

    /// Protected-route check against the current session.
    pub async fn guard(&self, destination: &str) -> GuardOutcome {
        let authenticated = self.session.is_authenticated().await;
        self.return_to.guard(authenticated, destination)
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.events.emit(CoreEvent::Auth(event));
    }
}
