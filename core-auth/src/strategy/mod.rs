//! # Mode Strategies
//!
//! One implementation per [`AuthMode`], chosen once by [`for_mode`]. Callers
//! only ever see the [`ModeStrategy`] trait.
//!
//! | Mode   | `login`                                      | `init`                               |
//! |--------|----------------------------------------------|--------------------------------------|
//! | Local  | identity only, no network                    | persisted local record               |
//! | Basic  | verify against `GET users/me`, then persist  | silent profile fetch                 |
//! | Hybrid | Basic, falling back to Local                 | silent profile fetch, then local     |
//!
//! `logout` is the same everywhere: every credential key is cleared and the
//! client's default headers are reset.

mod basic;
mod hybrid;
mod local;

pub use basic::BasicStrategy;
pub use hybrid::HybridStrategy;
pub use local::{LocalStrategy, MIN_LOCAL_IDENTITY_LEN};

use crate::client::ApiClient;
use crate::credential_store::{CredentialStore, RetentionPolicy};
use crate::error::Result;
use crate::types::{AuthMode, LoginOutcome, LoginRequest, Profile};
use async_trait::async_trait;
use std::sync::Arc;

/// Profile endpoint, relative to the API base URL.
pub const PROFILE_ENDPOINT: &str = "users/me";

#[async_trait]
pub trait ModeStrategy: Send + Sync {
    fn mode(&self) -> AuthMode;

    /// Establishes a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::AuthenticationFailed`](crate::AuthError::AuthenticationFailed)
    /// with a human-readable message; nothing is persisted in that case.
    /// [`AuthError::Runtime`](crate::AuthError::Runtime) when the retention
    /// window cannot be applied.
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome>;

    /// Restores a session from persisted state. Failures resolve to `None`.
    async fn init(&self) -> Option<Profile>;

    async fn logout(&self);
}

/// Everything a strategy needs.
#[derive(Clone)]
pub struct StrategyContext {
    pub client: Arc<ApiClient>,
    pub credentials: CredentialStore,
    pub retention: RetentionPolicy,
}

impl StrategyContext {
    async fn clear_session(&self) {
        self.credentials.clear().await;
        self.client.reset_headers();
    }
}

pub fn for_mode(mode: AuthMode, context: StrategyContext) -> Arc<dyn ModeStrategy> {
    match mode {
        AuthMode::Local => Arc::new(LocalStrategy::new(context)),
        AuthMode::Basic => Arc::new(BasicStrategy::new(context)),
        AuthMode::Hybrid => Arc::new(HybridStrategy::new(context)),
    }
}
