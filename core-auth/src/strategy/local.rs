use super::{ModeStrategy, StrategyContext};
use crate::error::{AuthError, Result};
use crate::types::{AuthMode, CredentialKind, CredentialRecord, LoginOutcome, LoginRequest, Profile};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// Shortest identity accepted without server verification.
pub const MIN_LOCAL_IDENTITY_LEN: usize = 3;

/// Identity-only sessions. Never touches the network.
pub struct LocalStrategy {
    context: StrategyContext,
}

impl LocalStrategy {
    pub fn new(context: StrategyContext) -> Self {
        Self { context }
    }

    pub fn accepts(identity: &str) -> bool {
        identity.trim().chars().count() >= MIN_LOCAL_IDENTITY_LEN
    }
}

#[async_trait]
impl ModeStrategy for LocalStrategy {
    fn mode(&self) -> AuthMode {
        AuthMode::Local
    }

    #[instrument(skip(self, request), fields(identity = %request.trimmed_identity()))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        let identity = request.trimmed_identity();
        if !Self::accepts(identity) {
            return Err(AuthError::AuthenticationFailed(format!(
                "Identity must be at least {} characters",
                MIN_LOCAL_IDENTITY_LEN
            )));
        }

        let expires_at = self
            .context
            .retention
            .expires_at(self.context.credentials.now(), request.remember)?;
        let record = CredentialRecord::local(identity, expires_at);
        if let Err(e) = self
            .context
            .credentials
            .save(CredentialKind::Local, &record)
            .await
        {
            warn!(error = %e, "Local session will not survive a restart");
        }

        info!("Signed in locally");
        Ok(LoginOutcome::new(Profile::placeholder(identity)))
    }

    async fn init(&self) -> Option<Profile> {
        self.context
            .credentials
            .read(CredentialKind::Local)
            .await
            .map(|record| Profile::placeholder(&record.identity))
    }

    async fn logout(&self) {
        self.context.clear_session().await;
    }
}
