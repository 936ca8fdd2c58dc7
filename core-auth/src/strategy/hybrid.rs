use super::{BasicStrategy, LocalStrategy, ModeStrategy, StrategyContext};
use crate::error::Result;
use crate::types::{AuthMode, LoginOutcome, LoginRequest, Profile};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// Server verification when possible, local identity otherwise.
///
/// An empty secret skips the server entirely.
pub struct HybridStrategy {
    context: StrategyContext,
    basic: BasicStrategy,
    local: LocalStrategy,
}

impl HybridStrategy {
    pub fn new(context: StrategyContext) -> Self {
        Self {
            basic: BasicStrategy::new(context.clone()),
            local: LocalStrategy::new(context.clone()),
            context,
        }
    }

    async fn sign_in_locally(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        if LocalStrategy::accepts(request.trimmed_identity()) {
            self.context.clear_session().await;
        }
        let outcome = self.local.login(request).await?;
        Ok(LoginOutcome::fell_back(outcome.profile))
    }
}

#[async_trait]
impl ModeStrategy for HybridStrategy {
    fn mode(&self) -> AuthMode {
        AuthMode::Hybrid
    }

    #[instrument(skip(self, request), fields(identity = %request.trimmed_identity()))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        if request.secret.is_empty() {
            info!("No secret supplied; signing in locally");
            return self.sign_in_locally(request).await;
        }

        match self.basic.login(request).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if LocalStrategy::accepts(request.trimmed_identity()) => {
                warn!(error = %e, "Verification failed; falling back to local identity");
                self.sign_in_locally(request).await
            }
            Err(e) => Err(e),
        }
    }

    async fn init(&self) -> Option<Profile> {
        match self.basic.init().await {
            Some(profile) => Some(profile),
            None => self.local.init().await,
        }
    }

    async fn logout(&self) {
        self.context.clear_session().await;
    }
}
