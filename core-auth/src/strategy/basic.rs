use super::{ModeStrategy, StrategyContext, PROFILE_ENDPOINT};
use crate::classifier::SUPPRESS_AUTH_REDIRECT_HEADER;
use crate::error::{AuthError, Result};
use crate::interceptor::AUTHORIZATION;
use crate::types::{
    basic_authorization, AuthMode, CredentialKind, CredentialRecord, LoginOutcome, LoginRequest,
    Profile,
};
use async_trait::async_trait;
use bridge_traits::HttpMethod;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Identity and secret verified by the profile endpoint.
pub struct BasicStrategy {
    context: StrategyContext,
}

impl BasicStrategy {
    pub fn new(context: StrategyContext) -> Self {
        Self { context }
    }

    /// `GET users/me` with the opt-out header set. Without an explicit
    /// `authorization` the interceptor supplies the stored one.
    async fn fetch_profile(&self, authorization: Option<&str>, identity: &str) -> Result<Profile> {
        let mut request = self
            .context
            .client
            .request(HttpMethod::Get, PROFILE_ENDPOINT)?
            .header(SUPPRESS_AUTH_REDIRECT_HEADER, "true");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = self.context.client.send(request).await?;
        let payload: Value = response.json()?;
        Ok(Profile::from_payload(&payload, identity))
    }
}

fn login_failure_message(error: &AuthError) -> &'static str {
    match error {
        AuthError::SessionInvalidated { .. } => "Invalid identity or secret",
        AuthError::UnhandledStatus { status, .. } if matches!(status, 401 | 403) => {
            "Invalid identity or secret"
        }
        AuthError::NetworkUnavailable(_) => "Unable to reach the server",
        _ => "Unable to verify credentials",
    }
}

#[async_trait]
impl ModeStrategy for BasicStrategy {
    fn mode(&self) -> AuthMode {
        AuthMode::Basic
    }

    #[instrument(skip(self, request), fields(identity = %request.trimmed_identity()))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        let identity = request.trimmed_identity();
        if identity.is_empty() || request.secret.is_empty() {
            return Err(AuthError::AuthenticationFailed(
                "Identity and secret are required".to_string(),
            ));
        }

        let authorization = basic_authorization(identity, &request.secret);
        let profile = self
            .fetch_profile(Some(&authorization), identity)
            .await
            .map_err(|e| {
                warn!(error = %e, "Credential verification failed");
                AuthError::AuthenticationFailed(login_failure_message(&e).to_string())
            })?;

        let expires_at = self
            .context
            .retention
            .expires_at(self.context.credentials.now(), request.remember)?;
        let record = CredentialRecord::basic(identity, request.secret.as_str(), expires_at);
        if let Err(e) = self
            .context
            .credentials
            .save(CredentialKind::Basic, &record)
            .await
        {
            warn!(error = %e, "Verified session will not survive a restart");
        }

        info!(profile_id = profile.id, "Signed in with verified credentials");
        Ok(LoginOutcome::new(profile))
    }

    async fn init(&self) -> Option<Profile> {
        let record = self.context.credentials.read(CredentialKind::Basic).await?;

        match self.fetch_profile(None, &record.identity).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                if matches!(e.status(), Some(401 | 403)) {
                    debug!("Stored credentials rejected; discarding them");
                    self.context.credentials.remove(CredentialKind::Basic).await;
                    self.context.client.reset_headers();
                } else {
                    debug!(error = %e, "Silent profile fetch failed");
                }
                None
            }
        }
    }

    async fn logout(&self) {
        self.context.clear_session().await;
    }
}
