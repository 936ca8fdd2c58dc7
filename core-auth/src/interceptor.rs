//! Attaches credentials to outgoing requests.
//!
//! Runs on every request the [`ApiClient`](crate::client::ApiClient) sends.
//! The stored record is re-read each time, so a logout or an expiry takes
//! effect on the very next request.

use crate::credential_store::CredentialStore;
use crate::types::{AuthMode, CredentialKind};
use bridge_traits::HeaderBag;
use tracing::trace;

pub const AUTHORIZATION: &str = "Authorization";

pub struct RequestInterceptor {
    mode: AuthMode,
    credentials: CredentialStore,
}

impl RequestInterceptor {
    pub fn new(mode: AuthMode, credentials: CredentialStore) -> Self {
        Self { mode, credentials }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Local mode: strips `Authorization`. Otherwise sets it from the stored
    /// Basic record, or leaves the headers untouched when there is none.
    pub async fn apply<H>(&self, headers: &mut H)
    where
        H: HeaderBag + Send + ?Sized,
    {
        if !self.mode.sends_credentials() {
            if headers.remove(AUTHORIZATION).is_some() {
                trace!("Stripped Authorization header in local mode");
            }
            return;
        }

        if let Some(value) = self
            .credentials
            .read(CredentialKind::Basic)
            .await
            .and_then(|record| record.authorization_header())
        {
            headers.set(AUTHORIZATION, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, MemoryStore};
    use crate::types::CredentialRecord;
    use bridge_traits::Clock;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn interceptor(mode: AuthMode, with_record: bool) -> RequestInterceptor {
        let clock = Arc::new(ManualClock::default());
        let credentials = CredentialStore::new(Arc::new(MemoryStore::default()), clock.clone());
        if with_record {
            let record = CredentialRecord::basic("user", "pass", clock.now() + Duration::days(1));
            credentials
                .save(CredentialKind::Basic, &record)
                .await
                .unwrap();
        }
        RequestInterceptor::new(mode, credentials)
    }

    #[tokio::test]
    async fn test_attaches_header_to_map() {
        let interceptor = interceptor(AuthMode::Basic, true).await;
        let mut headers: HashMap<String, String> = HashMap::new();
        headers.set("accept", "application/json");

        interceptor.apply(&mut headers).await;

        assert_eq!(
            HeaderBag::get(&headers, "authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
        assert_eq!(HeaderBag::get(&headers, "Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_attaches_header_to_legacy_pairs() {
        let interceptor = interceptor(AuthMode::Hybrid, true).await;
        let mut headers: Vec<(String, String)> =
            vec![("authorization".to_string(), "Basic stale".to_string())];

        interceptor.apply(&mut headers).await;

        assert_eq!(headers.len(), 1);
        assert_eq!(
            HeaderBag::get(&headers, AUTHORIZATION),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[tokio::test]
    async fn test_without_record_leaves_headers_untouched() {
        let interceptor = interceptor(AuthMode::Basic, false).await;
        let mut headers: Vec<(String, String)> = vec![("X-Trace".to_string(), "1".to_string())];

        interceptor.apply(&mut headers).await;

        assert_eq!(headers, vec![("X-Trace".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_local_mode_strips_authorization() {
        let interceptor = interceptor(AuthMode::Local, true).await;
        let mut headers: HashMap<String, String> = HashMap::new();
        headers.set(AUTHORIZATION, "Basic leftover");

        interceptor.apply(&mut headers).await;

        assert!(!HeaderBag::contains(&headers, AUTHORIZATION));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let interceptor = interceptor(AuthMode::Basic, true).await;
        let mut pairs: Vec<(String, String)> = Vec::new();
        let bag: &mut (dyn HeaderBag + Send) = &mut pairs;

        interceptor.apply(bag).await;

        assert!(HeaderBag::contains(&pairs, AUTHORIZATION));
    }
}
