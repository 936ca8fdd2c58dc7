//! In-memory capability doubles shared by the unit tests.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, Clock, HttpClient, HttpRequest, HttpResponse, KeyValueStore, NavigationState,
    Navigator,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> BridgeResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn keys(&self) -> BridgeResult<Vec<String>> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }
}

pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> BridgeResult<Option<String>> {
        Err(BridgeError::Storage("unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> BridgeResult<()> {
        Err(BridgeError::Storage("unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> BridgeResult<()> {
        Err(BridgeError::Storage("unavailable".to_string()))
    }

    async fn keys(&self) -> BridgeResult<Vec<String>> {
        Err(BridgeError::Storage("unavailable".to_string()))
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

type Responder = Box<dyn Fn(&HttpRequest) -> BridgeResult<HttpResponse> + Send + Sync>;

/// Transport that answers from a closure and records every request.
pub struct ScriptedTransport {
    responder: Responder,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> BridgeResult<HttpResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `status` with `body`.
    pub fn status(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(HttpResponse::new(status, body)))
    }

    pub fn offline() -> Self {
        Self::new(|_| Err(BridgeError::Network("connection refused".to_string())))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

/// Navigator that records redirects and moves to the target.
pub struct RecordingNavigator {
    current: Mutex<(String, Option<NavigationState>)>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new((path.to_string(), None)),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().0.clone()
    }

    fn redirect(&self, target: &str, state: Option<NavigationState>) {
        *self.current.lock().unwrap() = (target.to_string(), state);
        self.redirects.lock().unwrap().push(target.to_string());
    }

    fn current_state(&self) -> Option<NavigationState> {
        self.current.lock().unwrap().1.clone()
    }
}

/// Fully wired client for a mode, on in-memory capabilities.
pub struct Harness {
    pub durable: std::sync::Arc<MemoryStore>,
    pub clock: std::sync::Arc<ManualClock>,
    pub navigator: std::sync::Arc<RecordingNavigator>,
    pub credentials: crate::credential_store::CredentialStore,
    pub client: std::sync::Arc<crate::client::ApiClient>,
}

impl Harness {
    pub fn new(mode: crate::types::AuthMode, transport: std::sync::Arc<dyn HttpClient>) -> Self {
        use crate::classifier::ErrorClassifier;
        use crate::client::{ApiClient, ApiClientConfig};
        use crate::credential_store::CredentialStore;
        use crate::interceptor::RequestInterceptor;
        use crate::return_to::ReturnToNavigator;
        use crate::routes::Routes;
        use crate::session::SessionHandle;
        use bridge_traits::RetryPolicy;
        use core_runtime::events::EventBus;
        use std::sync::Arc;

        let durable = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::default());
        let navigator = Arc::new(RecordingNavigator::at("/"));
        let credentials = CredentialStore::new(durable.clone(), clock.clone());
        let events = EventBus::default();
        let return_to = Arc::new(ReturnToNavigator::new(
            Arc::new(MemoryStore::default()),
            navigator.clone(),
            Routes::default(),
            events.clone(),
        ));
        let classifier = Arc::new(ErrorClassifier::new(
            mode,
            navigator.clone(),
            credentials.clone(),
            return_to,
            SessionHandle::new(mode),
            events,
        ));
        let client = Arc::new(
            ApiClient::new(
                transport,
                ApiClientConfig {
                    base_url: "http://localhost:8080/api".to_string(),
                    timeout: std::time::Duration::from_secs(5),
                    retry_policy: RetryPolicy::none(),
                },
                RequestInterceptor::new(mode, credentials.clone()),
                classifier,
            )
            .unwrap(),
        );

        Self {
            durable,
            clock,
            navigator,
            credentials,
            client,
        }
    }

    pub fn strategy_context(&self) -> crate::strategy::StrategyContext {
        crate::strategy::StrategyContext {
            client: self.client.clone(),
            credentials: self.credentials.clone(),
            retention: crate::credential_store::RetentionPolicy::default(),
        }
    }
}
