#![allow(dead_code)]

use async_trait::async_trait;
use bridge_desktop::{HistoryNavigator, MemoryKeyValueStore, SqliteKeyValueStore};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, Clock, HeaderBag, HttpClient, HttpRequest, HttpResponse, RetryPolicy,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_auth::AuthManager;
use core_runtime::config::{CoreConfig, SessionSettings};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PROFILE_JSON: &str = r#"{"id": 7, "name": "Belisarius Cawl", "avatarUrl": "/cawl.png"}"#;
/// `Basic base64("cawl:omnissiah")`
pub const CAWL_AUTHORIZATION: &str = "Basic Y2F3bDpvbW5pc3NpYWg=";

pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Backend double: `users/me` answers the profile for cawl's credentials,
/// everything else answers `status_for_other` (or 200 when `None`).
pub struct FakeBackend {
    online: AtomicBool,
    other_status: Mutex<Option<u16>>,
    attempts: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            other_status: Mutex::new(None),
            attempts: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn respond_to_other_paths_with(&self, status: u16) {
        *self.other_status.lock().unwrap() = Some(status);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Transport attempts, retries included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;

        if !self.online.load(Ordering::SeqCst) {
            return Err(BridgeError::Network("connection refused".to_string()));
        }

        if request.url.ends_with("/users/me") {
            let authorized =
                HeaderBag::get(&request.headers, "Authorization") == Some(CAWL_AUTHORIZATION);
            return Ok(if authorized {
                HttpResponse::new(200, PROFILE_JSON)
            } else {
                HttpResponse::new(401, r#"{"error":"unauthorized"}"#)
            });
        }

        let status = self.other_status.lock().unwrap().unwrap_or(200);
        Ok(HttpResponse::new(status, "{}"))
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> BridgeResult<HttpResponse> {
        let mut last = Err(BridgeError::Network("no attempt made".to_string()));
        for _ in 0..policy.max_attempts.max(1) {
            last = self.execute(request.clone()).await;
            if last.is_ok() {
                break;
            }
        }
        last
    }
}

pub struct TestApp {
    pub auth: AuthManager,
    pub backend: Arc<FakeBackend>,
    pub durable: Arc<SqliteKeyValueStore>,
    pub session_store: Arc<MemoryKeyValueStore>,
    pub navigator: Arc<HistoryNavigator>,
    pub clock: Arc<TestClock>,
}

impl TestApp {
    pub async fn new(settings: SessionSettings) -> Self {
        Self::with_backend(settings, Arc::new(FakeBackend::new()), Arc::new(TestClock::new()))
            .await
    }

    pub async fn with_backend(
        settings: SessionSettings,
        backend: Arc<FakeBackend>,
        clock: Arc<TestClock>,
    ) -> Self {
        let durable = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
        Self::assemble(settings, backend, clock, durable)
    }

    /// A second app sharing durable storage with `self`, as after a restart.
    pub fn restart(&self, settings: SessionSettings) -> Self {
        Self::assemble(
            settings,
            self.backend.clone(),
            self.clock.clone(),
            self.durable.clone(),
        )
    }

    fn assemble(
        settings: SessionSettings,
        backend: Arc<FakeBackend>,
        clock: Arc<TestClock>,
        durable: Arc<SqliteKeyValueStore>,
    ) -> Self {
        let session_store = Arc::new(MemoryKeyValueStore::new());
        let navigator = Arc::new(HistoryNavigator::new("/"));
        let config = CoreConfig::builder()
            .settings(settings)
            .http_client(backend.clone())
            .durable_store(durable.clone())
            .session_store(session_store.clone())
            .navigator(navigator.clone())
            .clock(clock.clone())
            .retry_policy(RetryPolicy {
                max_attempts: 3,
                ..RetryPolicy::default()
            })
            .build()
            .unwrap();

        Self {
            auth: AuthManager::new(config).unwrap(),
            backend,
            durable,
            session_store,
            navigator,
            clock,
        }
    }

    /// Paths navigated to by the core (the initial entry excluded).
    pub fn redirects(&self) -> Vec<String> {
        self.navigator.history().into_iter().skip(1).collect()
    }
}
