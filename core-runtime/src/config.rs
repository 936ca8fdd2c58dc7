//! # Core Configuration
//!
//! Two layers:
//!
//! - [`SessionSettings`]: plain values read once from the environment
//!   (API base URL, auth mode, optional seed credentials, base path,
//!   timeouts, retention windows).
//! - [`CoreConfig`]: the settings plus every injected capability
//!   (transport, durable and session-scoped storage, navigator, clock,
//!   event bus). Built with [`CoreConfigBuilder`], which fails fast when a
//!   required capability is missing.
//!
//! ## Environment
//!
//! | Variable                  | Default                     |
//! |---------------------------|-----------------------------|
//! | `APP_API_BASE_URL`        | `http://localhost:8080/api` |
//! | `APP_AUTH_MODE`           | `local`                     |
//! | `APP_AUTH_IDENTITY`       | unset                       |
//! | `APP_AUTH_SECRET`         | unset                       |
//! | `APP_BASE_PATH`           | empty                       |
//! | `APP_HTTP_TIMEOUT_SECS`   | `30`                        |
//! | `APP_AUTH_RETENTION_DAYS` | `7`                         |
//! | `APP_LOG_LEVEL`           | `info`                      |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, SessionSettings};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .settings(SessionSettings::from_env()?)
//!     .durable_store(Arc::new(SqliteKeyValueStore::new(path).await?))
//!     .build()?;
//! ```
//!
//! Without the `desktop-shims` feature the transport, session store and
//! navigator must be injected too:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing durable store");
//! ```

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::{
    Clock, HttpClient, KeyValueStore, LogLevel, Navigator, RetryPolicy, SystemClock,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "APP_API_BASE_URL";
pub const ENV_AUTH_MODE: &str = "APP_AUTH_MODE";
pub const ENV_AUTH_IDENTITY: &str = "APP_AUTH_IDENTITY";
pub const ENV_AUTH_SECRET: &str = "APP_AUTH_SECRET";
pub const ENV_BASE_PATH: &str = "APP_BASE_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "APP_HTTP_TIMEOUT_SECS";
pub const ENV_AUTH_RETENTION_DAYS: &str = "APP_AUTH_RETENTION_DAYS";
pub const ENV_LOG_LEVEL: &str = "APP_LOG_LEVEL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETENTION_DAYS: u32 = 7;
pub const DEFAULT_SESSION_RETENTION_HOURS: u32 = 12;
pub const MAX_RETENTION_DAYS: u32 = 3650;
pub const MAX_SESSION_RETENTION_HOURS: u32 = 24 * 365;

/// How identity is verified and persisted. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Identity only, no server verification
    #[default]
    Local,
    /// Identity and secret verified against the profile endpoint
    Basic,
    /// Basic first, Local when the server cannot verify
    Hybrid,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Local => "local",
            AuthMode::Basic => "basic",
            AuthMode::Hybrid => "hybrid",
        }
    }

    /// Case-insensitive parse of `local|basic|hybrid`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(AuthMode::Local),
            "basic" => Some(AuthMode::Basic),
            "hybrid" => Some(AuthMode::Hybrid),
            _ => None,
        }
    }

    /// Whether requests in this mode carry an `Authorization` header.
    pub fn sends_credentials(&self) -> bool {
        !matches!(self, AuthMode::Local)
    }
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AuthMode::parse(s).ok_or_else(|| {
            Error::Config(format!(
                "Unknown auth mode '{}'. Expected one of: local, basic, hybrid",
                s
            ))
        })
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity/secret pair supplied by the environment for unattended sessions.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedCredentials {
    pub identity: String,
    pub secret: String,
}

impl fmt::Debug for SeedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedCredentials")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Values read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Base URL every relative API path is resolved against
    pub api_base_url: String,
    pub auth_mode: AuthMode,
    pub seed: Option<SeedCredentials>,
    /// Normalized application base path (`""` or `/segment...`, no trailing slash)
    pub base_path: String,
    pub http_timeout: Duration,
    /// Lifetime of a persisted credential when the user asked to be remembered
    pub retention_days: u32,
    /// Lifetime of a persisted credential otherwise
    pub session_retention_hours: u32,
    pub log_level: LogLevel,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_mode: AuthMode::default(),
            seed: None,
            base_path: String::new(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            retention_days: DEFAULT_RETENTION_DAYS,
            session_retention_hours: DEFAULT_SESSION_RETENTION_HOURS,
            log_level: LogLevel::Info,
        }
    }
}

impl SessionSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let auth_mode = match read(ENV_AUTH_MODE) {
            Some(raw) => raw.parse()?,
            None => defaults.auth_mode,
        };

        let seed = match (read(ENV_AUTH_IDENTITY), lookup(ENV_AUTH_SECRET)) {
            (Some(identity), secret) => Some(SeedCredentials {
                identity,
                secret: secret.unwrap_or_default(),
            }),
            (None, _) => None,
        };

        let http_timeout = match read(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_number(ENV_HTTP_TIMEOUT_SECS, &raw)?),
            None => defaults.http_timeout,
        };

        let retention_days = match read(ENV_AUTH_RETENTION_DAYS) {
            Some(raw) => parse_number(ENV_AUTH_RETENTION_DAYS, &raw)?,
            None => defaults.retention_days,
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(raw) => LogLevel::parse(&raw).ok_or_else(|| {
                Error::Config(format!("{} has unknown level '{}'", ENV_LOG_LEVEL, raw))
            })?,
            None => defaults.log_level,
        };

        let settings = Self {
            api_base_url: read(ENV_API_BASE_URL).unwrap_or(defaults.api_base_url),
            auth_mode,
            seed,
            base_path: normalize_base_path(&read(ENV_BASE_PATH).unwrap_or_default()),
            http_timeout,
            retention_days,
            session_retention_hours: defaults.session_retention_hours,
            log_level,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    pub fn with_seed(mut self, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        self.seed = Some(SeedCredentials {
            identity: identity.into(),
            secret: secret.into(),
        });
        self
    }

    /// Sets the base path, normalizing it.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_session_retention_hours(mut self, hours: u32) -> Self {
        self.session_retention_hours = hours;
        self
    }

    /// Checks value ranges and that the API base URL is absolute.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_base_url).map_err(|e| {
            Error::Config(format!(
                "{} '{}' is not a valid URL: {}",
                ENV_API_BASE_URL, self.api_base_url, e
            ))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "{} '{}' cannot be used as a base URL",
                ENV_API_BASE_URL, self.api_base_url
            )));
        }

        if self.http_timeout.is_zero() {
            return Err(Error::Config(format!(
                "{} must be greater than zero",
                ENV_HTTP_TIMEOUT_SECS
            )));
        }

        if self.retention_days == 0 || self.session_retention_hours == 0 {
            return Err(Error::Config(
                "Credential retention windows must be greater than zero".to_string(),
            ));
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(Error::Config(format!(
                "{} must be at most {}, got {}",
                ENV_AUTH_RETENTION_DAYS, MAX_RETENTION_DAYS, self.retention_days
            )));
        }
        if self.session_retention_hours > MAX_SESSION_RETENTION_HOURS {
            return Err(Error::Config(format!(
                "Session retention must be at most {} hours, got {}",
                MAX_SESSION_RETENTION_HOURS, self.session_retention_hours
            )));
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{} must be a whole number, got '{}'", key, raw)))
}

/// Normalizes an application base path to `""` or `/a/b` (leading slash, no trailing slash).
///
/// ```
/// use core_runtime::config::normalize_base_path;
///
/// assert_eq!(normalize_base_path("app/"), "/app");
/// assert_eq!(normalize_base_path("/"), "");
/// ```
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Settings plus injected capabilities.
#[derive(Clone)]
pub struct CoreConfig {
    pub settings: SessionSettings,

    /// Transport used by the API client
    pub http_client: Arc<dyn HttpClient>,

    /// Storage that outlives the process (credential records)
    pub durable_store: Arc<dyn KeyValueStore>,

    /// Storage scoped to the current session (return target)
    pub session_store: Arc<dyn KeyValueStore>,

    pub navigator: Arc<dyn Navigator>,

    pub clock: Arc<dyn Clock>,

    pub event_bus: EventBus,

    /// Retry policy applied by the API client to every request
    pub retry_policy: RetryPolicy,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("settings", &self.settings)
            .field("http_client", &"HttpClient { ... }")
            .field("durable_store", &"KeyValueStore { ... }")
            .field("session_store", &"KeyValueStore { ... }")
            .field("navigator", &"Navigator { ... }")
            .field("clock", &"Clock { ... }")
            .field("event_bus", &self.event_bus)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

fn durable_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "A durable KeyValueStore is required for credential persistence. \
                  Desktop: inject SqliteKeyValueStore. \
                  Web: inject a localStorage-backed store."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, hint: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required. Enable the 'desktop-shims' feature for the \
             desktop default or inject {}.",
            capability, hint
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(settings: &SessionSettings) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(settings.http_timeout));
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_settings: &SessionSettings) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing("HttpClient", "a platform HTTP transport"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_session_store() -> Result<Arc<dyn KeyValueStore>> {
    use bridge_desktop::MemoryKeyValueStore;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_session_store() -> Result<Arc<dyn KeyValueStore>> {
    Err(capability_missing(
        "Session KeyValueStore",
        "a sessionStorage-backed store",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_navigator() -> Result<Arc<dyn Navigator>> {
    use bridge_desktop::HistoryNavigator;

    let navigator: Arc<dyn Navigator> = Arc::new(HistoryNavigator::default());
    Ok(navigator)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_navigator() -> Result<Arc<dyn Navigator>> {
    Err(capability_missing("Navigator", "the host router"))
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    settings: Option<SessionSettings>,
    http_client: Option<Arc<dyn HttpClient>>,
    durable_store: Option<Arc<dyn KeyValueStore>>,
    session_store: Option<Arc<dyn KeyValueStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    clock: Option<Arc<dyn Clock>>,
    event_bus: Option<EventBus>,
    retry_policy: Option<RetryPolicy>,
}

impl CoreConfigBuilder {
    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the durable store (required).
    pub fn durable_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.durable_store = Some(store);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Validates the settings and resolves every capability.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when the settings are invalid
    /// - [`Error::CapabilityMissing`] when a capability was neither injected
    ///   nor has a default for this build
    pub fn build(self) -> Result<CoreConfig> {
        let settings = self.settings.unwrap_or_default();
        settings.validate()?;

        let durable_store = self.durable_store.ok_or_else(durable_store_missing_error)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&settings)?,
        };

        let session_store = match self.session_store {
            Some(store) => store,
            None => provide_default_session_store()?,
        };

        let navigator = match self.navigator {
            Some(navigator) => navigator,
            None => provide_default_navigator()?,
        };

        Ok(CoreConfig {
            settings,
            http_client,
            durable_store,
            session_store,
            navigator,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_bus: self.event_bus.unwrap_or_default(),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}
