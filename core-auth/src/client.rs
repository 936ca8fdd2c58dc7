//! # API Client
//!
//! The HTTP client the rest of the application talks to the backend with.
//! Explicitly constructed and injected; there is no global instance.
//!
//! Every request goes through the same pipeline:
//!
//! 1. instance default headers (`Accept: application/json` always), with
//!    the request's own headers winning; a default `Authorization` is ignored
//! 2. [`RequestInterceptor`] attaches or strips credentials from the stored
//!    record; an `Authorization` header supplied by the caller is kept
//!    outside local mode
//! 3. the injected transport executes it under the configured retry policy
//! 4. failures are handed to the [`ErrorClassifier`] and returned as
//!    [`AuthError`] with the original status and body

use crate::classifier::{Classification, ErrorClassifier, SUPPRESS_AUTH_REDIRECT_HEADER};
use crate::error::{AuthError, Result};
use crate::interceptor::{RequestInterceptor, AUTHORIZATION};
use bridge_traits::{HeaderBag, HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use core_runtime::config::SessionSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

pub const ACCEPT: &str = "Accept";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl ApiClientConfig {
    pub fn from_settings(settings: &SessionSettings, retry_policy: RetryPolicy) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            timeout: settings.http_timeout,
            retry_policy,
        }
    }
}

struct ResolvedConfig {
    base_url: Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ResolvedConfig {
    fn resolve(config: ApiClientConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            core_runtime::Error::Config(format!("Invalid API base URL '{}': {}", config.base_url, e))
        })?;
        Ok(Self {
            base_url,
            timeout: config.timeout,
            retry_policy: config.retry_policy,
        })
    }
}

fn permanent_headers() -> HashMap<String, String> {
    HashMap::from([(ACCEPT.to_string(), APPLICATION_JSON.to_string())])
}

pub struct ApiClient {
    transport: Arc<dyn HttpClient>,
    config: RwLock<ResolvedConfig>,
    default_headers: RwLock<HashMap<String, String>>,
    interceptor: RequestInterceptor,
    classifier: Arc<ErrorClassifier>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpClient>,
        config: ApiClientConfig,
        interceptor: RequestInterceptor,
        classifier: Arc<ErrorClassifier>,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            config: RwLock::new(ResolvedConfig::resolve(config)?),
            default_headers: RwLock::new(permanent_headers()),
            interceptor,
            classifier,
        })
    }

    /// Re-applies base URL, timeout and retry policy and resets the
    /// default headers.
    pub fn init(&self, config: ApiClientConfig) -> Result<()> {
        let resolved = ResolvedConfig::resolve(config)?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = resolved;
        self.reset_headers();
        Ok(())
    }

    pub fn base_url(&self) -> String {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url
            .to_string()
    }

    /// Drops every default header except the permanent ones.
    pub fn reset_headers(&self) {
        *self
            .default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = permanent_headers();
        debug!("Reset default headers");
    }

    pub fn set_default_header(&self, name: &str, value: &str) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(name, value);
    }

    pub fn default_headers(&self) -> HashMap<String, String> {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute.to_string());
        }
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        config
            .base_url
            .join(path.trim_start_matches('/'))
            .map(|url| url.to_string())
            .map_err(|e| {
                AuthError::Runtime(core_runtime::Error::Config(format!(
                    "Cannot resolve '{}' against the API base URL: {}",
                    path, e
                )))
            })
    }

    pub fn request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::new(method, self.url(path)?))
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send(self.request(HttpMethod::Get, path)?).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.get(path).await?.json()?)
    }

    pub async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<HttpResponse> {
        self.send(self.request(HttpMethod::Post, path)?.json(body)?)
            .await
    }

    pub async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<HttpResponse> {
        self.send(self.request(HttpMethod::Put, path)?.json(body)?)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
        self.send(self.request(HttpMethod::Delete, path)?).await
    }

    /// Sends `request` through the full pipeline.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NetworkUnavailable`] when no response was received
    /// - [`AuthError::SessionInvalidated`] when the server rejected the session
    /// - [`AuthError::UnhandledStatus`] for any other non-success status
    #[instrument(
        skip(self, request),
        fields(method = request.method.as_str(), url = %request.url, request_id = %Uuid::new_v4())
    )]
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        let (timeout, policy) = {
            let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
            (config.timeout, config.retry_policy.clone())
        };

        let suppress_redirect = HeaderBag::contains(&request.headers, SUPPRESS_AUTH_REDIRECT_HEADER);
        let caller_authorization = HeaderBag::get(&request.headers, AUTHORIZATION)
            .map(str::to_string)
            .filter(|_| self.interceptor.mode().sends_credentials());

        let mut headers = self.default_headers();
        // Credentials come from the stored record or the caller, never from defaults.
        HeaderBag::remove(&mut headers, AUTHORIZATION);
        for (name, value) in &request.headers {
            headers.set(name, value);
        }
        self.interceptor.apply(&mut headers).await;
        if let Some(value) = caller_authorization {
            headers.set(AUTHORIZATION, &value);
        }
        request.headers = headers;
        request.timeout.get_or_insert(timeout);

        let response = match self.transport.execute_with_retry(request, policy).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed without a response");
                self.classifier.classify_transport_failure().await;
                return Err(AuthError::NetworkUnavailable(e.to_string()));
            }
        };

        if response.is_success() {
            debug!(status = response.status, "Request succeeded");
            return Ok(response);
        }

        let status = response.status;
        let body = String::from_utf8_lossy(&response.body).into_owned();
        debug!(status, "Request failed with status");

        match self
            .classifier
            .classify_status(status, suppress_redirect)
            .await
        {
            Classification::SessionInvalidated => {
                self.reset_headers();
                Err(AuthError::SessionInvalidated { status, body })
            }
            _ => Err(AuthError::UnhandledStatus { status, body }),
        }
    }
}
