//! # Credential Store
//!
//! Persists credential records in durable key-value storage and enforces
//! expiry on read. Mode-agnostic: callers say which [`CredentialKind`] they
//! want and the store maps it to storage keys.
//!
//! | Kind  | Write key                | Read keys (in order)                  |
//! |-------|--------------------------|---------------------------------------|
//! | Basic | `auth.basic.credentials` | `auth.basic.credentials`, `basicAuth` |
//! | Local | `auth.local.credentials` | `auth.local.credentials`              |
//!
//! Reads never fail: anything that does not validate is deleted and reported
//! as absent. Storage errors are logged and swallowed.

use crate::error::{AuthError, Result};
use crate::types::{CredentialKind, CredentialRecord};
use bridge_traits::{Clock, KeyValueStore};
use chrono::{DateTime, Duration, Utc};
use core_runtime::config::SessionSettings;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BASIC_CREDENTIALS_KEY: &str = "auth.basic.credentials";
/// Read for compatibility with records written by older clients.
pub const LEGACY_BASIC_CREDENTIALS_KEY: &str = "basicAuth";
pub const LOCAL_CREDENTIALS_KEY: &str = "auth.local.credentials";

const ALL_KEYS: &[&str] = &[
    BASIC_CREDENTIALS_KEY,
    LEGACY_BASIC_CREDENTIALS_KEY,
    LOCAL_CREDENTIALS_KEY,
];

impl CredentialKind {
    fn write_key(&self) -> &'static str {
        match self {
            CredentialKind::Basic => BASIC_CREDENTIALS_KEY,
            CredentialKind::Local => LOCAL_CREDENTIALS_KEY,
        }
    }

    fn read_keys(&self) -> &'static [&'static str] {
        match self {
            CredentialKind::Basic => &[BASIC_CREDENTIALS_KEY, LEGACY_BASIC_CREDENTIALS_KEY],
            CredentialKind::Local => &[LOCAL_CREDENTIALS_KEY],
        }
    }
}

/// How long a saved credential stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Window used when the user asked to be remembered
    pub remember: Duration,
    pub session: Duration,
}

impl RetentionPolicy {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            remember: Duration::days(i64::from(settings.retention_days)),
            session: Duration::hours(i64::from(settings.session_retention_hours)),
        }
    }

    /// # Errors
    ///
    /// [`AuthError::Runtime`] when the window runs past the representable date range.
    pub fn expires_at(&self, now: DateTime<Utc>, remember: bool) -> Result<DateTime<Utc>> {
        let window = if remember { self.remember } else { self.session };
        now.checked_add_signed(window).ok_or_else(|| {
            core_runtime::Error::Config(format!(
                "Credential retention window of {} days is out of range",
                window.num_days()
            ))
            .into()
        })
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_settings(&SessionSettings::default())
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Writes `record` under the kind's primary key, replacing any previous one.
    pub async fn save(&self, kind: CredentialKind, record: &CredentialRecord) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        self.store.set(kind.write_key(), &payload).await?;
        debug!(kind = %kind, identity = %record.identity, "Saved credential record");
        Ok(())
    }

    /// Returns the first record for `kind` that validates.
    ///
    /// Invalid or expired entries met along the way are deleted.
    pub async fn read(&self, kind: CredentialKind) -> Option<CredentialRecord> {
        for key in kind.read_keys() {
            let raw = match self.store.get(key).await {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key, error = %e, "Failed to read credential record");
                    continue;
                }
            };

            match self.validate(kind, &raw) {
                Ok(record) => return Some(record),
                Err(e) => {
                    debug!(key, reason = %e, "Discarding stored credential");
                    if let Err(e) = self.store.remove(key).await {
                        warn!(key, error = %e, "Failed to purge credential record");
                    }
                }
            }
        }
        None
    }

    /// Removes every key `kind` is read from.
    pub async fn remove(&self, kind: CredentialKind) {
        for key in kind.read_keys() {
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "Failed to remove credential record");
            }
        }
    }

    /// Removes every credential key for every mode.
    pub async fn clear(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "Failed to remove credential record");
            }
        }
        debug!("Cleared credential records");
    }

    fn validate(&self, kind: CredentialKind, raw: &str) -> Result<CredentialRecord> {
        let mut record: CredentialRecord = serde_json::from_str(raw)
            .map_err(|e| AuthError::InvalidCredentialFormat(e.to_string()))?;

        record.identity = record.identity.trim().to_string();
        if record.identity.is_empty() {
            return Err(AuthError::InvalidCredentialFormat(
                "identity is empty".to_string(),
            ));
        }

        if kind == CredentialKind::Basic
            && record.secret.as_deref().map_or(true, str::is_empty)
        {
            return Err(AuthError::InvalidCredentialFormat(
                "secret is missing".to_string(),
            ));
        }

        if record.is_expired_at(self.clock.now()) {
            return Err(AuthError::ExpiredCredential);
        }

        Ok(record)
    }
}
