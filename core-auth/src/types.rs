use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use core_runtime::config::AuthMode;

/// Shape of a persisted credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Identity plus secret, verified by the server
    Basic,
    /// Identity only
    Local,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Basic => f.write_str("basic"),
            CredentialKind::Local => f.write_str("local"),
        }
    }
}

/// A credential as persisted in durable storage.
///
/// Wire form: `{"identity": "...", "secret": "...", "expiresAt": <epoch ms>}`.
/// The secret is omitted for identity-only records.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Expiry in milliseconds since the Unix epoch
    pub expires_at: i64,
}

impl CredentialRecord {
    /// Secret-bearing record.
    pub fn basic(
        identity: impl Into<String>,
        secret: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: identity.into(),
            secret: Some(secret.into()),
            expires_at: expires_at.timestamp_millis(),
        }
    }

    /// Identity-only record.
    pub fn local(identity: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            identity: identity.into(),
            secret: None,
            expires_at: expires_at.timestamp_millis(),
        }
    }

    /// A record is valid only while `now < expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.expires_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at).single()
    }

    /// `Basic base64(identity:secret)`, or `None` for identity-only records.
    pub fn authorization_header(&self) -> Option<String> {
        self.secret
            .as_deref()
            .map(|secret| basic_authorization(&self.identity, secret))
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identity", &self.identity)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Encodes an identity/secret pair as an `Authorization` header value.
///
/// ```
/// use core_auth::types::basic_authorization;
///
/// assert_eq!(basic_authorization("user", "pass"), "Basic dXNlcjpwYXNz");
/// ```
pub fn basic_authorization(identity: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", identity, secret)))
}

/// The signed-in user as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Profile {
    /// Profile used when the server is not consulted.
    pub fn placeholder(identity: &str) -> Self {
        Self {
            id: 0,
            name: identity.to_string(),
            avatar_url: None,
            email: None,
        }
    }

    /// Normalizes a profile payload from the server.
    ///
    /// `id` comes from `id`, `user_id` or `userId` (numbers or numeric
    /// strings), defaulting to 0. `name` comes from `name` or `username`,
    /// defaulting to `identity`.
    pub fn from_payload(payload: &Value, identity: &str) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let id = ["id", "user_id", "userId"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(numeric_id))
            .unwrap_or(0);

        let name = text("name")
            .or_else(|| text("username"))
            .unwrap_or_else(|| identity.to_string());

        Self {
            id,
            name,
            avatar_url: text("avatarUrl").or_else(|| text("avatar_url")),
            email: text("email"),
        }
    }
}

fn numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Login input. `remember` selects the long retention window.
#[derive(Clone)]
pub struct LoginRequest {
    pub identity: String,
    pub secret: String,
    pub remember: bool,
}

impl LoginRequest {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>, remember: bool) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
            remember,
        }
    }

    pub fn trimmed_identity(&self) -> &str {
        self.identity.trim()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub profile: Profile,
    /// Hybrid mode could not verify the secret and signed in locally
    pub fell_back_to_local: bool,
}

impl LoginOutcome {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            fell_back_to_local: false,
        }
    }

    pub fn fell_back(profile: Profile) -> Self {
        Self {
            profile,
            fell_back_to_local: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Snapshot of the session as exposed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub profile: Option<Profile>,
    pub mode: AuthMode,
    pub status: SessionStatus,
    pub error: Option<String>,
}

impl SessionState {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            profile: None,
            mode,
            status: SessionStatus::Idle,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_record_wire_format() {
        let expires = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let record = CredentialRecord::basic("archmagos", "omnissiah", expires);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"identity": "archmagos", "secret": "omnissiah", "expiresAt": 1_700_000_000_000i64})
        );

        let local = CredentialRecord::local("archmagos", expires);
        let json = serde_json::to_string(&local).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_record_expiry_boundary() {
        let now = Utc::now();
        let record = CredentialRecord::local("servitor", now);
        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let record = CredentialRecord::basic("archmagos", "omnissiah", Utc::now());
        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("omnissiah"));

        let request = LoginRequest::new("archmagos", "omnissiah", true);
        assert!(!format!("{:?}", request).contains("omnissiah"));
    }

    #[test]
    fn test_authorization_header() {
        let record = CredentialRecord::basic("user", "pass", Utc::now());
        assert_eq!(
            record.authorization_header().as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
        assert!(CredentialRecord::local("user", Utc::now())
            .authorization_header()
            .is_none());
    }

    #[test]
    fn test_profile_normalization() {
        let full = Profile::from_payload(
            &json!({"id": 7, "name": "Belisarius", "avatarUrl": "/a.png", "email": "b@forge.test"}),
            "ignored",
        );
        assert_eq!(full.id, 7);
        assert_eq!(full.name, "Belisarius");
        assert_eq!(full.avatar_url.as_deref(), Some("/a.png"));
        assert_eq!(full.email.as_deref(), Some("b@forge.test"));

        let legacy = Profile::from_payload(&json!({"user_id": "12", "username": "cawl"}), "x");
        assert_eq!(legacy.id, 12);
        assert_eq!(legacy.name, "cawl");

        let camel = Profile::from_payload(&json!({"userId": 3}), "archmagos");
        assert_eq!(camel.id, 3);
        assert_eq!(camel.name, "archmagos");

        let empty = Profile::from_payload(&json!({}), "archmagos");
        assert_eq!(empty, Profile::placeholder("archmagos"));
    }

    #[test]
    fn test_session_state_authentication_follows_profile() {
        let mut state = SessionState::new(AuthMode::Basic);
        assert!(!state.is_authenticated());
        state.profile = Some(Profile::placeholder("servitor"));
        assert!(state.is_authenticated());
    }
}
