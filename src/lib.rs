//! Workspace façade crate.
//!
//! Host applications depend on `session-core-workspace` and get the session
//! core wired to the desktop bridge through the `desktop-shims` feature,
//! without naming each workspace crate individually.
//!
//! ```ignore
//! use session_core_workspace::{init_logging, AuthManager, CoreConfig, LoggingConfig, SessionSettings};
//!
//! let settings = SessionSettings::from_env()?;
//! init_logging(LoggingConfig::from_settings(&settings))?;
//!
//! let config = CoreConfig::builder()
//!     .settings(settings)
//!     .durable_store(durable)
//!     .build()?;
//! let auth = AuthManager::new(config)?;
//! auth.bootstrap().await;
//! ```

#[cfg(feature = "desktop-shims")]
pub use core_auth::{
    AuthError, AuthManager, AuthMode, CredentialKind, CredentialRecord, GuardOutcome, Profile,
    SessionState, SessionStatus,
};

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{
    config::{CoreConfig, SessionSettings},
    events::{CoreEvent, EventBus},
    logging::{init_logging, LoggingConfig},
};
