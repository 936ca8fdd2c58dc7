//! # Session Core
//!
//! Client-side session and request-interception subsystem.
//!
//! ## Overview
//!
//! Decides, per configured [`AuthMode`], how a user's identity is
//! established, persisted, attached to outgoing requests and invalidated,
//! and turns every failed request into a navigation outcome.
//!
//! - [`CredentialStore`]: persisted credential records with expiry
//! - [`ModeStrategy`]: Local, Basic and Hybrid login/init/logout policies
//! - [`ApiClient`] and [`RequestInterceptor`]: the shared HTTP client
//! - [`ErrorClassifier`]: network, auth and status failure handling
//! - [`ReturnToNavigator`]: return-to path across a login detour
//! - [`AuthManager`]: wiring plus bootstrap/login/logout

pub mod classifier;
pub mod client;
pub mod credential_store;
pub mod error;
pub mod interceptor;
pub mod manager;
pub mod return_to;
pub mod routes;
pub mod session;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod testing;

pub use classifier::{Classification, ErrorClassifier, SUPPRESS_AUTH_REDIRECT_HEADER};
pub use client::{ApiClient, ApiClientConfig};
pub use credential_store::{CredentialStore, RetentionPolicy};
pub use error::{AuthError, Result};
pub use interceptor::RequestInterceptor;
pub use manager::AuthManager;
pub use return_to::{GuardOutcome, ReturnToNavigator};
pub use routes::Routes;
pub use session::SessionHandle;
pub use strategy::{ModeStrategy, StrategyContext};
pub use types::{
    AuthMode, CredentialKind, CredentialRecord, LoginOutcome, LoginRequest, Profile,
    SessionState, SessionStatus,
};
