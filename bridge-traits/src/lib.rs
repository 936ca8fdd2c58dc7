//! # Host Bridge Traits
//!
//! Capability traits the host platform implements for the session core.
//!
//! ## Overview
//!
//! The session core owns no global state: it never reaches for a process-wide
//! HTTP client, the browser's storage objects or its location bar. Each of
//! those is a capability injected through one of the traits below, so the
//! same logic runs in a browser shell, on desktop, or inside a unit test.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Raw request transport
//! - [`KeyValueStore`](storage::KeyValueStore) - Durable and session-scoped string storage
//! - [`Navigator`](navigation::Navigator) - Current path and redirects
//! - [`HeaderBag`](headers::HeaderBag) - Uniform view over header containers
//! - [`Clock`](time::Clock) - Time source for deterministic expiry
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to the host
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). The core treats
//! storage errors as recoverable and transport errors as "no response".
//!
//! ## Thread Safety
//!
//! Every capability is `Send + Sync` so it can be shared behind `Arc`
//! across async tasks.

pub mod error;
pub mod headers;
pub mod http;
pub mod navigation;
pub mod storage;
pub mod time;

pub use error::BridgeError;

pub use headers::HeaderBag;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use navigation::{NavigationState, Navigator};
pub use storage::KeyValueStore;
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
