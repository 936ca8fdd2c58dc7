//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - durable `KeyValueStore` using an SQLite file
//! - session-scoped `KeyValueStore` held in memory
//! - `Navigator` backed by an in-process route history
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MemoryKeyValueStore, ReqwestHttpClient, SqliteKeyValueStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     let durable = SqliteKeyValueStore::new("/tmp/app/storage.db".into()).await.unwrap();
//!     let session = MemoryKeyValueStore::new();
//!     // Inject into CoreConfig
//! }
//! ```

mod http;
mod memory;
mod navigator;
mod storage;

pub use http::ReqwestHttpClient;
pub use memory::MemoryKeyValueStore;
pub use navigator::{HistoryNavigator, DEFAULT_HISTORY_LIMIT};
pub use storage::SqliteKeyValueStore;
