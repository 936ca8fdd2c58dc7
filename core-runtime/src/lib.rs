//! # Core Runtime
//!
//! Runtime infrastructure shared by the session core:
//! - configuration ([`config::SessionSettings`], [`config::CoreConfig`])
//! - logging and tracing setup
//! - the [`events::EventBus`] for auth and navigation events
//!
//! Nothing here knows about credentials or routes; `core-auth` builds on
//! these pieces.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{AuthMode, CoreConfig, CoreConfigBuilder, SeedCredentials, SessionSettings};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus};
