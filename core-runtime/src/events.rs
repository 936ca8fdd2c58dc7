//! # Event Bus
//!
//! Broadcasts session lifecycle and navigation events to any interested
//! part of the host (UI state containers, analytics, log forwarders) using
//! `tokio::sync::broadcast`.
//!
//! ```text
//! ┌──────────────┐  emit   ┌───────────┐  subscribe  ┌────────────┐
//! │ AuthManager  ├────────>│           ├────────────>│ UI store   │
//! └──────────────┘         │ EventBus  │             └────────────┘
//! ┌──────────────┐  emit   │           │  subscribe  ┌────────────┐
//! │ErrorClassifier├───────>│           ├────────────>│ Telemetry  │
//! └──────────────┘         └───────────┘             └────────────┘
//! ```
//!
//! Emitting with no subscribers is not an error condition for the core;
//! emitters ignore the `SendError`.
//!
//! Subscribers that fall behind receive `RecvError::Lagged(n)` and can keep
//! reading; `RecvError::Closed` means every sender is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Top-level event enum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session lifecycle events
    Auth(AuthEvent),
    /// Redirects performed by the core
    Navigation(NavigationEvent),
}

/// Session lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthEvent {
    /// A login attempt completed successfully
    SignedIn {
        identity: String,
        mode: String,
        /// Hybrid mode could not verify the secret and signed in locally
        fell_back_to_local: bool,
    },
    /// A login attempt was rejected
    LoginFailed { message: String },
    /// Bootstrap found a usable persisted session
    SessionRestored { identity: String },
    /// The user signed out explicitly
    SignedOut,
    /// The server rejected a previously valid session
    SessionInvalidated { status: u16, path: String },
}

/// Why the core redirected the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RedirectReason {
    NetworkUnavailable,
    SessionExpired,
    ErrorStatus,
    LoginRequired,
    LoginCompleted,
}

/// Navigation events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigationEvent {
    Redirected {
        from: String,
        to: String,
        reason: RedirectReason,
    },
}

/// Central event bus.
///
/// Cheap to clone; every clone publishes into the same channel.
///
/// ```rust
/// use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
/// bus.emit(CoreEvent::Auth(AuthEvent::SignedOut)).ok();
/// assert_eq!(rx.try_recv().unwrap(), CoreEvent::Auth(AuthEvent::SignedOut));
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
