//! Shared, lock-protected [`SessionState`].
//!
//! The manager, the strategies' callers and the error classifier all hold a
//! clone of the same [`SessionHandle`]; every transition goes through it so
//! `is_authenticated` always follows `profile`.

use crate::types::{AuthMode, Profile, SessionState, SessionStatus};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::new(mode))),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    /// Marks an operation in flight, keeping the current profile.
    pub async fn begin(&self) {
        let mut state = self.inner.write().await;
        state.status = SessionStatus::Loading;
        state.error = None;
    }

    pub async fn succeed(&self, profile: Profile) -> SessionState {
        let mut state = self.inner.write().await;
        state.profile = Some(profile);
        state.status = SessionStatus::Succeeded;
        state.error = None;
        state.clone()
    }

    /// Records a failed login. The session is left unauthenticated.
    pub async fn fail(&self, message: impl Into<String>) -> SessionState {
        let mut state = self.inner.write().await;
        state.profile = None;
        state.status = SessionStatus::Failed;
        state.error = Some(message.into());
        state.clone()
    }

    /// Back to unauthenticated `Idle`.
    pub async fn reset(&self) -> SessionState {
        let mut state = self.inner.write().await;
        let mode = state.mode;
        *state = SessionState::new(mode);
        state.clone()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transitions() {
        let session = SessionHandle::new(AuthMode::Local);
        session.begin().await;
        assert_eq!(session.snapshot().await.status, SessionStatus::Loading);

        let state = session.succeed(Profile::placeholder("archmagos")).await;
        assert!(state.is_authenticated());
        assert_eq!(state.status, SessionStatus::Succeeded);

        let state = session.fail("Invalid credentials").await;
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));

        let state = session.reset().await;
        assert_eq!(state, SessionState::new(AuthMode::Local));
    }
}
