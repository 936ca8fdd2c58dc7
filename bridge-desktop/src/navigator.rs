//! In-process route history

use bridge_traits::navigation::{NavigationState, Navigator};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Entries kept by [`HistoryNavigator::new`].
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone)]
struct HistoryEntry {
    path: String,
    state: Option<NavigationState>,
}

struct History {
    entries: VecDeque<HistoryEntry>,
    redirects: usize,
}

/// Navigator that keeps the recent route history in memory
///
/// Desktop shells without a location bar use this to track where the
/// user is; it also lets tests assert exactly which redirects happened.
/// Only the newest `limit` entries are retained.
pub struct HistoryNavigator {
    history: Mutex<History>,
    limit: usize,
}

impl HistoryNavigator {
    /// Start at `initial_path`
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self::with_limit(initial_path, DEFAULT_HISTORY_LIMIT)
    }

    /// Start at `initial_path`, retaining at most `limit` entries (minimum 1)
    pub fn with_limit(initial_path: impl Into<String>, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = VecDeque::with_capacity(limit);
        entries.push_back(HistoryEntry {
            path: initial_path.into(),
            state: None,
        });
        Self {
            history: Mutex::new(History {
                entries,
                redirects: 0,
            }),
            limit,
        }
    }

    /// Retained paths, oldest first
    pub fn history(&self) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.path.clone())
            .collect()
    }

    /// Number of redirects performed since construction
    pub fn redirect_count(&self) -> usize {
        self.lock().redirects
    }

    /// Simulate the user following a link (no state attached)
    pub fn visit(&self, path: impl Into<String>) {
        self.push(path.into(), None, false);
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, path: String, state: Option<NavigationState>, redirect: bool) {
        let mut history = self.lock();
        if history.entries.len() == self.limit {
            history.entries.pop_front();
        }
        history.entries.push_back(HistoryEntry { path, state });
        if redirect {
            history.redirects += 1;
        }
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.lock()
            .entries
            .back()
            .map(|entry| entry.path.clone())
            .unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, target: &str, state: Option<NavigationState>) {
        debug!(target_path = target, "Redirecting");
        self.push(target.to_string(), state, true);
    }

    fn current_state(&self) -> Option<NavigationState> {
        self.lock()
            .entries
            .back()
            .and_then(|entry| entry.state.clone())
    }
}
